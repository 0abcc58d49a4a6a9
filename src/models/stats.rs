// src/models/stats.rs
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of applications per status. All three keys are always serialised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "Pending")]
    pub pending: i64,
    #[serde(rename = "Approved")]
    pub approved: i64,
    #[serde(rename = "Rejected")]
    pub rejected: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.pending + self.approved + self.rejected
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdmissionStats {
    pub counts: StatusCounts,
    pub course_counts: BTreeMap<String, i64>,
}
