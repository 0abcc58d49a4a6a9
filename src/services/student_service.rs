// src/services/student_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        stats::{AdmissionStats, StatusCounts},
        student::{ApplicationStatus, NewStudent, Student},
    },
    notifications::{Notification, Notifier},
};
use chrono::Utc;
use sqlx::SqlitePool;

const STUDENT_COLUMNS: &str = "id, full_name, email, phone, dob, address, course, documents, photo, status, created_at, updated_at";

pub async fn find_student_by_id(db_pool: &SqlitePool, student_id: i64) -> AppResult<Option<Student>> {
    tracing::debug!("Looking up student {}", student_id);
    let student = sqlx::query_as::<_, Student>(&format!(
        "SELECT {} FROM students WHERE id = ?1",
        STUDENT_COLUMNS
    ))
    .bind(student_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(student)
}

/// All applications, newest first.
pub async fn find_all_students(db_pool: &SqlitePool) -> AppResult<Vec<Student>> {
    let students = sqlx::query_as::<_, Student>(&format!(
        "SELECT {} FROM students ORDER BY created_at DESC, id DESC",
        STUDENT_COLUMNS
    ))
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Loaded {} applications.", students.len());
    Ok(students)
}

/// Stores a new application with status Pending.
pub async fn create_student(db_pool: &SqlitePool, new_student: &NewStudent) -> AppResult<Student> {
    tracing::info!("Storing application for {}", new_student.email);
    let now = Utc::now().naive_utc();

    let result = sqlx::query_as::<_, Student>(&format!(
        r#"
        INSERT INTO students (full_name, email, phone, dob, address, course, status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
        RETURNING {}
        "#,
        STUDENT_COLUMNS
    ))
    .bind(&new_student.full_name)
    .bind(&new_student.email)
    .bind(&new_student.phone)
    .bind(new_student.dob)
    .bind(&new_student.address)
    .bind(&new_student.course)
    .bind(ApplicationStatus::Pending.as_str())
    .bind(now)
    .fetch_one(db_pool)
    .await;

    match result {
        Ok(student) => {
            tracing::info!("✅ Application {} stored for {}", student.id, student.email);
            Ok(student)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            let field = if db_err.message().contains("phone") { "phone" } else { "email" };
            tracing::warn!("Duplicate application rejected ({} already used)", field);
            Err(AppError::DuplicateApplicant(field))
        }
        Err(e) => Err(e.into()),
    }
}

/// Stores a registration and sends the "application received" notification.
pub async fn register_student(
    db_pool: &SqlitePool,
    notifier: &Notifier,
    new_student: &NewStudent,
) -> AppResult<Student> {
    let student = create_student(db_pool, new_student).await?;

    match Notification::application_received(&student) {
        Ok(notification) => notifier.notify(&student, notification),
        Err(e) => tracing::error!("❌ Could not build confirmation for student {}: {}", student.id, e),
    }

    Ok(student)
}

/// Records an admin decision and notifies the applicant.
///
/// The status is validated before the lookup, so a bad value is always `InvalidStatus`.
/// Setting the status an application already has changes nothing and sends nothing.
/// Notification problems are logged and never undo or fail the update.
pub async fn set_status(
    db_pool: &SqlitePool,
    notifier: &Notifier,
    student_id: i64,
    requested: &str,
) -> AppResult<Student> {
    let new_status = ApplicationStatus::parse_decision(requested).map_err(|e| {
        tracing::warn!("Rejected status '{}' for student {}", requested, student_id);
        e
    })?;

    let current = find_student_by_id(db_pool, student_id)
        .await?
        .ok_or(AppError::NotFound(student_id))?;

    if current.status == new_status {
        tracing::info!("Student {} is already {}, nothing to do", student_id, new_status);
        return Ok(current);
    }
    if current.status.is_decided() {
        tracing::warn!(
            "Overriding decision for student {}: {} -> {}",
            student_id,
            current.status,
            new_status
        );
    }

    let updated = sqlx::query_as::<_, Student>(&format!(
        r#"
        UPDATE students
        SET status = ?1, updated_at = ?2
        WHERE id = ?3
        RETURNING {}
        "#,
        STUDENT_COLUMNS
    ))
    .bind(new_status.as_str())
    .bind(Utc::now().naive_utc())
    .bind(student_id)
    .fetch_optional(db_pool)
    .await?
    .ok_or(AppError::NotFound(student_id))?;

    tracing::info!("✅ Student {} is now {}", student_id, new_status);

    match Notification::decision(&updated, new_status) {
        Ok(notification) => notifier.notify(&updated, notification),
        Err(e) => tracing::error!("❌ Could not build decision message for student {}: {}", student_id, e),
    }

    Ok(updated)
}

/// Applications per status, zero for statuses nobody holds.
pub async fn status_counts(db_pool: &SqlitePool) -> AppResult<StatusCounts> {
    let mut counts = StatusCounts::default();

    let by_status: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM students GROUP BY status")
            .fetch_all(db_pool)
            .await?;
    for (status, count) in by_status {
        match ApplicationStatus::try_from(status) {
            Ok(ApplicationStatus::Pending) => counts.pending = count,
            Ok(ApplicationStatus::Approved) => counts.approved = count,
            Ok(ApplicationStatus::Rejected) => counts.rejected = count,
            Err(e) => tracing::warn!("Ignoring unknown status in stats: {}", e),
        }
    }

    Ok(counts)
}

/// Counts per status and per course.
pub async fn admission_stats(db_pool: &SqlitePool) -> AppResult<AdmissionStats> {
    let counts = status_counts(db_pool).await?;

    let by_course: Vec<(String, i64)> =
        sqlx::query_as("SELECT course, COUNT(*) FROM students GROUP BY course")
            .fetch_all(db_pool)
            .await?;

    Ok(AdmissionStats {
        counts,
        course_counts: by_course.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::notifications::testing::{RecordingMailer, RecordingSms};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::Duration;

    fn applicant(email: &str, phone: Option<&str>, course: &str) -> NewStudent {
        NewStudent {
            full_name: "Asha Rao".to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            dob: NaiveDate::from_ymd_opt(2004, 5, 17).unwrap(),
            address: "12 Lake Road".to_string(),
            course: course.to_string(),
        }
    }

    fn notifier(mailer: Arc<RecordingMailer>) -> Notifier {
        Notifier::new(mailer, Some(Arc::new(RecordingSms::default())))
    }

    // Notifications are detached; give them a moment to run.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn new_application_starts_pending() {
        let pool = test_pool().await;
        let student = create_student(&pool, &applicant("a@x.com", Some("+1555"), "CS"))
            .await
            .unwrap();

        assert_eq!(student.status, ApplicationStatus::Pending);
        assert_eq!(student.created_at, student.updated_at);
        assert_eq!(student.phone.as_deref(), Some("+1555"));
    }

    #[tokio::test]
    async fn duplicate_email_or_phone_is_rejected() {
        let pool = test_pool().await;
        create_student(&pool, &applicant("a@x.com", Some("+1555"), "CS")).await.unwrap();

        let same_email = create_student(&pool, &applicant("A@X.com", None, "CS")).await;
        assert!(matches!(same_email, Err(AppError::DuplicateApplicant("email"))));

        let same_phone = create_student(&pool, &applicant("b@x.com", Some("+1555"), "CS")).await;
        assert!(matches!(same_phone, Err(AppError::DuplicateApplicant("phone"))));

        // Several applicants without a phone are fine.
        create_student(&pool, &applicant("c@x.com", None, "CS")).await.unwrap();
        create_student(&pool, &applicant("d@x.com", None, "CS")).await.unwrap();
    }

    #[tokio::test]
    async fn decisions_are_stored_and_advance_updated_at() {
        let pool = test_pool().await;
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone());

        for (email, decision) in [("a@x.com", "Approved"), ("b@x.com", "Rejected")] {
            let created = create_student(&pool, &applicant(email, None, "CS")).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;

            let updated = set_status(&pool, &notifier, created.id, decision).await.unwrap();
            assert_eq!(updated.status.as_str(), decision);
            assert!(updated.updated_at > created.updated_at);

            let stored = find_student_by_id(&pool, created.id).await.unwrap().unwrap();
            assert_eq!(stored.status.as_str(), decision);
        }

        settle().await;
        let subjects: Vec<String> = mailer.attempts().into_iter().map(|s| s.subject).collect();
        assert!(subjects.contains(&"Application Approved".to_string()));
        assert!(subjects.contains(&"Application Rejected".to_string()));
    }

    #[tokio::test]
    async fn invalid_status_leaves_record_untouched() {
        let pool = test_pool().await;
        let mailer = Arc::new(RecordingMailer::default());
        let created = create_student(&pool, &applicant("a@x.com", None, "CS")).await.unwrap();

        for bad in ["Pending", "approved", "Expelled", ""] {
            let result = set_status(&pool, &notifier(mailer.clone()), created.id, bad).await;
            assert!(matches!(result, Err(AppError::InvalidStatus(_))));
        }

        let stored = find_student_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Pending);
        assert_eq!(stored.updated_at, created.updated_at);
        settle().await;
        assert!(mailer.attempts().is_empty());
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        let pool = test_pool().await;
        let mailer = Arc::new(RecordingMailer::default());

        let result = set_status(&pool, &notifier(mailer), 404, "Approved").await;
        assert!(matches!(result, Err(AppError::NotFound(404))));
    }

    #[tokio::test]
    async fn failing_mail_does_not_fail_the_decision() {
        let pool = test_pool().await;
        let mailer = Arc::new(RecordingMailer::failing());
        let created = create_student(&pool, &applicant("a@x.com", Some("+1555"), "CS")).await.unwrap();

        let updated = set_status(&pool, &notifier(mailer.clone()), created.id, "Approved")
            .await
            .expect("decision succeeds even though mail fails");
        assert_eq!(updated.status, ApplicationStatus::Approved);

        settle().await;
        assert_eq!(mailer.attempts().len(), 1);
    }

    #[tokio::test]
    async fn repeating_a_decision_sends_nothing_new() {
        let pool = test_pool().await;
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone());
        let created = create_student(&pool, &applicant("a@x.com", None, "CS")).await.unwrap();

        let first = set_status(&pool, &notifier, created.id, "Approved").await.unwrap();
        let second = set_status(&pool, &notifier, created.id, "Approved").await.unwrap();
        assert_eq!(first.updated_at, second.updated_at);

        settle().await;
        assert_eq!(mailer.attempts().len(), 1);
    }

    #[tokio::test]
    async fn overriding_a_decision_is_stored_and_notified() {
        let pool = test_pool().await;
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone());
        let created = create_student(&pool, &applicant("a@x.com", None, "CS")).await.unwrap();

        let approved = set_status(&pool, &notifier, created.id, "Approved").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let rejected = set_status(&pool, &notifier, created.id, "Rejected").await.unwrap();

        assert_eq!(rejected.status, ApplicationStatus::Rejected);
        assert!(rejected.updated_at > approved.updated_at);
        let stored = find_student_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Rejected);

        settle().await;
        let subjects: Vec<String> = mailer.attempts().into_iter().map(|s| s.subject).collect();
        assert_eq!(subjects.len(), 2);
        assert!(subjects.contains(&"Application Approved".to_string()));
        assert!(subjects.contains(&"Application Rejected".to_string()));
    }

    #[tokio::test]
    async fn status_counts_ignore_courses() {
        let pool = test_pool().await;
        assert_eq!(status_counts(&pool).await.unwrap(), StatusCounts::default());

        let mailer = Arc::new(RecordingMailer::default());
        let a = create_student(&pool, &applicant("a@x.com", None, "CS")).await.unwrap();
        create_student(&pool, &applicant("b@x.com", None, "Physics")).await.unwrap();
        set_status(&pool, &notifier(mailer), a.id, "Approved").await.unwrap();

        let counts = status_counts(&pool).await.unwrap();
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.rejected, 0);
        assert_eq!(counts.total(), 2);
    }

    #[tokio::test]
    async fn stats_count_statuses_and_courses() {
        let pool = test_pool().await;
        let empty = admission_stats(&pool).await.unwrap();
        assert_eq!(empty.counts, StatusCounts::default());
        assert!(empty.course_counts.is_empty());

        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer);
        let a = create_student(&pool, &applicant("a@x.com", None, "CS")).await.unwrap();
        create_student(&pool, &applicant("b@x.com", None, "CS")).await.unwrap();
        let c = create_student(&pool, &applicant("c@x.com", None, "Physics")).await.unwrap();
        set_status(&pool, &notifier, a.id, "Approved").await.unwrap();
        set_status(&pool, &notifier, c.id, "Rejected").await.unwrap();

        let stats = admission_stats(&pool).await.unwrap();
        assert_eq!(
            stats.counts,
            StatusCounts {
                pending: 1,
                approved: 1,
                rejected: 1
            }
        );
        assert_eq!(stats.course_counts.get("CS"), Some(&2));
        assert_eq!(stats.course_counts.get("Physics"), Some(&1));
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let pool = test_pool().await;
        create_student(&pool, &applicant("first@x.com", None, "CS")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        create_student(&pool, &applicant("second@x.com", None, "CS")).await.unwrap();

        let all = find_all_students(&pool).await.unwrap();
        assert_eq!(all[0].email, "second@x.com");
        assert_eq!(all[1].email, "first@x.com");
    }
}
