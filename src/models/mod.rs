// src/models/mod.rs
pub mod admin;
pub mod stats;
pub mod student;
