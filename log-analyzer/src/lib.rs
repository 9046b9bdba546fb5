//! Combined-format access-log parsing and rolling visitor/endpoint summaries.
//!
//! [`parser::parse`] turns one raw line into a [`models::LogEntry`] (or
//! nothing), and [`analytics::Analytics`] accumulates entries and answers
//! top-N queries at any point without keeping the input around.

pub mod analytics;
pub mod ingest;
pub mod invariants;
pub mod models;
pub mod parser;
pub mod render;
pub mod worker;
