pub mod calculations;
pub mod diff;
pub mod models;
pub mod profile;
pub mod reporting;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use diff::{DiffEntry, DiffField, compute_diff};
pub use models::*;
pub use submission::{SubmissionError, SubmissionLedger};
