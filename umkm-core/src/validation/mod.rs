//! Field validation rules shared by every form.
//!
//! A rule inspects one or more fields of a [`FormDraft`](crate::FormDraft)
//! and reports every problem it finds. Callers collect the violations of a
//! whole rule table so the user sees all messages at once instead of fixing
//! them one by one.

mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use rules::{ValidationRule, validate, validate_rules};

/// Category of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    Negative,
    NotANumber,
    MissingGroup,
    EmptyText,
    NotInCatalog,
    /// The selected period already has a report on file.
    DuplicatePeriod,
    Unconfirmed,
}

/// A single failed rule, with the message shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One or more violations; always recoverable by editing the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", messages_joined(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn messages_joined(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationError {
    /// Wraps `violations`, or returns `Ok(())` when there are none.
    pub fn check(violations: Vec<Violation>) -> Result<(), ValidationError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    pub fn has_kind(
        &self,
        kind: ViolationKind,
    ) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}
