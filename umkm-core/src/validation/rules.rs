use serde::{Deserialize, Serialize};

use super::{Violation, ViolationKind};
use crate::calculations::common::parse_amount;
use crate::models::{FieldValue, FormDraft};

/// A named check over form fields, with the message it reports.
///
/// Rules are plain data so a form can keep its whole rule table in one
/// place and run any subset of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationRule {
    /// The field, when filled in, must not be a negative number.
    ///
    /// `message` replaces the default "must not be negative" text.
    NonNegativeNumber {
        field: String,
        label: String,
        #[serde(default)]
        message: Option<String>,
    },

    /// At least one of `fields` must be filled in.
    RequiredGroup { fields: Vec<String>, message: String },

    /// The field must contain text other than whitespace.
    NonEmptyText { field: String, message: String },

    /// The field's value (or every id in a list field) must be in `allowed`.
    OneOf {
        field: String,
        allowed: Vec<String>,
        message: String,
    },

    /// The field must not name an identifier that was already submitted.
    NotAlreadySubmitted {
        field: String,
        submitted: Vec<String>,
        message: String,
    },

    /// The flag must be explicitly switched on.
    ConfirmationFlag { field: String, message: String },
}

impl ValidationRule {
    pub fn non_negative(
        field: &str,
        label: &str,
    ) -> Self {
        Self::NonNegativeNumber {
            field: field.to_string(),
            label: label.to_string(),
            message: None,
        }
    }

    pub fn non_negative_with_message(
        field: &str,
        label: &str,
        message: &str,
    ) -> Self {
        Self::NonNegativeNumber {
            field: field.to_string(),
            label: label.to_string(),
            message: Some(message.to_string()),
        }
    }

    pub fn required_group(
        fields: &[&str],
        message: &str,
    ) -> Self {
        Self::RequiredGroup {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            message: message.to_string(),
        }
    }

    pub fn non_empty(
        field: &str,
        message: &str,
    ) -> Self {
        Self::NonEmptyText {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn one_of(
        field: &str,
        allowed: Vec<String>,
        message: &str,
    ) -> Self {
        Self::OneOf {
            field: field.to_string(),
            allowed,
            message: message.to_string(),
        }
    }

    pub fn not_already_submitted(
        field: &str,
        submitted: Vec<String>,
        message: &str,
    ) -> Self {
        Self::NotAlreadySubmitted {
            field: field.to_string(),
            submitted,
            message: message.to_string(),
        }
    }

    pub fn confirmed(
        field: &str,
        message: &str,
    ) -> Self {
        Self::ConfirmationFlag {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Runs one rule against a draft and returns every violation it produces.
pub fn validate(
    draft: &FormDraft,
    rule: &ValidationRule,
) -> Vec<Violation> {
    match rule {
        ValidationRule::NonNegativeNumber {
            field,
            label,
            message,
        } => match parse_amount(draft.text(field)) {
            Ok(Some(value)) if value.is_sign_negative() && !value.is_zero() => vec![Violation::new(
                ViolationKind::Negative,
                message
                    .clone()
                    .unwrap_or_else(|| format!("{label} tidak boleh bernilai negatif.")),
            )],
            Ok(_) => Vec::new(),
            Err(_) => vec![Violation::new(
                ViolationKind::NotANumber,
                format!("{label} harus berupa angka."),
            )],
        },

        ValidationRule::RequiredGroup { fields, message } => {
            if fields.iter().all(|f| draft.is_blank(f)) {
                vec![Violation::new(ViolationKind::MissingGroup, message.clone())]
            } else {
                Vec::new()
            }
        }

        ValidationRule::NonEmptyText { field, message } => {
            if draft.text(field).trim().is_empty() {
                vec![Violation::new(ViolationKind::EmptyText, message.clone())]
            } else {
                Vec::new()
            }
        }

        ValidationRule::OneOf {
            field,
            allowed,
            message,
        } => {
            let is_allowed = |v: &str| allowed.iter().any(|a| a == v);
            let ok = match draft.get(field) {
                Some(FieldValue::Ids(ids)) => ids.iter().all(|id| is_allowed(id)),
                Some(FieldValue::Text(value)) => is_allowed(value),
                _ => false,
            };
            if ok {
                Vec::new()
            } else {
                vec![Violation::new(ViolationKind::NotInCatalog, message.clone())]
            }
        }

        ValidationRule::NotAlreadySubmitted {
            field,
            submitted,
            message,
        } => {
            let id = draft.text(field);
            if submitted.iter().any(|s| s == id) {
                vec![Violation::new(ViolationKind::DuplicatePeriod, message.clone())]
            } else {
                Vec::new()
            }
        }

        ValidationRule::ConfirmationFlag { field, message } => {
            if draft.flag(field) {
                Vec::new()
            } else {
                vec![Violation::new(ViolationKind::Unconfirmed, message.clone())]
            }
        }
    }
}

/// Runs every rule in order and concatenates their violations.
pub fn validate_rules(
    draft: &FormDraft,
    rules: &[ValidationRule],
) -> Vec<Violation> {
    rules.iter().flat_map(|rule| validate(draft, rule)).collect()
}
