//! Change detection between a committed record and its draft.
//!
//! The comparison is intentionally literal:
//!
//! * scalar fields differ when their text differs, with no numeric
//!   normalisation (`"150000000"` and `"150000001"` differ);
//! * list fields are compared after sorting and joining with `,`, so order
//!   does not matter but duplicates do (`["a", "a"]` differs from `["a"]`),
//!   and a change produces one summary line rather than a per-item list;
//! * the geotag produces one summary line if either coordinate moved.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{FieldValue, FormDraft};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Scalar,
    /// A list of ids; a change is summarised by `message`.
    Collection { message: String },
    /// A latitude/longitude pair; a change is summarised by `message`.
    Geo { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
}

impl DiffField {
    pub fn scalar(
        key: &str,
        label: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FieldKind::Scalar,
        }
    }

    pub fn collection(
        key: &str,
        label: &str,
        message: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FieldKind::Collection {
                message: message.to_string(),
            },
        }
    }

    pub fn geo(
        key: &str,
        label: &str,
        message: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FieldKind::Geo {
                message: message.to_string(),
            },
        }
    }
}

/// One detected change, ready to show in the confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffEntry {
    Changed {
        label: String,
        before: String,
        after: String,
    },
    Summary {
        label: String,
        message: String,
    },
}

impl DiffEntry {
    pub fn label(&self) -> &str {
        match self {
            Self::Changed { label, .. } | Self::Summary { label, .. } => label,
        }
    }
}

impl fmt::Display for DiffEntry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Changed {
                label,
                before,
                after,
            } => write!(f, "{label}: {} → {}", or_dash(before), or_dash(after)),
            Self::Summary { message, .. } => f.write_str(message),
        }
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn scalar_text(
    draft: &FormDraft,
    key: &str,
) -> String {
    match draft.get(key) {
        Some(FieldValue::Text(s)) => s.clone(),
        Some(FieldValue::Flag(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn sorted_key(ids: &[String]) -> String {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted.join(",")
}

/// Compares `after` against `before` field by field, in schema order.
///
/// An empty result means there is nothing to submit.
pub fn compute_diff(
    schema: &[DiffField],
    before: &FormDraft,
    after: &FormDraft,
) -> Vec<DiffEntry> {
    schema
        .iter()
        .filter_map(|field| match &field.kind {
            FieldKind::Scalar => {
                let old = scalar_text(before, &field.key);
                let new = scalar_text(after, &field.key);
                (old != new).then(|| DiffEntry::Changed {
                    label: field.label.clone(),
                    before: old,
                    after: new,
                })
            }
            FieldKind::Collection { message } => {
                let changed =
                    sorted_key(before.ids(&field.key)) != sorted_key(after.ids(&field.key));
                changed.then(|| DiffEntry::Summary {
                    label: field.label.clone(),
                    message: message.clone(),
                })
            }
            FieldKind::Geo { message } => {
                let old = before.geo(&field.key);
                let new = after.geo(&field.key);
                (old.lat != new.lat || old.lng != new.lng).then(|| DiffEntry::Summary {
                    label: field.label.clone(),
                    message: message.clone(),
                })
            }
        })
        .collect()
}
