use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field_value::{FieldValue, GeoPoint};

/// The working copy of a multi-step form.
///
/// Field names map to their current values. A draft is owned by one form
/// session; cloning it produces an independent deep copy, so a committed
/// snapshot never aliases the lists or geotag of the live draft.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDraft {
    values: BTreeMap<String, FieldValue>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a draft from `(field, value)` pairs.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            values: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Updates a single field, leaving every other field untouched.
    pub fn set(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn get(
        &self,
        field: &str,
    ) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text content of `field`, or `""` when the field is missing or not text.
    pub fn text(
        &self,
        field: &str,
    ) -> &str {
        match self.values.get(field) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    pub fn flag(
        &self,
        field: &str,
    ) -> bool {
        matches!(self.values.get(field), Some(FieldValue::Flag(true)))
    }

    pub fn ids(
        &self,
        field: &str,
    ) -> &[String] {
        match self.values.get(field) {
            Some(FieldValue::Ids(ids)) => ids,
            _ => &[],
        }
    }

    pub fn geo(
        &self,
        field: &str,
    ) -> GeoPoint {
        match self.values.get(field) {
            Some(FieldValue::Geo(point)) => *point,
            _ => GeoPoint::default(),
        }
    }

    /// Adds `id` to a list field if absent, removes it otherwise.
    ///
    /// New ids are appended, so selection order is kept as the user made it.
    pub fn toggle_id(
        &mut self,
        field: &str,
        id: &str,
    ) {
        let entry = self
            .values
            .entry(field.to_string())
            .or_insert_with(|| FieldValue::Ids(Vec::new()));

        if !matches!(entry, FieldValue::Ids(_)) {
            *entry = FieldValue::Ids(Vec::new());
        }
        if let FieldValue::Ids(ids) = entry {
            if let Some(pos) = ids.iter().position(|existing| existing == id) {
                ids.remove(pos);
            } else {
                ids.push(id.to_string());
            }
        }
    }

    /// Returns `true` if the field is missing or blank.
    pub fn is_blank(
        &self,
        field: &str,
    ) -> bool {
        self.values.get(field).is_none_or(FieldValue::is_blank)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn set_updates_only_the_named_field() {
        let mut draft = FormDraft::from_fields([("revenue", "100"), ("expenses", "40")]);

        draft.set("revenue", "120");

        assert_eq!(draft.text("revenue"), "120");
        assert_eq!(draft.text("expenses"), "40");
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let draft = FormDraft::new();

        assert_eq!(draft.text("address"), "");
        assert!(!draft.flag("confirmation"));
        assert!(draft.ids("photoIds").is_empty());
        assert_eq!(draft.geo("geoLocation"), GeoPoint::default());
        assert!(draft.is_blank("address"));
    }

    #[test]
    fn toggle_id_adds_then_removes() {
        let mut draft = FormDraft::new();

        draft.toggle_id("salesChannels", "Offline");
        draft.toggle_id("salesChannels", "Instagram");
        assert_eq!(draft.ids("salesChannels"), ["Offline", "Instagram"]);

        draft.toggle_id("salesChannels", "Offline");
        assert_eq!(draft.ids("salesChannels"), ["Instagram"]);
    }

    #[test]
    fn clone_does_not_alias_collections() {
        let mut draft = FormDraft::from_fields([(
            "photoIds",
            FieldValue::ids(["foto-etalase"]),
        )]);
        let snapshot = draft.clone();

        draft.toggle_id("photoIds", "foto-produksi");

        assert_eq!(snapshot.ids("photoIds"), ["foto-etalase"]);
        assert_eq!(draft.ids("photoIds"), ["foto-etalase", "foto-produksi"]);
    }
}
