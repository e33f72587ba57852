//! Business profile editor with review-before-commit.
//!
//! The editor keeps a live draft next to the committed profile held by a
//! [`SubmissionLedger`]. Submitting is a two-step affair:
//!
//! 1. [`ProfileEditor::prepare_submission`] validates the draft and computes
//!    the list of changes to show the owner.
//! 2. [`ProfileEditor::confirm`] (or [`ProfileEditor::confirm_after`]) runs
//!    the same checks again on the current draft, then commits it and records
//!    the fresh change list in the history.
//!
//! # Example
//!
//! ```
//! use umkm_core::models::{Catalog, FormDraft, KbliOption};
//! use umkm_core::profile::{ProfileEditor, fields};
//!
//! let catalog = Catalog {
//!     kbli: vec![KbliOption { code: "56102".into(), label: "Usaha Rumah Makan".into() }],
//!     ..Default::default()
//! };
//! let committed = FormDraft::from_fields([
//!     (fields::ADDRESS, "Jl. Melati No. 45"),
//!     (fields::KBLI, "56102"),
//!     (fields::SCALE, "Mikro"),
//! ]);
//! let mut editor = ProfileEditor::new(catalog, committed, Vec::new());
//!
//! editor.set_field(fields::SCALE, "Kecil");
//! let diff = editor.prepare_submission().unwrap();
//! let record = editor.confirm().unwrap();
//!
//! assert_eq!(record.changes, vec![diff[0].to_string()]);
//! assert_eq!(record.changes, vec!["Skala usaha: Mikro → Kecil"]);
//! assert!(editor.prepare_submission().is_err());
//! ```

use std::time::Duration;

use tracing::debug;

use crate::diff::{DiffEntry, DiffField, compute_diff};
use crate::models::{
    Actor, AuditRecord, Catalog, ChangeStatus, FieldValue, FormDraft, GeoPoint, KbliOption,
    StageState, TimelineStage,
};
use crate::submission::{SubmissionError, SubmissionLedger};
use crate::validation::{ValidationError, ValidationRule, Violation, validate_rules};

/// Field names of the profile draft.
pub mod fields {
    pub const BUSINESS_NAME: &str = "businessName";
    pub const OWNER_NAME: &str = "ownerName";
    pub const ADDRESS: &str = "address";
    pub const SECTOR: &str = "sector";
    pub const KBLI: &str = "kbli";
    pub const SCALE: &str = "scale";
    pub const CAPITAL: &str = "capital";
    pub const CONTACT: &str = "contact";
    pub const OPERATING_HOURS: &str = "operatingHours";
    pub const SOCIAL_MEDIA: &str = "socialMedia";
    pub const GEO_LOCATION: &str = "geoLocation";
    pub const PHOTO_IDS: &str = "photoIds";
    pub const DOCUMENT_IDS: &str = "documentIds";
}

/// Fields that count towards [`ProfileEditor::completion_percent`].
const COMPLETION_FIELDS: [&str; 6] = [
    fields::BUSINESS_NAME,
    fields::ADDRESS,
    fields::SECTOR,
    fields::KBLI,
    fields::SCALE,
    fields::CAPITAL,
];

pub fn profile_rules(catalog: &Catalog) -> Vec<ValidationRule> {
    vec![
        ValidationRule::non_empty(fields::ADDRESS, "Alamat usaha wajib diisi."),
        ValidationRule::one_of(fields::KBLI, catalog.kbli_codes(), "Pilih kode KBLI yang valid."),
        ValidationRule::non_empty(fields::SCALE, "Pilih skala usaha."),
        ValidationRule::non_negative_with_message(
            fields::CAPITAL,
            "Modal/Omzet",
            "Modal/Omzet tidak boleh bernilai minus.",
        ),
    ]
}

/// The fields compared when the owner submits, in display order.
pub fn profile_diff_schema() -> Vec<DiffField> {
    vec![
        DiffField::scalar(fields::BUSINESS_NAME, "Nama usaha"),
        DiffField::scalar(fields::ADDRESS, "Alamat"),
        DiffField::scalar(fields::SECTOR, "Sektor usaha"),
        DiffField::scalar(fields::KBLI, "Kode KBLI"),
        DiffField::scalar(fields::SCALE, "Skala usaha"),
        DiffField::scalar(fields::CAPITAL, "Modal/Omzet"),
        DiffField::scalar(fields::CONTACT, "Kontak"),
        DiffField::scalar(fields::OPERATING_HOURS, "Jam operasional"),
        DiffField::scalar(fields::SOCIAL_MEDIA, "Media sosial"),
        DiffField::collection(fields::PHOTO_IDS, "Foto usaha", "Foto usaha diperbarui."),
        DiffField::collection(
            fields::DOCUMENT_IDS,
            "Dokumen pendukung",
            "Dokumen pendukung diperbarui.",
        ),
        DiffField::geo(
            fields::GEO_LOCATION,
            "Geotag lokasi usaha",
            "Geotag lokasi usaha berubah.",
        ),
    ]
}

#[derive(Debug)]
pub struct ProfileEditor {
    catalog: Catalog,
    rules: Vec<ValidationRule>,
    schema: Vec<DiffField>,
    ledger: SubmissionLedger,
    draft: FormDraft,
}

impl ProfileEditor {
    /// Opens the editor with the draft set to a copy of `committed`.
    pub fn new(
        catalog: Catalog,
        committed: FormDraft,
        history: Vec<AuditRecord>,
    ) -> Self {
        let rules = profile_rules(&catalog);
        let draft = committed.clone();
        Self {
            catalog,
            rules,
            schema: profile_diff_schema(),
            ledger: SubmissionLedger::new(committed, history, Actor::Owner),
            draft,
        }
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn committed(&self) -> FormDraft {
        self.ledger.committed()
    }

    /// Change history, most recent first.
    pub fn history(&self) -> Vec<AuditRecord> {
        self.ledger.history()
    }

    pub fn is_submitting(&self) -> bool {
        self.ledger.is_in_flight()
    }

    pub fn set_field(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) {
        self.draft.set(field, value);
    }

    pub fn toggle_id(
        &mut self,
        field: &str,
        id: &str,
    ) {
        self.draft.toggle_id(field, id);
    }

    /// Replaces the geotag with a point chosen on the map.
    pub fn pick_location(
        &mut self,
        point: GeoPoint,
    ) {
        debug!(location = %point, "geotag picked");
        self.draft.set(fields::GEO_LOCATION, point);
    }

    /// Discards every edit and starts again from the committed profile.
    pub fn reset_draft(&mut self) {
        self.draft = self.ledger.committed();
    }

    pub fn validate(&self) -> Vec<Violation> {
        validate_rules(&self.draft, &self.rules)
    }

    /// Changes the draft would make to the committed profile.
    pub fn diff(&self) -> Vec<DiffEntry> {
        compute_diff(&self.schema, &self.ledger.committed(), &self.draft)
    }

    /// Validates the draft and returns the changes to confirm.
    ///
    /// # Errors
    ///
    /// * [`SubmissionError::Validation`] when any profile rule fails.
    /// * [`SubmissionError::EmptyDiff`] when nothing was changed.
    pub fn prepare_submission(&self) -> Result<Vec<DiffEntry>, SubmissionError> {
        ValidationError::check(self.validate())?;

        let diff = self.diff();
        if diff.is_empty() {
            return Err(SubmissionError::EmptyDiff);
        }
        Ok(diff)
    }

    /// Commits the current draft.
    ///
    /// The draft is validated and diffed again here, so the recorded change
    /// list always describes what is committed.
    ///
    /// # Errors
    ///
    /// The errors of [`prepare_submission`](Self::prepare_submission), plus
    /// [`SubmissionError::InFlight`] while another commit is pending.
    pub fn confirm(&self) -> Result<AuditRecord, SubmissionError> {
        let diff = self.prepare_submission()?;
        self.ledger.confirm(&diff, &self.draft)
    }

    /// Like [`confirm`](Self::confirm), after an artificial `delay`.
    ///
    /// The draft cannot change while the delay runs since the editor stays
    /// borrowed.
    pub async fn confirm_after(
        &self,
        delay: Duration,
    ) -> Result<AuditRecord, SubmissionError> {
        let diff = self.prepare_submission()?;
        self.ledger.confirm_after(delay, &diff, &self.draft).await
    }

    /// Share of the core business fields that are filled in, as a whole percent.
    pub fn completion_percent(&self) -> u8 {
        let total = COMPLETION_FIELDS.len();
        let filled = COMPLETION_FIELDS
            .iter()
            .filter(|field| !self.draft.text(field).trim().is_empty())
            .count();
        // Rounds half up.
        ((filled * 200 + total) / (total * 2)) as u8
    }

    /// KBLI options matching `query` by code or, ignoring case, by label.
    ///
    /// A blank query matches nothing.
    pub fn kbli_suggestions(
        &self,
        query: &str,
    ) -> Vec<&KbliOption> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.catalog
            .kbli
            .iter()
            .filter(|option| {
                option.code.contains(query) || option.label.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Review progress of the most recent change.
    pub fn timeline(&self) -> Vec<TimelineStage> {
        let last = self
            .ledger
            .latest()
            .map_or(ChangeStatus::UnderReview, |record| record.status);
        change_timeline(last)
    }
}

/// Three-stage timeline for a change whose latest status is `last`.
pub fn change_timeline(last: ChangeStatus) -> Vec<TimelineStage> {
    let approved = last == ChangeStatus::Approved;
    let revision = last == ChangeStatus::NeedsRevision;

    let verification = if approved {
        StageState::Completed
    } else {
        StageState::Current
    };
    let (title, description) = if revision {
        ("Revisi Diperlukan", "Sesuaikan data sesuai catatan dan kirim ulang.")
    } else {
        ("Disetujui", "Data terbaru telah disetujui.")
    };
    let outcome = if approved {
        StageState::Completed
    } else if revision {
        StageState::Current
    } else {
        StageState::Upcoming
    };

    vec![
        TimelineStage::new(
            "Diajukan",
            "Perubahan dikirim ke petugas dinas.",
            StageState::Completed,
        ),
        TimelineStage::new(
            "Menunggu Verifikasi",
            "Petugas memeriksa kelengkapan data.",
            verification,
        ),
        TimelineStage::new(title, description, outcome),
    ]
}
