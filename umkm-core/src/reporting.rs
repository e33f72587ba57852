//! Monthly activity report wizard.
//!
//! Three steps, gated by the rule table built in [`ReportingWizard::new`]:
//!
//! | Step | Name                 | Leaving it requires                                 |
//! |------|----------------------|-----------------------------------------------------|
//! | 0    | Data Inti            | open period, non-negative numbers, one figure given |
//! | 1    | Aktivitas & Lampiran | a short activity description                        |
//! | 2    | Tinjau & Ajukan      | (submit) the truthfulness statement is ticked       |
//!
//! Submitting is two-phase so callers can wait between validation and
//! commit: [`ReportingWizard::begin_submit`] validates and reserves the
//! submission, [`ReportingWizard::finish_submit`] records it. Any submit
//! attempt in between is rejected with [`SubmissionError::InFlight`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculations::common::{amount_or_zero, format_rupiah};
use crate::models::{Catalog, FieldValue, FormDraft, ReportStatus, StageState, TimelineStage};
use crate::submission::SubmissionError;
use crate::validation::{ValidationError, ValidationRule};
use crate::wizard::{StepSequencer, WizardStep};

/// Field names of the report draft.
pub mod fields {
    pub const PERIOD_ID: &str = "periodId";
    pub const REVENUE: &str = "revenue";
    pub const EXPENSES: &str = "expenses";
    pub const TRANSACTIONS: &str = "transactions";
    pub const EMPLOYEES: &str = "employees";
    pub const SALES_CHANNELS: &str = "salesChannels";
    pub const ACTIVITY_DESCRIPTION: &str = "activityDescription";
    pub const PHOTO_IDS: &str = "photoIds";
    pub const ATTACHMENT_IDS: &str = "attachmentIds";
    pub const TAX_DOC_IDS: &str = "taxDocIds";
    pub const CONFIRMATION: &str = "confirmation";
}

pub const DUPLICATE_PERIOD_MESSAGE: &str =
    "Periode tersebut sudah memiliki laporan. Pilih periode lain.";
pub const UNKNOWN_PERIOD_MESSAGE: &str = "Pilih periode laporan yang tersedia.";
pub const REQUIRED_FIGURES_MESSAGE: &str =
    "Isi minimal salah satu dari Pendapatan, Biaya, atau Jumlah Karyawan.";
pub const ACTIVITY_MESSAGE: &str = "Tuliskan singkat aktivitas usaha pada periode ini.";
pub const CONFIRMATION_MESSAGE: &str = "Centang pernyataan kebenaran sebelum mengajukan.";

/// One labelled line of the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: String,
}

impl ReviewRow {
    fn new(
        label: &'static str,
        value: String,
    ) -> Self {
        Self { label, value }
    }
}

/// A validated report waiting to be recorded.
///
/// Only [`ReportingWizard::begin_submit`] creates one.
#[derive(Debug)]
#[must_use = "a pending report keeps the wizard locked until it is finished or abandoned"]
pub struct PendingReport {
    period_id: String,
    draft: FormDraft,
}

impl PendingReport {
    pub fn period_id(&self) -> &str {
        &self.period_id
    }
}

/// What was recorded by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportReceipt {
    pub period_id: String,
    pub period_label: String,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

#[derive(Debug)]
pub struct ReportingWizard {
    catalog: Catalog,
    sequencer: StepSequencer,
    draft: FormDraft,
    pending: bool,
}

impl ReportingWizard {
    /// Creates a wizard on step 0 with a blank draft for the first open period.
    pub fn new(catalog: Catalog) -> Self {
        let sequencer = build_sequencer(&catalog);
        let draft = initial_draft(&catalog);
        Self {
            catalog,
            sequencer,
            draft,
            pending: false,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
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

    pub fn step(&self) -> usize {
        self.sequencer.current()
    }

    pub fn step_name(&self) -> &str {
        self.sequencer
            .current_step()
            .map_or("", |step| step.name.as_str())
    }

    /// `true` on the review step, where submitting becomes possible.
    pub fn is_final_step(&self) -> bool {
        self.sequencer.is_final()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn advance(&mut self) -> Result<usize, ValidationError> {
        self.sequencer.advance(&self.draft)
    }

    pub fn retreat(&mut self) -> usize {
        self.sequencer.retreat()
    }

    /// Revenue minus expenses; blank or unparseable figures count as zero.
    pub fn profit(&self) -> Decimal {
        amount_or_zero(self.draft.text(fields::REVENUE))
            - amount_or_zero(self.draft.text(fields::EXPENSES))
    }

    /// `true` when an older period that was never reported is selected.
    pub fn period_is_late(&self) -> bool {
        let selected = self.draft.text(fields::PERIOD_ID);
        let default_period = open_period(&self.catalog);
        self.catalog
            .period(selected)
            .is_some_and(|p| p.status == ReportStatus::NotSubmitted)
            && default_period.is_some_and(|id| id != selected)
    }

    pub fn review(&self) -> Vec<ReviewRow> {
        let draft = &self.draft;
        let period_label = self
            .catalog
            .period(draft.text(fields::PERIOD_ID))
            .map_or_else(|| "-".to_string(), |p| p.label.clone());
        let joined = draft.ids(fields::SALES_CHANNELS).join(", ");

        vec![
            ReviewRow::new("Periode", period_label),
            ReviewRow::new("Pendapatan", currency_or_dash(amount_or_zero(draft.text(fields::REVENUE)))),
            ReviewRow::new("Biaya", currency_or_dash(amount_or_zero(draft.text(fields::EXPENSES)))),
            ReviewRow::new("Laba", currency_or_dash(self.profit())),
            ReviewRow::new("Transaksi", text_or_dash(draft.text(fields::TRANSACTIONS))),
            ReviewRow::new("Karyawan", text_or_dash(draft.text(fields::EMPLOYEES))),
            ReviewRow::new("Saluran Penjualan", text_or_dash(&joined)),
            ReviewRow::new("Aktivitas", text_or_dash(draft.text(fields::ACTIVITY_DESCRIPTION))),
            ReviewRow::new("Foto Pendukung", self.catalog.vault_labels(draft.ids(fields::PHOTO_IDS))),
            ReviewRow::new("Lampiran", self.catalog.vault_labels(draft.ids(fields::ATTACHMENT_IDS))),
            ReviewRow::new("Bukti Pajak / Izin", self.catalog.vault_labels(draft.ids(fields::TAX_DOC_IDS))),
        ]
    }

    /// Progress of the report being prepared.
    pub fn timeline(&self) -> Vec<TimelineStage> {
        let first = if self.sequencer.is_final() && self.draft.flag(fields::CONFIRMATION) {
            StageState::Completed
        } else {
            StageState::Current
        };
        vec![
            TimelineStage::new("Diajukan", "Laporan terkirim ke Dinas Koperasi.", first),
            TimelineStage::new(
                "Diverifikasi",
                "Petugas sedang melakukan verifikasi dokumen.",
                StageState::Upcoming,
            ),
            TimelineStage::new(
                "Disetujui",
                "Laporan dinyatakan valid dan diterima.",
                StageState::Upcoming,
            ),
        ]
    }

    /// Validates every step and reserves the submission.
    ///
    /// # Errors
    ///
    /// * [`SubmissionError::InFlight`] while an earlier submission is pending.
    /// * [`SubmissionError::NotAtFinalStep`] before the review step.
    /// * [`SubmissionError::Validation`] with every violation across all steps.
    pub fn begin_submit(&mut self) -> Result<PendingReport, SubmissionError> {
        if self.pending {
            warn!("report submission rejected; another one is still pending");
            return Err(SubmissionError::InFlight);
        }
        self.sequencer.submit(&self.draft)?;

        self.pending = true;
        Ok(PendingReport {
            period_id: self.draft.text(fields::PERIOD_ID).to_string(),
            draft: self.draft.clone(),
        })
    }

    /// Records a pending report and starts a fresh draft on step 0.
    pub fn finish_submit(
        &mut self,
        pending: PendingReport,
    ) -> ReportReceipt {
        let PendingReport { period_id, draft } = pending;

        let mut period_label = period_id.clone();
        if let Some(period) = self.catalog.periods.iter_mut().find(|p| p.id == period_id) {
            if period.status.can_transition_to(ReportStatus::Submitted) {
                period.status = ReportStatus::Submitted;
            } else {
                warn!(period = %period_id, status = %period.status, "period status left unchanged");
            }
            period_label = period.label.clone();
        }
        if !self.catalog.submitted_periods.contains(&period_id) {
            self.catalog.submitted_periods.push(period_id.clone());
        }

        let revenue = amount_or_zero(draft.text(fields::REVENUE));
        let expenses = amount_or_zero(draft.text(fields::EXPENSES));

        self.sequencer = build_sequencer(&self.catalog);
        self.draft = initial_draft(&self.catalog);
        self.pending = false;

        info!(period = %period_id, "activity report submitted");
        ReportReceipt {
            period_id,
            period_label,
            revenue,
            expenses,
            profit: revenue - expenses,
        }
    }

    /// Releases a pending report without recording it. The draft is kept.
    pub fn abandon_submit(
        &mut self,
        pending: PendingReport,
    ) {
        warn!(period = %pending.period_id, "report submission abandoned");
        self.pending = false;
    }

    /// [`begin_submit`](Self::begin_submit) and [`finish_submit`](Self::finish_submit) in one call.
    pub fn submit(&mut self) -> Result<ReportReceipt, SubmissionError> {
        let pending = self.begin_submit()?;
        Ok(self.finish_submit(pending))
    }
}

/// The first period that has no report yet, falling back to the first period.
fn open_period(catalog: &Catalog) -> Option<&str> {
    catalog
        .periods
        .iter()
        .find(|p| !catalog.submitted_periods.contains(&p.id))
        .or_else(|| catalog.periods.first())
        .map(|p| p.id.as_str())
}

fn initial_draft(catalog: &Catalog) -> FormDraft {
    let mut draft = FormDraft::from_fields([
        (fields::PERIOD_ID, FieldValue::text(open_period(catalog).unwrap_or_default())),
        (fields::REVENUE, FieldValue::text("")),
        (fields::EXPENSES, FieldValue::text("")),
        (fields::TRANSACTIONS, FieldValue::text("")),
        (fields::EMPLOYEES, FieldValue::text("")),
        (fields::ACTIVITY_DESCRIPTION, FieldValue::text("")),
        (fields::CONFIRMATION, FieldValue::Flag(false)),
    ]);
    for list in [
        fields::SALES_CHANNELS,
        fields::PHOTO_IDS,
        fields::ATTACHMENT_IDS,
        fields::TAX_DOC_IDS,
    ] {
        draft.set(list, FieldValue::Ids(Vec::new()));
    }
    draft
}

fn build_sequencer(catalog: &Catalog) -> StepSequencer {
    let core_data = vec![
        ValidationRule::not_already_submitted(
            fields::PERIOD_ID,
            catalog.submitted_periods.clone(),
            DUPLICATE_PERIOD_MESSAGE,
        ),
        ValidationRule::one_of(fields::PERIOD_ID, catalog.period_ids(), UNKNOWN_PERIOD_MESSAGE),
        ValidationRule::non_negative(fields::REVENUE, "Pendapatan"),
        ValidationRule::non_negative(fields::EXPENSES, "Biaya Operasional"),
        ValidationRule::non_negative(fields::TRANSACTIONS, "Jumlah Transaksi"),
        ValidationRule::non_negative(fields::EMPLOYEES, "Jumlah Karyawan Aktif"),
        ValidationRule::required_group(
            &[fields::REVENUE, fields::EXPENSES, fields::EMPLOYEES],
            REQUIRED_FIGURES_MESSAGE,
        ),
    ];
    let activity = vec![ValidationRule::non_empty(
        fields::ACTIVITY_DESCRIPTION,
        ACTIVITY_MESSAGE,
    )];

    StepSequencer::new(
        vec![
            WizardStep::new("Data Inti", core_data),
            WizardStep::new("Aktivitas & Lampiran", activity),
            WizardStep::new("Tinjau & Ajukan", Vec::new()),
        ],
        vec![ValidationRule::confirmed(fields::CONFIRMATION, CONFIRMATION_MESSAGE)],
    )
}

fn currency_or_dash(amount: Decimal) -> String {
    if amount.is_zero() {
        "-".to_string()
    } else {
        format_rupiah(amount)
    }
}

fn text_or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{ReportingPeriod, VaultItem, VaultItemKind};
    use crate::validation::ViolationKind;

    fn period(
        id: &str,
        label: &str,
        status: ReportStatus,
    ) -> ReportingPeriod {
        ReportingPeriod {
            id: id.into(),
            label: label.into(),
            due_date: String::new(),
            status,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            periods: vec![
                period("nov-2025", "November 2025", ReportStatus::NotSubmitted),
                period("oct-2025", "Oktober 2025", ReportStatus::Submitted),
                period("sep-2025", "September 2025", ReportStatus::Approved),
            ],
            submitted_periods: vec!["oct-2025".into(), "sep-2025".into()],
            sales_channels: vec!["Offline".into(), "Instagram".into()],
            vault_items: vec![VaultItem {
                id: "buku-kas".into(),
                label: "Foto Buku Kas November".into(),
                kind: VaultItemKind::Image,
                updated_at: "1 hari lalu".into(),
            }],
            ..Default::default()
        }
    }

    fn filled_wizard() -> ReportingWizard {
        let mut wizard = ReportingWizard::new(catalog());
        wizard.set_field(fields::REVENUE, "12000000");
        wizard.set_field(fields::EXPENSES, "7500000");
        wizard.set_field(fields::ACTIVITY_DESCRIPTION, "Bazar akhir pekan.");
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.set_field(fields::CONFIRMATION, true);
        wizard
    }

    // =========================================================================
    // Step gates
    // =========================================================================

    #[test]
    fn starts_on_first_open_period() {
        let wizard = ReportingWizard::new(catalog());

        assert_eq!(wizard.draft().text(fields::PERIOD_ID), "nov-2025");
        assert_eq!(wizard.step(), 0);
        assert_eq!(wizard.step_name(), "Data Inti");
    }

    #[test]
    fn submitted_period_blocks_step_zero() {
        let mut wizard = ReportingWizard::new(catalog());
        wizard.set_field(fields::PERIOD_ID, "oct-2025");
        wizard.set_field(fields::REVENUE, "100");

        let err = wizard.advance().unwrap_err();

        assert_eq!(err.messages(), vec![DUPLICATE_PERIOD_MESSAGE]);
        assert_eq!(wizard.step(), 0);
    }

    #[test]
    fn negative_figures_are_all_reported() {
        let mut wizard = ReportingWizard::new(catalog());
        wizard.set_field(fields::REVENUE, "-1");
        wizard.set_field(fields::EMPLOYEES, "-3");

        let err = wizard.advance().unwrap_err();

        assert_eq!(
            err.messages(),
            vec![
                "Pendapatan tidak boleh bernilai negatif.",
                "Jumlah Karyawan Aktif tidak boleh bernilai negatif.",
            ]
        );
    }

    #[test]
    fn empty_figures_block_step_zero() {
        let mut wizard = ReportingWizard::new(catalog());

        let err = wizard.advance().unwrap_err();

        assert!(err.has_kind(ViolationKind::MissingGroup));
    }

    #[test]
    fn activity_description_gates_step_one() {
        let mut wizard = ReportingWizard::new(catalog());
        wizard.set_field(fields::EMPLOYEES, "2");
        wizard.advance().unwrap();

        let err = wizard.advance().unwrap_err();

        assert_eq!(err.messages(), vec![ACTIVITY_MESSAGE]);
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    #[test]
    fn profit_treats_blank_as_zero() {
        let mut wizard = ReportingWizard::new(catalog());
        wizard.set_field(fields::EXPENSES, "7500000");

        assert_eq!(wizard.profit(), dec!(-7500000));

        wizard.set_field(fields::REVENUE, "12000000");
        assert_eq!(wizard.profit(), dec!(4500000));
    }

    #[test]
    fn review_formats_amounts_and_labels() {
        let mut wizard = filled_wizard();
        wizard.toggle_id(fields::PHOTO_IDS, "buku-kas");
        wizard.toggle_id(fields::SALES_CHANNELS, "Offline");

        let review = wizard.review();
        let value = |label: &str| {
            review
                .iter()
                .find(|row| row.label == label)
                .map(|row| row.value.clone())
                .unwrap()
        };

        assert_eq!(value("Periode"), "November 2025");
        assert_eq!(value("Pendapatan"), "Rp 12.000.000");
        assert_eq!(value("Laba"), "Rp 4.500.000");
        assert_eq!(value("Transaksi"), "-");
        assert_eq!(value("Saluran Penjualan"), "Offline");
        assert_eq!(value("Foto Pendukung"), "Foto Buku Kas November");
        assert_eq!(value("Lampiran"), "-");
    }

    #[test]
    fn older_unreported_period_is_late() {
        let mut catalog = catalog();
        catalog
            .periods
            .push(period("aug-2025", "Agustus 2025", ReportStatus::NotSubmitted));
        let mut wizard = ReportingWizard::new(catalog);

        assert!(!wizard.period_is_late());
        wizard.set_field(fields::PERIOD_ID, "aug-2025");
        assert!(wizard.period_is_late());
    }

    #[test]
    fn timeline_completes_first_stage_once_confirmed_on_review() {
        let wizard = filled_wizard();

        let states: Vec<_> = wizard.timeline().iter().map(|s| s.state).collect();

        assert_eq!(
            states,
            vec![StageState::Completed, StageState::Upcoming, StageState::Upcoming]
        );
    }

    // =========================================================================
    // Submission
    // =========================================================================

    #[test]
    fn submit_records_period_and_resets() {
        let mut wizard = filled_wizard();

        let receipt = wizard.submit().unwrap();

        assert_eq!(receipt.period_label, "November 2025");
        assert_eq!(receipt.profit, dec!(4500000));
        assert!(wizard.catalog().submitted_periods.contains(&"nov-2025".to_string()));
        assert_eq!(
            wizard.catalog().period("nov-2025").map(|p| p.status),
            Some(ReportStatus::Submitted)
        );
        assert_eq!(wizard.step(), 0);
        assert_eq!(wizard.draft().text(fields::REVENUE), "");
        assert!(!wizard.draft().flag(fields::CONFIRMATION));
    }

    #[test]
    fn resubmitting_the_same_period_is_a_duplicate() {
        let mut wizard = filled_wizard();
        wizard.submit().unwrap();

        wizard.set_field(fields::PERIOD_ID, "nov-2025");
        wizard.set_field(fields::REVENUE, "1");

        let err = wizard.advance().unwrap_err();
        assert!(err.has_kind(ViolationKind::DuplicatePeriod));
    }

    #[test]
    fn submit_without_confirmation_fails() {
        let mut wizard = filled_wizard();
        wizard.set_field(fields::CONFIRMATION, false);

        let Err(SubmissionError::Validation(err)) = wizard.submit() else {
            panic!("expected a validation failure");
        };
        assert_eq!(err.messages(), vec![CONFIRMATION_MESSAGE]);
        assert_eq!(wizard.step(), 2);
    }

    #[test]
    fn submit_before_review_step_is_rejected() {
        let mut wizard = ReportingWizard::new(catalog());

        assert!(matches!(
            wizard.submit(),
            Err(SubmissionError::NotAtFinalStep { current: 0, last: 2 })
        ));
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut wizard = filled_wizard();

        let pending = wizard.begin_submit().unwrap();
        assert!(matches!(wizard.begin_submit(), Err(SubmissionError::InFlight)));
        assert!(matches!(wizard.submit(), Err(SubmissionError::InFlight)));

        let receipt = wizard.finish_submit(pending);
        assert_eq!(receipt.period_id, "nov-2025");
        assert!(!wizard.is_pending());
    }

    #[test]
    fn abandoned_submit_keeps_the_draft() {
        let mut wizard = filled_wizard();

        let pending = wizard.begin_submit().unwrap();
        wizard.abandon_submit(pending);

        assert!(!wizard.is_pending());
        assert_eq!(wizard.draft().text(fields::REVENUE), "12000000");
        assert!(wizard.submit().is_ok());
    }
}
