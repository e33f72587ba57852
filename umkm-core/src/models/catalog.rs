//! Reference data the forms validate against.
//!
//! A [`Catalog`] is built once (usually by the `umkm-data` loader) and handed
//! to the reporting wizard and profile editor at construction. Nothing in
//! this crate holds catalog data in a global.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::ReportStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub id: String,
    pub label: String,
    pub due_date: String,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultItemKind {
    Image,
    Pdf,
    Document,
}

/// A previously uploaded document that forms can reference by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultItem {
    pub id: String,
    pub label: String,
    pub kind: VaultItemKind,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbliOption {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityQuestion {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default = "default_required_yes")]
    pub required_yes: bool,
}

fn default_required_yes() -> bool {
    true
}

/// A financing program with its own rate and tenor presets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProduct {
    pub code: String,
    pub name: String,
    /// Annual interest rate in percent (`6` means 6% per year).
    ///
    /// Programs without a published rate offer no installment estimate.
    #[serde(default)]
    pub annual_rate_percent: Option<Decimal>,
    #[serde(default)]
    pub tenor_options: Vec<u32>,
    #[serde(default)]
    pub max_principal: Option<Decimal>,
    #[serde(default)]
    pub eligibility: Vec<EligibilityQuestion>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub periods: Vec<ReportingPeriod>,
    /// Period ids that already have a report on file.
    pub submitted_periods: Vec<String>,
    pub sales_channels: Vec<String>,
    pub vault_items: Vec<VaultItem>,
    pub kbli: Vec<KbliOption>,
    pub sectors: Vec<String>,
    pub scales: Vec<String>,
    pub loan_products: Vec<LoanProduct>,
}

impl Catalog {
    pub fn period(
        &self,
        id: &str,
    ) -> Option<&ReportingPeriod> {
        self.periods.iter().find(|p| p.id == id)
    }

    pub fn period_ids(&self) -> Vec<String> {
        self.periods.iter().map(|p| p.id.clone()).collect()
    }

    pub fn kbli_codes(&self) -> Vec<String> {
        self.kbli.iter().map(|k| k.code.clone()).collect()
    }

    pub fn loan_product(
        &self,
        code: &str,
    ) -> Option<&LoanProduct> {
        self.loan_products
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
    }

    pub fn vault_label(
        &self,
        id: &str,
    ) -> Option<&str> {
        self.vault_items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.label.as_str())
    }

    /// Resolves document ids to their labels for display.
    ///
    /// Ids with no vault entry are skipped. A selection with nothing left to
    /// show renders as `-`.
    pub fn vault_labels(
        &self,
        ids: &[String],
    ) -> String {
        let labels = ids
            .iter()
            .filter_map(|id| self.vault_label(id))
            .collect::<Vec<_>>();
        if labels.is_empty() {
            return "-".to_string();
        }
        labels.join(", ")
    }
}
