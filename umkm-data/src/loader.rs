use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use toml::{Table, Value};
use tracing::debug;
use umkm_core::{
    AuditRecord, Catalog, FieldValue, FormDraft, GeoPoint, KbliOption, LoanProduct,
    ReportingPeriod, VaultItem,
};

/// Errors that can occur when loading catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        CatalogError::CsvParse(err.to_string())
    }
}

/// A single row of the KBLI table.
///
/// The CSV has two columns:
/// - `code`: the five-digit KBLI code (kept as text; leading zeros matter)
/// - `label`: the activity description
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KbliRecord {
    pub code: String,
    pub label: String,
}

/// Loader for the KBLI code table.
pub struct KbliLoader;

impl KbliLoader {
    /// Parse KBLI options from a CSV reader.
    ///
    /// Surrounding whitespace is trimmed; rows with an empty code and
    /// repeated codes are rejected.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<KbliOption>, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = HashSet::new();
        let mut options = Vec::new();

        for result in csv_reader.deserialize() {
            let record: KbliRecord = result?;
            if record.code.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "KBLI row '{}' has no code",
                    record.label
                )));
            }
            if !seen.insert(record.code.clone()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate KBLI code {}",
                    record.code
                )));
            }
            options.push(KbliOption {
                code: record.code,
                label: record.label,
            });
        }

        Ok(options)
    }
}

/// The committed profile a session starts from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileSeed {
    pub profile: FormDraft,
    /// Most recent first.
    pub history: Vec<AuditRecord>,
}

/// Everything read from one catalog file plus its KBLI table.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogBundle {
    pub catalog: Catalog,
    pub seed: ProfileSeed,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    periods: Vec<ReportingPeriod>,
    #[serde(default)]
    submitted_periods: Vec<String>,
    #[serde(default)]
    sales_channels: Vec<String>,
    #[serde(default)]
    vault_items: Vec<VaultItem>,
    #[serde(default)]
    sectors: Vec<String>,
    #[serde(default)]
    scales: Vec<String>,
    #[serde(default)]
    loan_products: Vec<LoanProduct>,
    #[serde(default)]
    profile: Table,
    #[serde(default)]
    history: Vec<AuditRecord>,
}

/// Loader for the TOML catalog file.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse a catalog document, attaching the given KBLI options.
    pub fn parse(
        catalog_toml: &str,
        kbli: Vec<KbliOption>,
    ) -> Result<CatalogBundle, CatalogError> {
        let file: CatalogFile = toml::from_str(catalog_toml)?;

        let catalog = Catalog {
            periods: file.periods,
            submitted_periods: file.submitted_periods,
            sales_channels: file.sales_channels,
            vault_items: file.vault_items,
            kbli,
            sectors: file.sectors,
            scales: file.scales,
            loan_products: file.loan_products,
        };
        validate_catalog(&catalog)?;

        let seed = ProfileSeed {
            profile: draft_from_table(&file.profile)?,
            history: file.history,
        };

        debug!(
            periods = catalog.periods.len(),
            kbli = catalog.kbli.len(),
            loan_products = catalog.loan_products.len(),
            history = seed.history.len(),
            "catalog parsed"
        );
        Ok(CatalogBundle { catalog, seed })
    }

    /// Read a catalog file from disk.
    ///
    /// Without `kbli_path` the bundled KBLI table is used.
    pub fn load(
        catalog_path: &Path,
        kbli_path: Option<&Path>,
    ) -> Result<CatalogBundle, CatalogError> {
        let catalog_toml = read_file(catalog_path)?;
        let kbli = match kbli_path {
            Some(path) => KbliLoader::parse(read_file(path)?.as_bytes())?,
            None => KbliLoader::parse(crate::DEFAULT_KBLI_CSV.as_bytes())?,
        };
        Self::parse(&catalog_toml, kbli)
    }
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks the cross-references a catalog relies on.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), CatalogError> {
    let mut period_ids = HashSet::new();
    for period in &catalog.periods {
        if !period_ids.insert(period.id.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "duplicate period id {}",
                period.id
            )));
        }
    }
    if let Some(unknown) = catalog
        .submitted_periods
        .iter()
        .find(|id| !period_ids.contains(id.as_str()))
    {
        return Err(CatalogError::Invalid(format!(
            "submitted period {unknown} is not a known period"
        )));
    }

    let mut vault_ids = HashSet::new();
    for item in &catalog.vault_items {
        if !vault_ids.insert(item.id.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "duplicate vault item id {}",
                item.id
            )));
        }
    }

    let mut product_codes = HashSet::new();
    for product in &catalog.loan_products {
        if !product_codes.insert(product.code.to_ascii_lowercase()) {
            return Err(CatalogError::Invalid(format!(
                "duplicate loan product {}",
                product.code
            )));
        }
        if product
            .annual_rate_percent
            .is_some_and(|rate| rate < Decimal::ZERO)
        {
            return Err(CatalogError::Invalid(format!(
                "loan product {} has a negative rate",
                product.code
            )));
        }
        if product.tenor_options.contains(&0) {
            return Err(CatalogError::Invalid(format!(
                "loan product {} offers a zero-month tenor",
                product.code
            )));
        }
    }

    Ok(())
}

/// Converts a TOML table of `field = value` pairs into a form draft.
///
/// | TOML value                | Field value            |
/// |---------------------------|------------------------|
/// | string, integer, float    | text, exactly as given |
/// | boolean                   | flag                   |
/// | array of strings          | id list                |
/// | table with `lat` / `lng`  | geotag                 |
pub fn draft_from_table(table: &Table) -> Result<FormDraft, CatalogError> {
    let mut draft = FormDraft::new();
    for (field, value) in table {
        draft.set(field, field_value(field, value)?);
    }
    Ok(draft)
}

fn field_value(
    field: &str,
    value: &Value,
) -> Result<FieldValue, CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    match value {
        Value::String(s) => Ok(FieldValue::Text(s.clone())),
        Value::Integer(i) => Ok(FieldValue::Text(i.to_string())),
        Value::Float(f) => Ok(FieldValue::Text(f.to_string())),
        Value::Boolean(b) => Ok(FieldValue::Flag(*b)),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("lists may only contain strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::Ids),
        Value::Table(t) => {
            let coord = |key: &str| -> Result<Option<f64>, CatalogError> {
                match t.get(key) {
                    None => Ok(None),
                    Some(Value::Float(f)) => Ok(Some(*f)),
                    Some(Value::Integer(i)) => Ok(Some(*i as f64)),
                    Some(_) => Err(invalid("coordinates must be numbers")),
                }
            };
            if t.keys().any(|k| k != "lat" && k != "lng") {
                return Err(invalid("only 'lat' and 'lng' are allowed in a geotag"));
            }
            Ok(FieldValue::Geo(GeoPoint {
                lat: coord("lat")?,
                lng: coord("lng")?,
            }))
        }
        Value::Datetime(_) => Err(invalid("dates are not supported; use a string")),
    }
}
