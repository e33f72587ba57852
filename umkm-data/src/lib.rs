//! Reference data loading for the UMKM services forms.
//!
//! The catalog (reporting periods, vault documents, sectors, loan programs
//! and the profile seed) is a TOML document; the KBLI code table is a CSV
//! file with `code,label` columns. Both ship with the crate, so
//! [`default_bundle`] works without any files on disk.

mod loader;

pub use loader::{
    CatalogBundle, CatalogError, CatalogLoader, KbliLoader, KbliRecord, ProfileSeed,
    draft_from_table, validate_catalog,
};

/// The bundled catalog document.
pub const DEFAULT_CATALOG_TOML: &str = include_str!("../data/catalog.toml");

/// The bundled KBLI table.
pub const DEFAULT_KBLI_CSV: &str = include_str!("../data/kbli.csv");

/// Parses the bundled catalog and KBLI table.
pub fn default_bundle() -> Result<CatalogBundle, CatalogError> {
    let kbli = KbliLoader::parse(DEFAULT_KBLI_CSV.as_bytes())?;
    CatalogLoader::parse(DEFAULT_CATALOG_TOML, kbli)
}
