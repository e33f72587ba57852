//! Integration tests for the bundled catalog and its use by the core forms.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use umkm_core::calculations::{check_against_product, monthly_installment};
use umkm_core::profile::{ProfileEditor, fields as profile_fields};
use umkm_core::reporting::{DUPLICATE_PERIOD_MESSAGE, ReportingWizard, fields};
use umkm_core::{Actor, ChangeStatus, GeoPoint, LoanQuoteInput, ReportStatus};
use umkm_data::{CatalogError, CatalogLoader, KbliLoader, default_bundle};

const TEST_KBLI_CSV: &str = "code,label\n56102,Usaha Rumah Makan\n10792,Industri Roti dan Kue Basah\n";

#[test]
fn test_bundled_catalog_parses() {
    let bundle = default_bundle().expect("bundled catalog should be valid");
    let catalog = &bundle.catalog;

    assert_eq!(catalog.period_ids(), vec!["nov-2025", "oct-2025", "sep-2025", "aug-2025"]);
    assert_eq!(catalog.submitted_periods, vec!["oct-2025", "sep-2025", "aug-2025"]);
    assert_eq!(catalog.kbli.len(), 5);
    assert_eq!(catalog.vault_items.len(), 6);
    assert_eq!(catalog.scales, vec!["Mikro", "Kecil", "Menengah"]);
    assert_eq!(
        catalog.period("aug-2025").map(|p| p.status),
        Some(ReportStatus::Verified)
    );
}

#[test]
fn test_bundled_loan_products() {
    let bundle = default_bundle().unwrap();
    let catalog = &bundle.catalog;

    let kur = catalog.loan_product("KUR").expect("KUR is bundled");
    assert_eq!(kur.annual_rate_percent, Some(dec!(6)));
    assert_eq!(kur.tenor_options, vec![12, 24, 36, 48, 60]);
    assert_eq!(kur.eligibility.len(), 4);

    let umi = catalog.loan_product("umi").unwrap();
    assert_eq!(umi.max_principal, Some(dec!(20000000)));

    let lpdb = catalog.loan_product("lpdb").unwrap();
    assert_eq!(lpdb.annual_rate_percent, None);
    assert_eq!(
        lpdb.eligibility[0].note.as_deref(),
        Some("Lampirkan akta dan pengesahan.")
    );
}

#[test]
fn test_umi_quote_from_bundled_rate() {
    let bundle = default_bundle().unwrap();
    let umi = bundle.catalog.loan_product("umi").unwrap();

    let quote = monthly_installment(&LoanQuoteInput {
        principal: dec!(8000000),
        annual_rate_percent: umi.annual_rate_percent.unwrap(),
        term_months: 12,
    })
    .unwrap();

    assert_eq!(quote.rounded_installment(), dec!(677550));
    assert!(check_against_product(umi, dec!(8000000), 12).is_empty());
    assert_eq!(check_against_product(umi, dec!(25000000), 24).len(), 2);
}

#[test]
fn test_bundled_profile_seed() {
    let bundle = default_bundle().unwrap();
    let seed = &bundle.seed;

    assert_eq!(seed.profile.text(profile_fields::BUSINESS_NAME), "Kopi Nusantara Sejahtera");
    assert_eq!(seed.profile.text(profile_fields::CAPITAL), "150000000");
    assert_eq!(
        seed.profile.geo(profile_fields::GEO_LOCATION),
        GeoPoint::new(-6.8915, 107.6107)
    );
    assert_eq!(seed.history.len(), 2);
    assert_eq!(seed.history[1].actor, Actor::Admin);
    assert_eq!(seed.history[0].status, ChangeStatus::Approved);
}

#[test]
fn test_reporting_wizard_on_bundled_catalog() {
    let bundle = default_bundle().unwrap();
    let mut wizard = ReportingWizard::new(bundle.catalog);

    assert_eq!(wizard.draft().text(fields::PERIOD_ID), "nov-2025");

    wizard.set_field(fields::PERIOD_ID, "sep-2025");
    wizard.set_field(fields::REVENUE, "12000000");
    let err = wizard.advance().unwrap_err();
    assert_eq!(err.messages(), vec![DUPLICATE_PERIOD_MESSAGE]);

    wizard.set_field(fields::PERIOD_ID, "nov-2025");
    wizard.set_field(fields::ACTIVITY_DESCRIPTION, "Ikut bazar UMKM kota.");
    wizard.toggle_id(fields::ATTACHMENT_IDS, "invoice-nov");
    wizard.advance().unwrap();
    wizard.advance().unwrap();
    wizard.set_field(fields::CONFIRMATION, true);

    let receipt = wizard.submit().unwrap();

    assert_eq!(receipt.period_label, "November 2025");
    assert_eq!(
        wizard.catalog().period("nov-2025").map(|p| p.status),
        Some(ReportStatus::Submitted)
    );
}

#[test]
fn test_profile_editor_on_bundled_seed() {
    let bundle = default_bundle().unwrap();
    let mut editor = ProfileEditor::new(bundle.catalog, bundle.seed.profile, bundle.seed.history);

    assert_eq!(editor.completion_percent(), 100);

    editor.set_field(profile_fields::KBLI, "47221");
    editor.pick_location(GeoPoint::new(-6.8902, 107.6115));
    let record = editor.confirm().unwrap();

    assert_eq!(record.id, "hist-3");
    assert_eq!(
        record.changes,
        vec!["Kode KBLI: 56102 → 47221", "Geotag lokasi usaha berubah."]
    );
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn test_custom_kbli_table() {
    let kbli = KbliLoader::parse(TEST_KBLI_CSV.as_bytes()).unwrap();

    let bundle = CatalogLoader::parse("scales = [\"Mikro\"]", kbli).unwrap();

    assert_eq!(bundle.catalog.kbli_codes(), vec!["56102", "10792"]);
}

#[test]
fn test_missing_catalog_file_reports_path() {
    let result = CatalogLoader::load(std::path::Path::new("does/not/exist.toml"), None);

    let Err(err @ CatalogError::Io { .. }) = result else {
        panic!("expected an I/O error");
    };
    assert!(err.to_string().contains("does/not/exist.toml"));
}

#[test]
fn test_malformed_toml_is_reported() {
    let result = CatalogLoader::parse("periods = [", Vec::new());

    assert!(matches!(result, Err(CatalogError::Toml(_))));
}
