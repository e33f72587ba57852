use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use umkm_data::{CatalogBundle, CatalogLoader, default_bundle};

/// Validate a catalog file and its KBLI table, then print a summary.
///
/// The catalog is a TOML document with the following top-level keys:
/// - periods, submitted_periods: reporting periods and those already reported
/// - sales_channels, sectors, scales: choice lists
/// - vault_items: documents forms may reference
/// - loan_products: financing programs with eligibility questions
/// - profile, history: the committed business profile and its changes
#[derive(Parser, Debug)]
#[command(name = "umkm-catalog-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the catalog TOML file (the bundled catalog when omitted)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Path to a KBLI CSV file with `code,label` columns
    #[arg(short, long, requires = "catalog")]
    kbli: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let bundle = match &args.catalog {
        Some(path) => {
            println!("Checking catalog: {}", path.display());
            CatalogLoader::load(path, args.kbli.as_deref())
                .with_context(|| format!("Failed to load catalog: {}", path.display()))?
        }
        None => {
            println!("Checking bundled catalog");
            default_bundle().context("Bundled catalog is invalid")?
        }
    };

    print_summary(&bundle);
    println!("Catalog is valid.");

    Ok(())
}

fn print_summary(bundle: &CatalogBundle) {
    let catalog = &bundle.catalog;
    println!(
        "  {} periods ({} already reported)",
        catalog.periods.len(),
        catalog.submitted_periods.len()
    );
    println!("  {} vault documents", catalog.vault_items.len());
    println!("  {} KBLI codes", catalog.kbli.len());
    println!(
        "  {} sectors, {} scales, {} sales channels",
        catalog.sectors.len(),
        catalog.scales.len(),
        catalog.sales_channels.len()
    );
    for product in &catalog.loan_products {
        println!(
            "  loan program {} ({} eligibility questions)",
            product.code,
            product.eligibility.len()
        );
    }
    println!(
        "  profile seed with {} fields and {} history records",
        bundle.seed.profile.fields().count(),
        bundle.seed.history.len()
    );
}
