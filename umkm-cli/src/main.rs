use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use umkm_cli::commands::{self, eligibility, profile, quote, report};
use umkm_cli::logging::{self, LogArgs};
use umkm_data::{CatalogBundle, CatalogLoader, default_bundle};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Business services for micro, small and medium enterprises (UMKM).
///
/// Loads the catalog (the bundled one unless `--catalog` is given) and runs
/// one of the forms or calculators against it.
#[derive(Debug, Parser)]
#[command(name = "umkm", version, about)]
struct Cli {
    /// Catalog TOML file.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// KBLI CSV file with `code,label` columns.
    #[arg(long, global = true)]
    kbli: Option<PathBuf>,

    #[command(flatten)]
    log: LogArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate a loan installment.
    Quote(quote::QuoteArgs),
    /// Run a program's eligibility questionnaire.
    Eligibility(eligibility::EligibilityArgs),
    /// Fill in and submit the monthly activity report.
    Report(report::ReportArgs),
    /// Review and submit business profile changes.
    Profile(profile::ProfileArgs),
    /// Show the loaded reference data.
    Catalog,
}

// ─── setup ───────────────────────────────────────────────────────────────────

fn load_bundle(cli: &Cli) -> Result<CatalogBundle> {
    match &cli.catalog {
        Some(path) => {
            debug!(catalog = %path.display(), "loading catalog");
            CatalogLoader::load(path, cli.kbli.as_deref())
                .with_context(|| format!("Failed to load catalog: {}", path.display()))
        }
        None => default_bundle().context("Bundled catalog is invalid"),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log)?;

    let bundle = load_bundle(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Quote(args) => quote::run(args, &bundle.catalog, &mut out),
        Command::Eligibility(args) => eligibility::run(args, &bundle.catalog, &mut out),
        Command::Report(args) => report::run(args, bundle.catalog, &mut out).await,
        Command::Profile(args) => profile::run(args, bundle, &mut out).await,
        Command::Catalog => commands::catalog::run(&bundle.catalog, &mut out),
    }
}
