use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use rust_decimal::Decimal;
use tracing::debug;
use umkm_core::calculations::common::{amount_or_zero, digits_only, format_rupiah};
use umkm_core::calculations::{check_against_product, monthly_installment};
use umkm_core::{Catalog, LoanQuoteInput};

/// Estimate the monthly installment of a financing program.
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Program code (kur, umi, ...).
    #[arg(long, default_value = "kur")]
    pub program: String,

    /// Requested amount (plafon). Non-digits are ignored, so "Rp 150.000.000" works.
    #[arg(long, default_value = "")]
    pub principal: String,

    /// Term in months (tenor).
    #[arg(long, default_value = "")]
    pub tenor: String,

    /// Annual rate in percent, overriding the program's rate.
    #[arg(long)]
    pub rate: Option<Decimal>,
}

pub fn run(
    args: &QuoteArgs,
    catalog: &Catalog,
    out: &mut impl Write,
) -> Result<()> {
    let product = catalog
        .loan_product(&args.program)
        .with_context(|| format!("Unknown program '{}'", args.program))?;
    let rate = args
        .rate
        .or(product.annual_rate_percent)
        .with_context(|| format!("{} has no published rate; pass --rate", product.name))?;

    let principal = amount_or_zero(&digits_only(&args.principal));
    let tenor_digits = digits_only(&args.tenor);
    let term_months: i64 = tenor_digits.parse().unwrap_or(0);
    debug!(program = %product.code, %principal, term_months, %rate, "quote requested");

    writeln!(out, "{}", product.name)?;
    writeln!(out, "  Plafon Diminta     : {}", format_rupiah(principal))?;
    let tenor = if tenor_digits.is_empty() { "-" } else { tenor_digits.as_str() };
    writeln!(out, "  Tenor              : {tenor} bulan")?;
    writeln!(out, "  Bunga per Tahun    : {rate}%")?;

    let quote = match monthly_installment(&LoanQuoteInput {
        principal,
        annual_rate_percent: rate,
        term_months,
    }) {
        Ok(quote) => quote,
        Err(err) => {
            writeln!(out, "  Estimasi Angsuran  : {}", err.placeholder())?;
            return Ok(());
        }
    };

    writeln!(out, "  Estimasi Angsuran  : {}", format_rupiah(quote.monthly_installment))?;
    writeln!(out, "  Total Pembayaran   : {}", format_rupiah(quote.total_repayment))?;
    writeln!(out, "  Total Bunga        : {}", format_rupiah(quote.total_interest))?;

    for problem in check_against_product(product, principal, term_months) {
        writeln!(out, "  Catatan: {problem}")?;
    }
    Ok(())
}
