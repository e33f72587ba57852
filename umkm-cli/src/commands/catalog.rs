use std::io::Write;

use anyhow::Result;
use umkm_core::Catalog;

/// Prints the reference data the forms validate against.
pub fn run(
    catalog: &Catalog,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Periode Laporan")?;
    for period in &catalog.periods {
        writeln!(
            out,
            "  {:<10} {:<16} jatuh tempo {:<18} {}",
            period.id, period.label, period.due_date, period.status
        )?;
    }

    writeln!(out, "Program Pembiayaan")?;
    for product in &catalog.loan_products {
        let rate = product
            .annual_rate_percent
            .map_or_else(|| "-".to_string(), |r| format!("{r}%"));
        let tenors = product
            .tenor_options
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("/");
        writeln!(out, "  {:<6} {} (bunga {rate}, tenor {tenors})", product.code, product.name)?;
    }

    writeln!(out, "Dokumen Tersimpan")?;
    for item in &catalog.vault_items {
        writeln!(out, "  {:<14} {} ({})", item.id, item.label, item.updated_at)?;
    }

    writeln!(out, "KBLI")?;
    for option in &catalog.kbli {
        writeln!(out, "  {} {}", option.code, option.label)?;
    }

    writeln!(out, "Saluran Penjualan: {}", catalog.sales_channels.join(", "))?;
    writeln!(out, "Sektor: {}", catalog.sectors.join(", "))?;
    writeln!(out, "Skala: {}", catalog.scales.join(", "))?;
    Ok(())
}
