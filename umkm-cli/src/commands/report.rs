use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::info;
use umkm_core::Catalog;
use umkm_core::calculations::common::format_rupiah;
use umkm_core::reporting::ReportingWizard;
use umkm_core::submission::SubmissionError;

use super::{read_draft, write_timeline, write_violations};

/// Fill in the monthly activity report and optionally submit it.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// TOML file with report fields (periodId, revenue, expenses, ...).
    #[arg(long)]
    pub draft: Option<PathBuf>,

    /// Submit the report once every step passes.
    #[arg(long, default_value_t = false)]
    pub submit: bool,

    /// Artificial delay before the submission is recorded, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,
}

pub async fn run(
    args: &ReportArgs,
    catalog: Catalog,
    out: &mut impl Write,
) -> Result<()> {
    let mut wizard = ReportingWizard::new(catalog);
    if let Some(path) = &args.draft {
        for (field, value) in read_draft(path)?.fields() {
            wizard.set_field(field, value.clone());
        }
    }

    loop {
        writeln!(out, "Langkah {}: {}", wizard.step() + 1, wizard.step_name())?;
        if wizard.is_final_step() {
            break;
        }
        if let Err(err) = wizard.advance() {
            return write_violations(out, &err.messages());
        }
    }

    if wizard.period_is_late() {
        writeln!(out, "Periode ini terlambat dilaporkan.")?;
    }
    writeln!(out, "Laba / Selisih Otomatis: {}", format_rupiah(wizard.profit()))?;
    writeln!(out, "Ringkasan")?;
    for row in wizard.review() {
        writeln!(out, "  {:<20}: {}", row.label, row.value)?;
    }

    writeln!(out, "Status")?;
    write_timeline(out, &wizard.timeline())?;

    if !args.submit {
        return Ok(());
    }

    let pending = match wizard.begin_submit() {
        Ok(pending) => pending,
        Err(SubmissionError::Validation(err)) => return write_violations(out, &err.messages()),
        Err(err) => return Err(err.into()),
    };
    if args.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
    }
    let receipt = wizard.finish_submit(pending);
    info!(period = %receipt.period_id, "report recorded");

    writeln!(out, "Laporan Diajukan")?;
    writeln!(
        out,
        "Laporan {} telah terkirim dan menunggu verifikasi.",
        receipt.period_label
    )?;
    Ok(())
}
