use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Args;
use umkm_core::GeoPoint;
use umkm_core::profile::ProfileEditor;
use umkm_core::submission::{NO_CHANGES_TITLE, SubmissionError};
use umkm_data::CatalogBundle;

use super::{read_draft, write_timeline, write_violations};

/// Review and submit changes to the business profile.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// TOML file with the profile fields to change.
    #[arg(long)]
    pub edits: Option<PathBuf>,

    /// Replace the geotag, as `LAT,LNG`.
    #[arg(long, value_name = "LAT,LNG", value_parser = parse_geo, allow_hyphen_values = true)]
    pub pick_location: Option<GeoPoint>,

    /// List KBLI codes matching a code fragment or label words, then exit.
    #[arg(long, value_name = "QUERY")]
    pub kbli_search: Option<String>,

    /// Commit the changes after showing them.
    #[arg(long, default_value_t = false)]
    pub submit: bool,

    /// Artificial delay before the change is committed, in milliseconds.
    #[arg(long, default_value_t = 800)]
    pub delay_ms: u64,

    /// Number of history entries to show.
    #[arg(long, default_value_t = 5)]
    pub history: usize,
}

fn parse_geo(s: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{s}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok(GeoPoint::new(coord(lat)?, coord(lng)?))
}

pub async fn run(
    args: &ProfileArgs,
    bundle: CatalogBundle,
    out: &mut impl Write,
) -> Result<()> {
    let CatalogBundle { catalog, seed } = bundle;
    let mut editor = ProfileEditor::new(catalog, seed.profile, seed.history);

    if let Some(query) = &args.kbli_search {
        let suggestions = editor.kbli_suggestions(query);
        if suggestions.is_empty() {
            writeln!(out, "Tidak ada kode KBLI yang cocok.")?;
        }
        for option in suggestions {
            writeln!(out, "  {} {}", option.code, option.label)?;
        }
        return Ok(());
    }

    if let Some(path) = &args.edits {
        for (field, value) in read_draft(path)?.fields() {
            editor.set_field(field, value.clone());
        }
    }
    if let Some(point) = args.pick_location {
        editor.pick_location(point);
    }

    writeln!(out, "Kelengkapan Profil: {}% lengkap", editor.completion_percent())?;

    match editor.prepare_submission() {
        Ok(diff) => {
            writeln!(out, "Konfirmasi Perubahan")?;
            for entry in &diff {
                writeln!(out, "  - {entry}")?;
            }
            if args.submit {
                let record = editor
                    .confirm_after(Duration::from_millis(args.delay_ms))
                    .await?;
                writeln!(out, "Pembaruan Diajukan ({})", record.id)?;
                writeln!(out, "Data usaha Anda menunggu verifikasi petugas.")?;
            }
        }
        Err(SubmissionError::Validation(err)) => write_violations(out, &err.messages())?,
        Err(SubmissionError::EmptyDiff) => {
            writeln!(out, "{NO_CHANGES_TITLE}")?;
            writeln!(out, "{}", SubmissionError::EmptyDiff)?;
        }
        Err(err) => return Err(err.into()),
    }

    writeln!(out, "Status Verifikasi")?;
    write_timeline(out, &editor.timeline())?;

    writeln!(out, "Riwayat Perubahan")?;
    for record in editor.history().iter().take(args.history) {
        writeln!(
            out,
            "  {} {} oleh {} [{}]: {}",
            record.id,
            record.timestamp.with_timezone(&Local).format("%d-%m-%Y"),
            record.actor.as_str(),
            record.status,
            record.changes.join("; ")
        )?;
    }
    Ok(())
}
