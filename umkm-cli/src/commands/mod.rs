//! Subcommands of the `umkm` binary.
//!
//! Every command writes its report to the `out` writer it is given, so the
//! binary passes stdout and tests pass a `Vec<u8>`.

pub mod catalog;
pub mod eligibility;
pub mod profile;
pub mod quote;
pub mod report;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use toml::Table;
use umkm_core::{FormDraft, StageState, TimelineStage};
use umkm_data::draft_from_table;

/// Reads a TOML file of `field = value` pairs.
pub fn read_draft(path: &Path) -> Result<FormDraft> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table: Table =
        toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    draft_from_table(&table).with_context(|| format!("Invalid field in {}", path.display()))
}

pub(crate) fn write_violations(
    out: &mut impl Write,
    messages: &[String],
) -> Result<()> {
    writeln!(out, "Periksa Data")?;
    for message in messages {
        writeln!(out, "  - {message}")?;
    }
    Ok(())
}

pub(crate) fn write_timeline(
    out: &mut impl Write,
    stages: &[TimelineStage],
) -> Result<()> {
    for stage in stages {
        let marker = match stage.state {
            StageState::Completed => "[x]",
            StageState::Current => "[>]",
            StageState::Upcoming => "[ ]",
        };
        writeln!(out, "  {marker} {}: {}", stage.title, stage.description)?;
    }
    Ok(())
}
