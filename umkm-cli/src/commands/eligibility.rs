use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::warn;
use umkm_core::Catalog;
use umkm_core::calculations::{Answer, assess};

/// Run a program's quick eligibility questionnaire.
#[derive(Debug, Args)]
pub struct EligibilityArgs {
    /// Program code (kur, umi, lpdb, ...).
    #[arg(long, default_value = "kur")]
    pub program: String,

    /// An answer as `question=ya` or `question=tidak`. Repeat for each question.
    #[arg(long = "answer", value_name = "ID=ANSWER")]
    pub answers: Vec<String>,
}

fn parse_answers(raw: &[String]) -> Result<HashMap<String, Answer>> {
    raw.iter()
        .map(|entry| -> Result<(String, Answer)> {
            let (id, answer) = entry
                .split_once('=')
                .with_context(|| format!("Expected ID=ANSWER, got '{entry}'"))?;
            let Some(answer) = Answer::parse(answer) else {
                bail!("Answer for '{id}' must be 'ya' or 'tidak', got '{answer}'");
            };
            Ok((id.trim().to_string(), answer))
        })
        .collect()
}

pub fn run(
    args: &EligibilityArgs,
    catalog: &Catalog,
    out: &mut impl Write,
) -> Result<()> {
    let product = catalog
        .loan_product(&args.program)
        .with_context(|| format!("Unknown program '{}'", args.program))?;
    let answers = parse_answers(&args.answers)?;

    for id in answers.keys() {
        if !product.eligibility.iter().any(|q| &q.id == id) {
            warn!(program = %product.code, question = %id, "answer for unknown question ignored");
        }
    }

    writeln!(out, "Cek Kelayakan {}", product.name)?;
    for question in &product.eligibility {
        let answer = match answers.get(&question.id) {
            Some(Answer::Ya) => "Ya",
            Some(Answer::Tidak) => "Tidak",
            None => "belum dijawab",
        };
        writeln!(out, "  {} [{}]: {answer}", question.label, question.id)?;
        if let Some(note) = &question.note {
            writeln!(out, "      {note}")?;
        }
    }

    let outcome = assess(&product.eligibility, &answers);
    writeln!(out, "Hasil: {}", outcome.verdict)?;
    for id in &outcome.unmet {
        if let Some(question) = product.eligibility.iter().find(|q| &q.id == id) {
            writeln!(out, "  - {}", question.label)?;
        }
    }
    Ok(())
}
