//! Quick eligibility check for the financing programs.
//!
//! Every program asks a short list of yes/no questions. The verdict is
//! [`EligibilityVerdict::Eligible`] only when each question has been answered
//! and each question that requires "Ya" got it. A question the user has not
//! answered yet counts as unmet, exactly like an explicit "Tidak".

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::EligibilityQuestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Ya,
    Tidak,
}

impl Answer {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ya" | "y" | "yes" => Some(Self::Ya),
            "tidak" | "t" | "no" => Some(Self::Tidak),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityVerdict {
    Eligible,
    NeedsReview,
}

impl EligibilityVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eligible => "Layak",
            Self::NeedsReview => "Perlu Ditinjau",
        }
    }
}

impl fmt::Display for EligibilityVerdict {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityOutcome {
    pub verdict: EligibilityVerdict,
    /// Ids of unanswered or failed questions, in question order.
    pub unmet: Vec<String>,
}

/// Evaluates a program's questionnaire against the user's answers.
pub fn assess(
    questions: &[EligibilityQuestion],
    answers: &HashMap<String, Answer>,
) -> EligibilityOutcome {
    let unmet: Vec<String> = questions
        .iter()
        .filter(|q| match answers.get(&q.id) {
            None => true,
            Some(answer) => q.required_yes && *answer != Answer::Ya,
        })
        .map(|q| q.id.clone())
        .collect();

    let verdict = if unmet.is_empty() {
        EligibilityVerdict::Eligible
    } else {
        EligibilityVerdict::NeedsReview
    };

    EligibilityOutcome { verdict, unmet }
}
