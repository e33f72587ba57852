//! Linear, gated progression through the steps of a multi-step form.
//!
//! Moving forward validates only the step being left; moving back never
//! validates. Final submission re-validates every step plus the submit-only
//! rules, so a draft that was edited after going back is still caught even
//! if the user never re-advanced through the edited step.
//!
//! # Example
//!
//! ```
//! use umkm_core::validation::ValidationRule;
//! use umkm_core::wizard::{StepSequencer, WizardStep};
//! use umkm_core::FormDraft;
//!
//! let mut wizard = StepSequencer::new(
//!     vec![
//!         WizardStep::new("Data Inti", vec![ValidationRule::non_empty("revenue", "Isi pendapatan.")]),
//!         WizardStep::new("Tinjau", Vec::new()),
//!     ],
//!     vec![ValidationRule::confirmed("confirmation", "Centang pernyataan.")],
//! );
//!
//! let mut draft = FormDraft::new();
//! assert!(wizard.advance(&draft).is_err());
//!
//! draft.set("revenue", "12000000");
//! assert_eq!(wizard.advance(&draft).unwrap(), 1);
//!
//! draft.set("confirmation", true);
//! assert!(wizard.submit(&draft).is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::FormDraft;
use crate::validation::{ValidationError, ValidationRule, Violation, validate_rules};

/// A named step and the rules that gate leaving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStep {
    pub name: String,
    pub rules: Vec<ValidationRule>,
}

impl WizardStep {
    pub fn new(
        name: &str,
        rules: Vec<ValidationRule>,
    ) -> Self {
        Self {
            name: name.to_string(),
            rules,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Submission is only reachable from the last step.
    #[error("submission is only available on the last step (current step {current}, last step {last})")]
    NotAtFinalStep { current: usize, last: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Tracks the current step of a form and enforces its gates.
#[derive(Debug, Clone)]
pub struct StepSequencer {
    steps: Vec<WizardStep>,
    submit_rules: Vec<ValidationRule>,
    current: usize,
}

impl StepSequencer {
    /// Creates a sequencer positioned on the first step.
    ///
    /// `submit_rules` run only on final submission (the confirmation flag,
    /// for instance), never when advancing.
    pub fn new(
        steps: Vec<WizardStep>,
        submit_rules: Vec<ValidationRule>,
    ) -> Self {
        Self {
            steps,
            submit_rules,
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&WizardStep> {
        self.steps.get(self.current)
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_final(&self) -> bool {
        self.current == self.last_index()
    }

    /// Runs only the rules registered for step `index`.
    pub fn validate_step(
        &self,
        index: usize,
        draft: &FormDraft,
    ) -> Vec<Violation> {
        self.steps
            .get(index)
            .map(|step| validate_rules(draft, &step.rules))
            .unwrap_or_default()
    }

    /// Runs every step's rules followed by the submit-only rules.
    pub fn validate_all(
        &self,
        draft: &FormDraft,
    ) -> Vec<Violation> {
        let mut violations: Vec<Violation> = (0..self.steps.len())
            .flat_map(|index| self.validate_step(index, draft))
            .collect();
        violations.extend(validate_rules(draft, &self.submit_rules));
        violations
    }

    /// Validates the current step and moves forward if it passes.
    ///
    /// The position is clamped to the last step. Returns the new position.
    ///
    /// # Errors
    ///
    /// Returns every violation of the current step; the position is unchanged.
    pub fn advance(
        &mut self,
        draft: &FormDraft,
    ) -> Result<usize, ValidationError> {
        ValidationError::check(self.validate_step(self.current, draft))?;

        let next = (self.current + 1).min(self.last_index());
        debug!(from = self.current, to = next, "wizard advanced");
        self.current = next;
        Ok(next)
    }

    /// Moves back one step without validating, clamped to the first step.
    pub fn retreat(&mut self) -> usize {
        let previous = self.current.saturating_sub(1);
        debug!(from = self.current, to = previous, "wizard retreated");
        self.current = previous;
        previous
    }

    /// Runs the full validation required before a submission may proceed.
    ///
    /// Does not move the sequencer; callers reset it once the submission
    /// has been committed.
    ///
    /// # Errors
    ///
    /// * [`SubmitError::NotAtFinalStep`] when called before the last step.
    /// * [`SubmitError::Validation`] with every violation across all steps.
    pub fn submit(
        &self,
        draft: &FormDraft,
    ) -> Result<(), SubmitError> {
        if !self.is_final() {
            return Err(SubmitError::NotAtFinalStep {
                current: self.current,
                last: self.last_index(),
            });
        }
        ValidationError::check(self.validate_all(draft))?;
        Ok(())
    }

    /// Returns to the first step.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn three_step_wizard() -> StepSequencer {
        StepSequencer::new(
            vec![
                WizardStep::new(
                    "Data Inti",
                    vec![
                        ValidationRule::non_negative("revenue", "Pendapatan"),
                        ValidationRule::required_group(
                            &["revenue", "expenses", "employees"],
                            "Isi minimal salah satu dari Pendapatan, Biaya, atau Jumlah Karyawan.",
                        ),
                    ],
                ),
                WizardStep::new(
                    "Aktivitas",
                    vec![ValidationRule::non_empty(
                        "activityDescription",
                        "Tuliskan singkat aktivitas usaha pada periode ini.",
                    )],
                ),
                WizardStep::new("Tinjau", Vec::new()),
            ],
            vec![ValidationRule::confirmed(
                "confirmation",
                "Centang pernyataan kebenaran sebelum mengajukan.",
            )],
        )
    }

    fn valid_draft() -> FormDraft {
        FormDraft::from_fields([
            ("revenue", "12000000"),
            ("activityDescription", "Promosi bazar akhir pekan."),
        ])
    }

    #[test]
    fn advance_blocked_by_empty_required_group() {
        let mut wizard = three_step_wizard();
        let draft = FormDraft::from_fields([("revenue", ""), ("expenses", ""), ("employees", "")]);

        let err = wizard.advance(&draft).unwrap_err();

        assert_eq!(wizard.current(), 0);
        assert_eq!(
            err.messages(),
            vec!["Isi minimal salah satu dari Pendapatan, Biaya, atau Jumlah Karyawan."]
        );
    }

    #[test]
    fn advance_only_checks_current_step() {
        let mut wizard = three_step_wizard();
        let draft = FormDraft::from_fields([("revenue", "100")]);

        // Step 1's description rule is not consulted while leaving step 0.
        assert_eq!(wizard.advance(&draft), Ok(1));
        assert!(wizard.advance(&draft).is_err());
        assert_eq!(wizard.current(), 1);
    }

    #[test]
    fn advance_clamps_at_last_step() {
        let mut wizard = three_step_wizard();
        let draft = valid_draft();

        wizard.advance(&draft).unwrap();
        wizard.advance(&draft).unwrap();
        let position = wizard.advance(&draft).unwrap();

        assert_eq!(position, 2);
        assert!(wizard.is_final());
    }

    #[test]
    fn retreat_never_validates_and_clamps_at_zero() {
        let mut wizard = three_step_wizard();
        wizard.advance(&valid_draft()).unwrap();

        assert_eq!(wizard.retreat(), 0);
        assert_eq!(wizard.retreat(), 0);
    }

    #[test]
    fn submit_rejected_before_last_step() {
        let wizard = three_step_wizard();

        let result = wizard.submit(&valid_draft());

        assert_eq!(
            result,
            Err(SubmitError::NotAtFinalStep {
                current: 0,
                last: 2
            })
        );
    }

    #[test]
    fn submit_requires_confirmation() {
        let mut wizard = three_step_wizard();
        let draft = valid_draft();
        wizard.advance(&draft).unwrap();
        wizard.advance(&draft).unwrap();

        let Err(SubmitError::Validation(err)) = wizard.submit(&draft) else {
            panic!("expected a validation failure");
        };

        assert_eq!(
            err.messages(),
            vec!["Centang pernyataan kebenaran sebelum mengajukan."]
        );
    }

    #[test]
    fn submit_revalidates_earlier_steps() {
        let mut wizard = three_step_wizard();
        let mut draft = valid_draft();
        draft.set("confirmation", true);
        wizard.advance(&draft).unwrap();
        wizard.advance(&draft).unwrap();

        // Step 0 passed when it was left; the draft went stale afterwards.
        draft.set("revenue", "-10");

        let Err(SubmitError::Validation(err)) = wizard.submit(&draft) else {
            panic!("expected a validation failure");
        };
        assert_eq!(err.messages(), vec!["Pendapatan tidak boleh bernilai negatif."]);
    }

    #[test]
    fn validate_all_includes_submit_rules() {
        let wizard = three_step_wizard();

        let violations = wizard.validate_all(&FormDraft::new());

        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn submit_succeeds_when_everything_passes() {
        let mut wizard = three_step_wizard();
        let mut draft = valid_draft();
        draft.set("confirmation", true);
        wizard.advance(&draft).unwrap();
        wizard.advance(&draft).unwrap();

        assert_eq!(wizard.submit(&draft), Ok(()));
    }
}
