//! Confirmation step that turns a reviewed draft into committed state.
//!
//! A confirmation is one transaction: the committed record is replaced by a
//! deep copy of the draft and an [`AuditRecord`] is prepended to the history,
//! both under the same lock, so no caller ever sees one without the other.
//!
//! While a submission is pending (for example during the artificial delay
//! of [`SubmissionLedger::confirm_after`]) further submissions are rejected
//! with [`SubmissionError::InFlight`] rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::diff::DiffEntry;
use crate::models::{Actor, AuditRecord, ChangeStatus, FormDraft};
use crate::validation::ValidationError;
use crate::wizard::SubmitError;

/// Title shown when a submission has no changes.
pub const NO_CHANGES_TITLE: &str = "Tidak Ada Perubahan";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Submission was attempted before the last step of a wizard.
    #[error("submission is only available on the last step (current step {current}, last step {last})")]
    NotAtFinalStep { current: usize, last: usize },

    /// The draft matches the committed state.
    #[error("Tidak ada data yang diubah.")]
    EmptyDiff,

    /// Another submission is still pending.
    #[error("Pengajuan sebelumnya masih diproses.")]
    InFlight,
}

impl From<SubmitError> for SubmissionError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::NotAtFinalStep { current, last } => Self::NotAtFinalStep { current, last },
            SubmitError::Validation(inner) => Self::Validation(inner),
        }
    }
}

/// Committed state and its change history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommittedState {
    pub committed: FormDraft,
    /// Most recent first.
    pub history: Vec<AuditRecord>,
}

/// Owns the committed copy of a record and serialises submissions to it.
#[derive(Debug)]
pub struct SubmissionLedger {
    state: Mutex<CommittedState>,
    in_flight: AtomicBool,
    actor: Actor,
}

/// Clears the in-flight flag when a submission finishes or is abandoned.
struct PendingSubmission<'a>(&'a AtomicBool);

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SubmissionLedger {
    /// Creates a ledger whose confirmations are attributed to `actor`.
    pub fn new(
        committed: FormDraft,
        history: Vec<AuditRecord>,
        actor: Actor,
    ) -> Self {
        Self {
            state: Mutex::new(CommittedState { committed, history }),
            in_flight: AtomicBool::new(false),
            actor,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CommittedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the committed record.
    pub fn committed(&self) -> FormDraft {
        self.lock().committed.clone()
    }

    /// A copy of the history, most recent first.
    pub fn history(&self) -> Vec<AuditRecord> {
        self.lock().history.clone()
    }

    pub fn latest(&self) -> Option<AuditRecord> {
        self.lock().history.first().cloned()
    }

    pub fn snapshot(&self) -> CommittedState {
        self.lock().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<PendingSubmission<'_>, SubmissionError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                warn!("submission rejected; another one is still pending");
                SubmissionError::InFlight
            })?;
        Ok(PendingSubmission(&self.in_flight))
    }

    /// Commits `draft` and records `diff` in the history.
    ///
    /// # Errors
    ///
    /// * [`SubmissionError::EmptyDiff`] when `diff` is empty.
    /// * [`SubmissionError::InFlight`] when another submission is pending.
    ///
    /// Nothing is changed when an error is returned.
    pub fn confirm(
        &self,
        diff: &[DiffEntry],
        draft: &FormDraft,
    ) -> Result<AuditRecord, SubmissionError> {
        if diff.is_empty() {
            return Err(SubmissionError::EmptyDiff);
        }
        let _pending = self.begin()?;
        Ok(self.commit(diff, draft))
    }

    /// Like [`confirm`](Self::confirm), after waiting `delay`.
    ///
    /// The ledger counts as in flight from the first poll until the commit,
    /// and also if the returned future is dropped before it completes.
    pub async fn confirm_after(
        &self,
        delay: Duration,
        diff: &[DiffEntry],
        draft: &FormDraft,
    ) -> Result<AuditRecord, SubmissionError> {
        if diff.is_empty() {
            return Err(SubmissionError::EmptyDiff);
        }
        let _pending = self.begin()?;
        tokio::time::sleep(delay).await;
        Ok(self.commit(diff, draft))
    }

    fn commit(
        &self,
        diff: &[DiffEntry],
        draft: &FormDraft,
    ) -> AuditRecord {
        let mut state = self.lock();

        let record = AuditRecord {
            id: format!("hist-{}", state.history.len() + 1),
            timestamp: Utc::now(),
            actor: self.actor,
            changes: diff.iter().map(ToString::to_string).collect(),
            status: ChangeStatus::UnderReview,
        };

        state.committed = draft.clone();
        state.history.insert(0, record.clone());

        info!(
            record = %record.id,
            changes = record.changes.len(),
            "submission committed"
        );
        record
    }
}
