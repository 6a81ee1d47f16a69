//! Form session: dictation pipeline, submission, and the short-lived
//! correction/undo state machine
//!
//! One session drives one form. After a successful submission the
//! session sits in `Submitted` holding the pending context; the user
//! either corrects the record (delete + repopulate the draft), discards
//! it (delete + transient message), or starts a new entry. Only the
//! single most recently created record of the session's kind can be
//! targeted.

use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

use tahfidz_types::{
    AcademicRecord, PendingSubmission, RecordDetail, RecordKind, ValidationErrors,
};

use crate::builder::{build, RecordDraft};
use crate::catalog::{CatalogSnapshot, EntityCatalog};
use crate::parser::parse;
use crate::progress::{reconcile, reconcile_level};
use crate::repository::{RecordRepository, RepositoryError};
use crate::resolver::resolve;
use crate::speech::{CaptureError, SpeechCapture};

/// Pause between prefilling the on-screen fields and auto-submitting, so
/// the user sees what was understood. Dropping the `dictate` future
/// before it elapses cancels the submission.
pub const AUTO_SUBMIT_DELAY: Duration = Duration::from_millis(500);

/// How long the "deleted" confirmation stays up before the form resets
pub const UNDO_MESSAGE_DELAY: Duration = Duration::from_secs(2);

pub const DELETED_MESSAGE: &str = "Data terakhir telah dihapus.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("no submission is awaiting confirmation")]
    NothingSubmitted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Form ready for input, possibly prefilled after a correction
    Idle,
    /// A record was just stored; summary shown, Correct/Delete offered
    Submitted(PendingSubmission),
}

pub struct FormSession<R> {
    repo: R,
    kind: RecordKind,
    reference_date: chrono::NaiveDate,
    pub draft: RecordDraft,
    phase: Phase,
}

impl<R: RecordRepository + EntityCatalog> FormSession<R> {
    pub fn new(repo: R, kind: RecordKind, today: chrono::NaiveDate) -> Self {
        Self {
            repo,
            kind,
            reference_date: today,
            draft: RecordDraft::new(kind, today),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn pending(&self) -> Option<&PendingSubmission> {
        match &self.phase {
            Phase::Submitted(pending) => Some(pending),
            Phase::Idle => None,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// Run one dictation round: listen, parse, resolve, prefill the
    /// draft, then auto-submit after a short delay.
    ///
    /// Tearing the form down is dropping this future; the scheduled
    /// submission dies with it and no state is mutated.
    pub async fn dictate(
        &mut self,
        capture: &mut impl SpeechCapture,
    ) -> Result<PendingSubmission, SessionError> {
        let transcript = capture.listen().await?;
        if transcript.trim().is_empty() {
            warn!("speech engine returned an empty transcript");
            return Err(CaptureError::Unintelligible.into());
        }

        let candidates = parse(&transcript, self.reference_date);
        let snapshot = self.repo.snapshot().await?;
        let resolved = resolve(&candidates, &snapshot);
        self.draft.apply(&resolved);

        sleep(AUTO_SUBMIT_DELAY).await;
        self.submit().await
    }

    /// Validate the draft, store the record and reconcile derived state
    pub async fn submit(&mut self) -> Result<PendingSubmission, SessionError> {
        let snapshot = self.repo.snapshot().await?;
        let record = build(&self.draft, &snapshot)?;
        self.store(record, &snapshot).await
    }

    /// Graduation drill: same shape as `submit`, but the record carries
    /// no page range and promotes the student's current level
    pub async fn graduate(&mut self) -> Result<PendingSubmission, SessionError> {
        self.draft.drill = true;
        self.submit().await
    }

    /// Delete the just-stored record and repopulate the form with its
    /// field values, range endpoints and level included
    pub async fn correct(&mut self) -> Result<(), SessionError> {
        let pending = self.take_pending()?;
        self.repo
            .delete_most_recent(pending.student_id, self.kind)
            .await?;
        let snapshot = self.repo.snapshot().await?;
        self.reconcile_after(&pending.record, &snapshot).await?;

        let class = snapshot
            .student(pending.student_id)
            .map(|s| s.class.clone())
            .unwrap_or_default();
        self.draft = RecordDraft::from_record(&pending.record, &class);
        info!(student = %pending.student_name, "submission reopened for correction");
        Ok(())
    }

    /// Delete the just-stored record, hold the confirmation message for
    /// a beat, then reset to an empty form
    pub async fn discard(&mut self) -> Result<&'static str, SessionError> {
        let pending = self.take_pending()?;
        self.repo
            .delete_most_recent(pending.student_id, self.kind)
            .await?;
        let snapshot = self.repo.snapshot().await?;
        self.reconcile_after(&pending.record, &snapshot).await?;
        info!(student = %pending.student_name, "submission deleted");

        sleep(UNDO_MESSAGE_DELAY).await;
        self.start_new();
        Ok(DELETED_MESSAGE)
    }

    /// Drop the pending context without touching storage and present an
    /// empty form
    pub fn start_new(&mut self) {
        self.draft = RecordDraft::new(self.kind, self.reference_date);
        self.phase = Phase::Idle;
    }

    fn take_pending(&mut self) -> Result<PendingSubmission, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Submitted(pending) => Ok(pending),
            Phase::Idle => Err(SessionError::NothingSubmitted),
        }
    }

    async fn store(
        &mut self,
        record: AcademicRecord,
        snapshot: &CatalogSnapshot,
    ) -> Result<PendingSubmission, SessionError> {
        self.repo.append(record.clone()).await?;
        self.reconcile_after(&record, snapshot).await?;

        let student_name = snapshot
            .student(record.student_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Siswa".to_string());
        let pending = PendingSubmission {
            student_id: record.student_id,
            student_name,
            record,
        };
        info!(
            student = %pending.student_name,
            kind = %self.kind,
            "record stored"
        );
        self.phase = Phase::Submitted(pending.clone());
        Ok(pending)
    }

    /// Recompute whatever derived state the record touches; runs after
    /// every append and after every delete
    async fn reconcile_after(
        &mut self,
        record: &AcademicRecord,
        snapshot: &CatalogSnapshot,
    ) -> Result<(), RepositoryError> {
        match &record.detail {
            RecordDetail::Hafalan { surah, .. } => {
                if let Some(surah) = snapshot.surah(surah) {
                    let surah = surah.clone();
                    reconcile(&mut self.repo, record.student_id, &surah).await?;
                }
            }
            RecordDetail::Tartili { .. } => {
                reconcile_level(&mut self.repo, record.student_id, &snapshot.levels).await?;
            }
            RecordDetail::Murojaah { .. } => {}
        }
        Ok(())
    }
}
