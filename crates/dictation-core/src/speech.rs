//! Speech capture boundary
//!
//! The engine itself lives outside this subsystem (a browser API, a
//! native recognizer). Here it is a single-shot asynchronous operation:
//! one listening session resolves to exactly one transcript or one typed
//! error, and dropping the future cancels the session; no ambient event
//! listeners to detach.

use std::collections::VecDeque;
use thiserror::Error;

/// Capture errors, reported to the user verbatim. No automatic retry;
/// the user may re-invoke listening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Tidak ada suara terdeteksi. Silakan coba lagi dan pastikan Anda berbicara dengan jelas.")]
    NoSpeech,

    #[error("Izin mikrofon ditolak. Aktifkan izin mikrofon di pengaturan browser Anda untuk menggunakan fitur ini.")]
    PermissionDenied,

    #[error("Masalah jaringan. Fitur suara memerlukan koneksi internet.")]
    Network,

    /// The engine returned a transcript with no usable content
    #[error("Tidak dapat mengenali ucapan Anda. Mohon coba lagi.")]
    Unintelligible,

    #[error("Terjadi kesalahan: {0}")]
    Other(String),
}

#[allow(async_fn_in_trait)]
pub trait SpeechCapture {
    /// Run one listening session to completion
    async fn listen(&mut self) -> Result<String, CaptureError>;
}

/// Scripted capture engine for tests and demos: plays back queued
/// outcomes in order, then reports no speech
#[derive(Debug, Default)]
pub struct ScriptedCapture {
    outcomes: VecDeque<Result<String, CaptureError>>,
}

impl ScriptedCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_transcript(&mut self, transcript: &str) -> &mut Self {
        self.outcomes.push_back(Ok(transcript.to_string()));
        self
    }

    pub fn push_error(&mut self, error: CaptureError) -> &mut Self {
        self.outcomes.push_back(Err(error));
        self
    }
}

impl SpeechCapture for ScriptedCapture {
    async fn listen(&mut self) -> Result<String, CaptureError> {
        self.outcomes.pop_front().unwrap_or(Err(CaptureError::NoSpeech))
    }
}
