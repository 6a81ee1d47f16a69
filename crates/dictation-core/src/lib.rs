//! Voice-dictated assessment entry and memorization ledger
//!
//! A teacher dictates a Tartili, Hafalan or Murojaah assessment; the
//! transcript is decomposed into candidate fields, disambiguated against
//! the student/class/surah catalog, validated into a record and stored.
//! Derived per-surah memorization state is recomputed from the full
//! history after every insert or delete, so overlapping and out-of-order
//! ranges never double-count, and the just-stored record can be
//! corrected or withdrawn immediately afterwards.

pub mod builder;
pub mod catalog;
pub mod dates;
pub mod matching;
pub mod parser;
pub mod patterns;
pub mod progress;
pub mod repository;
pub mod resolver;
pub mod session;
pub mod speech;

pub use builder::{build, RecordDraft};
pub use catalog::{default_levels, default_surahs, CatalogSnapshot, EntityCatalog, TARTILI_LEVELS};
pub use dates::parse_spoken_date;
pub use parser::{parse, FieldCandidates};
pub use progress::{memorized_verse_count, reconcile, reconcile_level};
pub use repository::{InMemoryRepository, RecordRepository, RepositoryError};
pub use resolver::{resolve, ResolvedFields};
pub use session::{
    FormSession, Phase, SessionError, AUTO_SUBMIT_DELAY, DELETED_MESSAGE, UNDO_MESSAGE_DELAY,
};
pub use speech::{CaptureError, ScriptedCapture, SpeechCapture};
