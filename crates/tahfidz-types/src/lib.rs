pub mod progress;
pub mod record;
pub mod validation;

pub use progress::{MemorizationStatus, SurahTarget};
pub use record::{
    AcademicRecord, PendingSubmission, RecordDetail, RecordKind, Student, StudentId, Surah,
    VerseRange,
};
pub use validation::{Field, FieldError, ValidationErrors};
