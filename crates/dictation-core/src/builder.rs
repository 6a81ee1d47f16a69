//! Record builder: turn a form draft into a validated, immutable record
//!
//! Field errors are collected and reported together; the caller surfaces
//! all of them at once rather than stopping at the first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tahfidz_types::{
    AcademicRecord, Field, RecordDetail, RecordKind, StudentId, ValidationErrors, VerseRange,
};

use crate::catalog::CatalogSnapshot;
use crate::resolver::ResolvedFields;

/// Mutable form state, exactly as a UI would hold it: option-of-string
/// everywhere the user types or a dictation prefills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub kind: RecordKind,
    pub class: Option<String>,
    pub student_id: Option<StudentId>,
    pub level: Option<String>,
    pub surah: Option<String>,
    pub range_from: Option<String>,
    pub range_to: Option<String>,
    pub score: Option<String>,
    pub notes: String,
    pub date: NaiveDate,
    /// Graduation drill: records a score against a level, no page range
    pub drill: bool,
}

impl RecordDraft {
    pub fn new(kind: RecordKind, date: NaiveDate) -> Self {
        Self {
            kind,
            class: None,
            student_id: None,
            level: None,
            surah: None,
            range_from: None,
            range_to: None,
            score: None,
            notes: String::new(),
            date,
            drill: false,
        }
    }

    /// Overwrite draft fields with whatever the resolver produced;
    /// unresolved fields leave the draft untouched
    pub fn apply(&mut self, resolved: &ResolvedFields) {
        if let Some(date) = resolved.date {
            self.date = date;
        }
        if let Some(student) = &resolved.student {
            self.student_id = Some(student.id);
        }
        if let Some(class) = &resolved.class {
            self.class = Some(class.clone());
        }
        if let Some(surah) = &resolved.surah {
            self.surah = Some(surah.name.clone());
        }
        if let Some(level) = &resolved.level {
            self.level = Some(level.clone());
        }
        if let Some((from, to)) = resolved.range {
            self.range_from = Some(from.to_string());
            self.range_to = Some(to.to_string());
        }
        if let Some(score) = &resolved.score {
            self.score = Some(score.clone());
        }
        if let Some(notes) = &resolved.notes {
            self.notes = notes.clone();
        }
    }

    /// Repopulate a draft from a stored record, for the correction flow
    pub fn from_record(record: &AcademicRecord, class: &str) -> Self {
        let mut draft = Self::new(record.detail.kind(), record.date);
        draft.class = Some(class.to_string());
        draft.student_id = Some(record.student_id);
        draft.score = Some(record.score.to_string());
        draft.notes = record.notes.clone().unwrap_or_default();
        match &record.detail {
            RecordDetail::Tartili {
                level,
                page,
                graduated,
            } => {
                draft.level = Some(level.clone());
                draft.drill = *graduated;
                if let Some(page) = page {
                    draft.range_from = Some(page.start().to_string());
                    draft.range_to = Some(page.end().to_string());
                }
            }
            RecordDetail::Hafalan { surah, verses } => {
                draft.surah = Some(surah.clone());
                draft.range_from = Some(verses.start().to_string());
                draft.range_to = Some(verses.end().to_string());
            }
            RecordDetail::Murojaah { surah } => {
                draft.surah = Some(surah.clone());
            }
        }
        draft
    }
}

/// Validate a draft and assemble the record.
///
/// On failure every invalid or missing field gets its own error; none of
/// them reaches the repository.
pub fn build(
    draft: &RecordDraft,
    catalog: &CatalogSnapshot,
) -> Result<AcademicRecord, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.class.as_deref().unwrap_or("").is_empty() {
        errors.push(Field::Class, "Kelas harus dipilih.");
    }

    let student_id = match draft.student_id {
        None => {
            // graduation has its own wording on the missing-field errors
            let message = if draft.drill {
                "Siswa harus dipilih untuk menyatakan kelulusan."
            } else {
                "Siswa harus dipilih."
            };
            errors.push(Field::Student, message);
            None
        }
        Some(id) if catalog.student(id).is_none() => {
            errors.push(Field::Student, "Siswa tidak ditemukan.");
            None
        }
        Some(id) => Some(id),
    };

    let score = validate_score(draft.score.as_deref(), draft.drill, &mut errors);
    let detail = validate_detail(draft, catalog, &mut errors);

    match (student_id, score, detail) {
        (Some(student_id), Some(score), Some(detail)) if errors.is_empty() => Ok(AcademicRecord {
            student_id,
            date: draft.date,
            detail,
            score,
            notes: normalize_notes(&draft.notes),
        }),
        _ => Err(errors),
    }
}

fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn validate_score(score: Option<&str>, drill: bool, errors: &mut ValidationErrors) -> Option<u8> {
    let raw = match score {
        Some(raw) if !raw.trim().is_empty() => raw.trim(),
        _ => {
            let message = if drill {
                "Nilai drill tidak boleh kosong."
            } else {
                "Nilai tidak boleh kosong."
            };
            errors.push(Field::Score, message);
            return None;
        }
    };
    match raw.parse::<i64>() {
        Ok(value) if (0..=100).contains(&value) => Some(value as u8),
        _ => {
            errors.push(Field::Score, "Nilai harus berupa angka antara 0 dan 100.");
            None
        }
    }
}

fn validate_detail(
    draft: &RecordDraft,
    catalog: &CatalogSnapshot,
    errors: &mut ValidationErrors,
) -> Option<RecordDetail> {
    match draft.kind {
        RecordKind::Tartili => {
            let level = match draft.level.as_deref() {
                Some(level) if !level.is_empty() => Some(level.to_string()),
                _ => {
                    let message = if draft.drill {
                        "Level Tartili harus dipilih untuk drill."
                    } else {
                        "Level Tartili harus dipilih."
                    };
                    errors.push(Field::Level, message);
                    None
                }
            };
            let page = if draft.drill {
                // a drill records only a score against a level
                Some(None)
            } else {
                validate_range(draft, RangeLabels::PAGE, errors).map(Some)
            };
            match (level, page) {
                (Some(level), Some(page)) => Some(RecordDetail::Tartili {
                    level,
                    page,
                    graduated: draft.drill,
                }),
                _ => None,
            }
        }
        RecordKind::Hafalan => {
            let surah = validate_surah(draft, catalog, errors);
            let verses = validate_range(draft, RangeLabels::VERSE, errors);
            match (surah, verses) {
                (Some(surah), Some(verses)) => Some(RecordDetail::Hafalan { surah, verses }),
                _ => None,
            }
        }
        RecordKind::Murojaah => {
            validate_surah(draft, catalog, errors).map(|surah| RecordDetail::Murojaah { surah })
        }
    }
}

fn validate_surah(
    draft: &RecordDraft,
    catalog: &CatalogSnapshot,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match draft.surah.as_deref() {
        Some(name) if !name.is_empty() => {
            if catalog.surah(name).is_some() {
                Some(name.to_string())
            } else {
                errors.push(Field::Surah, "Surat tidak ditemukan.");
                None
            }
        }
        _ => {
            errors.push(Field::Surah, "Surat harus dipilih.");
            None
        }
    }
}

struct RangeLabels {
    from_field: Field,
    to_field: Field,
    noun: &'static str,
    short: &'static str,
}

impl RangeLabels {
    const PAGE: RangeLabels = RangeLabels {
        from_field: Field::PageFrom,
        to_field: Field::PageTo,
        noun: "Halaman",
        short: "Hal.",
    };
    const VERSE: RangeLabels = RangeLabels {
        from_field: Field::VerseFrom,
        to_field: Field::VerseTo,
        noun: "Ayat",
        short: "Ayat",
    };
}

fn validate_range(
    draft: &RecordDraft,
    labels: RangeLabels,
    errors: &mut ValidationErrors,
) -> Option<VerseRange> {
    let from = match draft.range_from.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(
                labels.from_field,
                format!("{} \"dari\" tidak boleh kosong.", labels.noun),
            );
            None
        }
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                errors.push(
                    labels.from_field,
                    format!("{} harus berupa angka bulat positif.", labels.noun),
                );
                None
            }
        },
    };

    let to = match draft.range_to.as_deref().map(str::trim) {
        None | Some("") => from, // open end collapses to a single value
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                errors.push(
                    labels.to_field,
                    format!("{} \"sampai\" harus berupa angka bulat positif.", labels.noun),
                );
                None
            }
        },
    };

    match (from, to) {
        (Some(from), Some(to)) => match VerseRange::new(from, to) {
            Some(range) => Some(range),
            None => {
                errors.push(
                    labels.to_field,
                    format!(
                        "{} \"sampai\" tidak boleh kurang dari {} \"dari\".",
                        labels.short, labels.short
                    ),
                );
                None
            }
        },
        _ => None,
    }
}
