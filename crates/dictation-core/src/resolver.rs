//! Field resolver: disambiguate parser candidates against a catalog
//! snapshot
//!
//! Stateless and free of I/O; unresolved fields stay empty and fall
//! through to the record builder, which owns final validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CatalogSnapshot;
use crate::matching::{match_class, match_level, match_student, match_surah};
use crate::parser::FieldCandidates;
use tahfidz_types::{Student, Surah};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFields {
    pub student: Option<Student>,
    pub class: Option<String>,
    pub surah: Option<Surah>,
    pub level: Option<String>,
    pub date: Option<NaiveDate>,
    pub range: Option<(u32, u32)>,
    pub score: Option<String>,
    pub notes: Option<String>,
}

/// Resolve candidates against the catalog.
///
/// A matched student is authoritative for the class; the spoken class
/// hint is only consulted when no student matched, in which case the
/// caller narrows its student list to that class and leaves the student
/// empty.
pub fn resolve(candidates: &FieldCandidates, catalog: &CatalogSnapshot) -> ResolvedFields {
    let student = match_student(&catalog.students, &candidates.working_text).cloned();

    let class = match &student {
        Some(student) => Some(student.class.clone()),
        None => candidates
            .class_hint
            .as_deref()
            .and_then(|hint| match_class(&catalog.classes, hint))
            .map(str::to_string),
    };

    let surah = match_surah(&catalog.surahs, &candidates.working_text).cloned();

    let level = candidates
        .level_digit
        .and_then(|digit| match_level(&catalog.levels, digit))
        .map(str::to_string);

    debug!(
        student = student.as_ref().map(|s| s.name.as_str()),
        class = class.as_deref(),
        surah = surah.as_ref().map(|s| s.name.as_str()),
        level = level.as_deref(),
        "resolved transcript fields"
    );

    ResolvedFields {
        student,
        class,
        surah,
        level,
        date: candidates.date,
        range: candidates.range,
        score: candidates.score.clone(),
        notes: candidates.notes.clone(),
    }
}
