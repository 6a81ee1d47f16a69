//! Utterance parser: one finished transcript in, a bag of candidates out
//!
//! No validation and no catalog lookups happen here. Whatever cannot be
//! confidently extracted is simply left absent and deferred to the
//! resolver and the record builder.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::parse_spoken_date;
use crate::patterns::{
    normalize_class_label, normalize_digits, CLASS, LEVEL, NOTES, PAGE_RANGE, PAGE_SINGLE, SCORE,
};

/// Candidate field values extracted from a single utterance.
///
/// `working_text` is the lower-cased, digit-word-normalized transcript;
/// the resolver runs catalog name matching against it. `score` stays a
/// raw string so the builder owns range checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCandidates {
    pub working_text: String,
    pub date: Option<NaiveDate>,
    pub range: Option<(u32, u32)>,
    pub score: Option<String>,
    pub notes: Option<String>,
    pub level_digit: Option<char>,
    pub class_hint: Option<String>,
}

/// Decompose a transcript into candidate field values.
///
/// Never fails; the transcript is normalized here, the caller does not
/// have to lower-case it.
pub fn parse(transcript: &str, reference_date: NaiveDate) -> FieldCandidates {
    let working_text = normalize_digits(&transcript.to_lowercase());
    debug!(%working_text, "parsing transcript");

    // range pattern takes precedence over the single-page pattern
    let range = PAGE_RANGE
        .captures(&working_text)
        .and_then(|caps| {
            let from: u32 = caps[1].parse().ok()?;
            let to: u32 = caps[2].parse().ok()?;
            Some((from, to))
        })
        .or_else(|| {
            let caps = PAGE_SINGLE.captures(&working_text)?;
            let page: u32 = caps[1].parse().ok()?;
            Some((page, page))
        });

    let score = SCORE
        .captures(&working_text)
        .map(|caps| caps[1].to_string());

    // notes run against the original transcript so user casing survives
    let notes = NOTES
        .captures(transcript)
        .map(|caps| caps[1].trim().to_string())
        .filter(|n| !n.is_empty());

    let level_digit = LEVEL
        .captures(&working_text)
        .and_then(|caps| caps[1].chars().next());

    let class_hint = CLASS
        .captures(&working_text)
        .map(|caps| normalize_class_label(caps[1].trim()))
        .filter(|c| !c.is_empty());

    FieldCandidates {
        date: parse_spoken_date(&working_text, reference_date),
        range,
        score,
        notes,
        level_digit,
        class_hint,
        working_text,
    }
}
