//! Core record types: students, surahs, assessment records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub type StudentId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub class: String, // e.g. "5C"
}

/// A catalog passage with a fixed verse count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surah {
    pub id: u32,
    pub name: String,
    pub total_verses: u32,
}

/// Inclusive start-end pair of verse (or page) numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRange {
    start: u32,
    end: u32,
}

impl VerseRange {
    /// Returns `None` unless `1 <= start <= end`
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start >= 1 && end >= start).then_some(Self { start, end })
    }

    pub fn single(n: u32) -> Option<Self> {
        Self::new(n, n)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn verses(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Tartili,
    Hafalan,
    Murojaah,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Tartili => "Tartili",
            RecordKind::Hafalan => "Hafalan",
            RecordKind::Murojaah => "Murojaah",
        };
        write!(f, "{name}")
    }
}

/// Kind-specific payload of an assessment record.
///
/// A graduated tartili record is a drill: it carries no page range and
/// marks the student as having passed the named level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordDetail {
    Tartili {
        level: String,
        page: Option<VerseRange>,
        graduated: bool,
    },
    Hafalan {
        surah: String,
        verses: VerseRange,
    },
    Murojaah {
        surah: String,
    },
}

impl RecordDetail {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordDetail::Tartili { .. } => RecordKind::Tartili,
            RecordDetail::Hafalan { .. } => RecordKind::Hafalan,
            RecordDetail::Murojaah { .. } => RecordKind::Murojaah,
        }
    }

    /// Surah name for hafalan/murojaah records
    pub fn surah_name(&self) -> Option<&str> {
        match self {
            RecordDetail::Hafalan { surah, .. } | RecordDetail::Murojaah { surah } => Some(surah),
            RecordDetail::Tartili { .. } => None,
        }
    }
}

/// One validated assessment, ready for storage.
///
/// The creation instant is assigned by the repository on append and used
/// only for ordering; the `date` field is what the teacher dictated and
/// may be back-dated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub detail: RecordDetail,
    pub score: u8,
    pub notes: Option<String>,
}

/// The just-stored record plus display context, kept alive while the
/// confirmation screen offers Correct/Delete.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub student_id: StudentId,
    pub student_name: String,
    pub record: AcademicRecord,
}

impl PendingSubmission {
    /// Confirmation-screen summary, one labelled line per field
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Tanggal: {}", self.record.date.format("%Y-%m-%d")),
            format!("Nama Siswa: {}", self.student_name),
        ];
        match &self.record.detail {
            RecordDetail::Tartili {
                level,
                page,
                graduated,
            } => {
                lines.push(format!("Level Tartili: {level}"));
                if let Some(page) = page {
                    lines.push(format!("Halaman: {page}"));
                }
                if *graduated {
                    lines.push(format!("Nilai Drill: {}", self.record.score));
                } else {
                    lines.push(format!("Nilai: {}", self.record.score));
                }
            }
            RecordDetail::Hafalan { surah, verses } => {
                lines.push(format!("Surat: {surah}"));
                lines.push(format!("Ayat: {verses}"));
                lines.push(format!("Nilai: {}", self.record.score));
            }
            RecordDetail::Murojaah { surah } => {
                lines.push(format!("Surat: {surah}"));
                lines.push(format!("Nilai: {}", self.record.score));
            }
        }
        if let Some(notes) = &self.record.notes {
            lines.push(format!("Catatan: {notes}"));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn verse_range_rejects_inverted_bounds() {
        assert_eq!(VerseRange::new(5, 3), None);
        assert_eq!(VerseRange::new(0, 3), None);
        assert!(VerseRange::new(3, 3).is_some());
    }

    #[test]
    fn verse_range_display() {
        assert_eq!(VerseRange::new(1, 5).unwrap().to_string(), "1-5");
        assert_eq!(VerseRange::single(7).unwrap().to_string(), "7");
    }

    #[test]
    fn verse_range_len_counts_inclusive() {
        assert_eq!(VerseRange::new(3, 8).unwrap().len(), 6);
        assert_eq!(VerseRange::single(4).unwrap().len(), 1);
    }

    #[test]
    fn record_detail_serializes_tagged() {
        let detail = RecordDetail::Hafalan {
            surah: "An-Naba'".to_string(),
            verses: VerseRange::new(1, 10).unwrap(),
        };
        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains(r#""kind":"hafalan""#));
        let back: RecordDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(back, detail);
    }

    #[test]
    fn summary_lists_all_fields() {
        let pending = PendingSubmission {
            student_id: 1,
            student_name: "Ahmad Fauzi".to_string(),
            record: AcademicRecord {
                student_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
                detail: RecordDetail::Tartili {
                    level: "Tartili 3".to_string(),
                    page: VerseRange::new(1, 5),
                    graduated: false,
                },
                score: 90,
                notes: Some("lancar".to_string()),
            },
        };
        let summary = pending.summary();
        assert_eq!(
            summary,
            "Tanggal: 2024-05-20\nNama Siswa: Ahmad Fauzi\nLevel Tartili: Tartili 3\nHalaman: 1-5\nNilai: 90\nCatatan: lancar"
        );
    }

    #[test]
    fn drill_summary_omits_page_and_labels_drill_score() {
        let pending = PendingSubmission {
            student_id: 1,
            student_name: "Ahmad Fauzi".to_string(),
            record: AcademicRecord {
                student_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
                detail: RecordDetail::Tartili {
                    level: "Tartili 3".to_string(),
                    page: None,
                    graduated: true,
                },
                score: 95,
                notes: None,
            },
        };
        let summary = pending.summary();
        assert!(summary.contains("Nilai Drill: 95"));
        assert!(!summary.contains("Halaman"));
    }
}
