//! Derived memorization progress per (student, surah) pair

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::StudentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemorizationStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl MemorizationStatus {
    /// Derive status from a memorized-verse count against the surah total
    pub fn for_count(memorized: u32, total: u32) -> Self {
        if memorized >= total {
            MemorizationStatus::Complete
        } else if memorized > 0 {
            MemorizationStatus::InProgress
        } else {
            MemorizationStatus::NotStarted
        }
    }
}

impl fmt::Display for MemorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemorizationStatus::NotStarted => "Belum Dimulai",
            MemorizationStatus::InProgress => "Sedang Proses",
            MemorizationStatus::Complete => "Selesai",
        };
        write!(f, "{label}")
    }
}

/// Per-student, per-surah memorization ledger entry.
///
/// Created zeroed when the student enrolls; `memorized_verses` and
/// `status` are rewritten by the progress reconciler and never patched
/// incrementally anywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurahTarget {
    pub student_id: StudentId,
    pub surah_name: String,
    pub total_verses: u32,
    pub memorized_verses: u32,
    pub status: MemorizationStatus,
}

impl SurahTarget {
    /// A fresh, untouched target for a newly enrolled student
    pub fn new(student_id: StudentId, surah_name: &str, total_verses: u32) -> Self {
        Self {
            student_id,
            surah_name: surah_name.to_string(),
            total_verses,
            memorized_verses: 0,
            status: MemorizationStatus::NotStarted,
        }
    }

    /// Replace the derived fields with a freshly computed count,
    /// clamped to the surah total
    pub fn with_memorized(mut self, memorized: u32) -> Self {
        self.memorized_verses = memorized.min(self.total_verses);
        self.status = MemorizationStatus::for_count(self.memorized_verses, self.total_verses);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_boundaries() {
        assert_eq!(
            MemorizationStatus::for_count(0, 40),
            MemorizationStatus::NotStarted
        );
        assert_eq!(
            MemorizationStatus::for_count(39, 40),
            MemorizationStatus::InProgress
        );
        assert_eq!(
            MemorizationStatus::for_count(40, 40),
            MemorizationStatus::Complete
        );
    }

    #[test]
    fn with_memorized_clamps_to_total() {
        let target = SurahTarget::new(1, "An-Nas", 6).with_memorized(9);
        assert_eq!(target.memorized_verses, 6);
        assert_eq!(target.status, MemorizationStatus::Complete);
    }

    #[test]
    fn new_target_starts_untouched() {
        let target = SurahTarget::new(3, "Al-Fatihah", 7);
        assert_eq!(target.memorized_verses, 0);
        assert_eq!(target.status, MemorizationStatus::NotStarted);
    }
}
