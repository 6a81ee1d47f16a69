//! Progress reconciler: derived memorization state, recomputed from
//! scratch after every insert or delete
//!
//! Incremental updates double-count when a teacher re-records verses the
//! student already memorized, and cannot survive deletions. Recomputing
//! from the deduplicated verse set is the only policy that stays correct
//! under arbitrary insert/delete sequences.

use std::collections::BTreeSet;
use tracing::debug;

use tahfidz_types::{AcademicRecord, RecordDetail, RecordKind, StudentId, Surah, SurahTarget};

use crate::repository::{RecordRepository, RepositoryError};

/// Count the distinct verses covered by the hafalan records in a
/// history, clamped to the surah total (recorded ranges may overrun the
/// surah length on data entry mistakes)
pub fn memorized_verse_count(history: &[AcademicRecord], total_verses: u32) -> u32 {
    let mut covered: BTreeSet<u32> = BTreeSet::new();
    for record in history {
        if let RecordDetail::Hafalan { verses, .. } = &record.detail {
            covered.extend(verses.verses());
        }
    }
    (covered.len() as u32).min(total_verses)
}

/// Recompute one (student, surah) memorization target from the full
/// record history and persist it.
///
/// All-or-nothing: a failed history read leaves the stored target
/// untouched.
pub async fn reconcile<R: RecordRepository>(
    repo: &mut R,
    student: StudentId,
    surah: &Surah,
) -> Result<SurahTarget, RepositoryError> {
    let history = repo.history(student, &surah.name).await?;
    let count = memorized_verse_count(&history, surah.total_verses);

    let target = repo
        .target(student, &surah.name)
        .await?
        .unwrap_or_else(|| SurahTarget::new(student, &surah.name, surah.total_verses))
        .with_memorized(count);

    debug!(
        student,
        surah = %surah.name,
        memorized = target.memorized_verses,
        status = %target.status,
        "reconciled memorization target"
    );
    repo.save_target(target.clone()).await?;
    Ok(target)
}

/// Recompute a student's current Tartili level from the most recently
/// created tartili record.
///
/// A graduation drill names the level the student just passed, so the
/// derived current level is the next rung of the ladder; a plain record
/// names the level itself; no records means the first catalog level.
/// Deleting the most recent record rolls the level back with no extra
/// bookkeeping.
pub async fn reconcile_level<R: RecordRepository>(
    repo: &mut R,
    student: StudentId,
    levels: &[String],
) -> Result<String, RepositoryError> {
    let level = match repo.most_recent(student, RecordKind::Tartili).await? {
        Some(AcademicRecord {
            detail:
                RecordDetail::Tartili {
                    level, graduated, ..
                },
            ..
        }) => {
            if graduated {
                next_level(levels, &level)
            } else {
                level
            }
        }
        _ => levels.first().cloned().unwrap_or_default(),
    };
    repo.set_current_level(student, &level).await?;
    Ok(level)
}

fn next_level(levels: &[String], passed: &str) -> String {
    match levels.iter().position(|l| l == passed) {
        Some(i) if i + 1 < levels.len() => levels[i + 1].clone(),
        // top of the ladder stays put
        Some(i) => levels[i].clone(),
        None => passed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_levels;
    use crate::repository::InMemoryRepository;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use tahfidz_types::{MemorizationStatus, VerseRange};

    fn hafalan(student: StudentId, surah: &str, from: u32, to: u32) -> AcademicRecord {
        AcademicRecord {
            student_id: student,
            date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
            detail: RecordDetail::Hafalan {
                surah: surah.to_string(),
                verses: VerseRange::new(from, to).expect("test range"),
            },
            score: 90,
            notes: None,
        }
    }

    fn tartili(student: StudentId, level: &str, graduated: bool) -> AcademicRecord {
        AcademicRecord {
            student_id: student,
            date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
            detail: RecordDetail::Tartili {
                level: level.to_string(),
                page: VerseRange::new(1, 2),
                graduated,
            },
            score: 90,
            notes: None,
        }
    }

    fn an_naba() -> Surah {
        Surah {
            id: 78,
            name: "An-Naba'".to_string(),
            total_verses: 40,
        }
    }

    #[test]
    fn overlapping_ranges_are_deduplicated() {
        // 1-5 and 3-8 cover eight distinct verses, not eleven
        let history = vec![hafalan(1, "An-Naba'", 1, 5), hafalan(1, "An-Naba'", 3, 8)];
        assert_eq!(memorized_verse_count(&history, 40), 8);
    }

    #[test]
    fn out_of_order_restatement_changes_nothing() {
        let forward = vec![hafalan(1, "X", 1, 10), hafalan(1, "X", 11, 20)];
        let backward = vec![hafalan(1, "X", 11, 20), hafalan(1, "X", 1, 10)];
        assert_eq!(
            memorized_verse_count(&forward, 40),
            memorized_verse_count(&backward, 40)
        );
    }

    #[test]
    fn count_is_clamped_to_surah_total() {
        let history = vec![hafalan(1, "An-Nas", 1, 50)];
        assert_eq!(memorized_verse_count(&history, 6), 6);
    }

    #[test]
    fn non_hafalan_records_are_ignored() {
        let history = vec![tartili(1, "Tartili 3", false)];
        assert_eq!(memorized_verse_count(&history, 40), 0);
    }

    proptest! {
        #[test]
        fn count_never_exceeds_total(
            spans in prop::collection::vec((1u32..=60, 0u32..=15), 0..8),
            total in 1u32..=50,
        ) {
            let history: Vec<AcademicRecord> = spans
                .iter()
                .map(|(start, extra)| hafalan(1, "X", *start, start + extra))
                .collect();
            let count = memorized_verse_count(&history, total);
            prop_assert!(count <= total);
            // pure recompute is trivially idempotent
            prop_assert_eq!(count, memorized_verse_count(&history, total));
        }

        #[test]
        fn count_equals_distinct_covered_verses(
            spans in prop::collection::vec((1u32..=40, 0u32..=10), 1..6),
        ) {
            let history: Vec<AcademicRecord> = spans
                .iter()
                .map(|(start, extra)| hafalan(1, "X", *start, start + extra))
                .collect();
            let mut distinct: Vec<u32> = spans
                .iter()
                .flat_map(|(start, extra)| *start..=start + extra)
                .collect();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(memorized_verse_count(&history, 1000), distinct.len() as u32);
        }
    }

    #[tokio::test]
    async fn reconcile_is_idempotent_on_unchanged_history() {
        let mut repo = InMemoryRepository::with_sample_students();
        repo.append(hafalan(1, "An-Naba'", 1, 10)).await.unwrap();

        let first = reconcile(&mut repo, 1, &an_naba()).await.unwrap();
        let second = reconcile(&mut repo, 1, &an_naba()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.memorized_verses, 10);
        assert_eq!(first.status, MemorizationStatus::InProgress);
    }

    #[tokio::test]
    async fn append_then_delete_restores_previous_count() {
        let mut repo = InMemoryRepository::with_sample_students();
        repo.append(hafalan(1, "An-Naba'", 1, 10)).await.unwrap();
        let before = reconcile(&mut repo, 1, &an_naba()).await.unwrap();

        repo.append(hafalan(1, "An-Naba'", 11, 20)).await.unwrap();
        let grown = reconcile(&mut repo, 1, &an_naba()).await.unwrap();
        assert_eq!(grown.memorized_verses, 20);

        repo.delete_most_recent(1, RecordKind::Hafalan).await.unwrap();
        let after = reconcile(&mut repo, 1, &an_naba()).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn completing_every_verse_marks_the_surah_complete() {
        let mut repo = InMemoryRepository::with_sample_students();
        repo.append(hafalan(1, "An-Naba'", 1, 40)).await.unwrap();
        let target = reconcile(&mut repo, 1, &an_naba()).await.unwrap();
        assert_eq!(target.status, MemorizationStatus::Complete);
    }

    #[tokio::test]
    async fn level_follows_most_recent_tartili_record() {
        let levels = default_levels();
        let mut repo = InMemoryRepository::with_sample_students();
        repo.append(tartili(1, "Tartili 4", false)).await.unwrap();

        let level = reconcile_level(&mut repo, 1, &levels).await.unwrap();
        assert_eq!(level, "Tartili 4");
        assert_eq!(repo.current_level(1).await.unwrap(), "Tartili 4");
    }

    #[tokio::test]
    async fn graduation_drill_promotes_to_the_next_level() {
        let levels = default_levels();
        let mut repo = InMemoryRepository::with_sample_students();
        repo.append(tartili(1, "Tartili 3", true)).await.unwrap();

        let level = reconcile_level(&mut repo, 1, &levels).await.unwrap();
        assert_eq!(level, "Tartili 4");
    }

    #[tokio::test]
    async fn deleting_the_drill_rolls_the_level_back() {
        let levels = default_levels();
        let mut repo = InMemoryRepository::with_sample_students();
        repo.append(tartili(1, "Tartili 3", false)).await.unwrap();
        repo.append(tartili(1, "Tartili 3", true)).await.unwrap();
        reconcile_level(&mut repo, 1, &levels).await.unwrap();
        assert_eq!(repo.current_level(1).await.unwrap(), "Tartili 4");

        repo.delete_most_recent(1, RecordKind::Tartili).await.unwrap();
        let level = reconcile_level(&mut repo, 1, &levels).await.unwrap();
        assert_eq!(level, "Tartili 3");
    }

    #[tokio::test]
    async fn no_records_means_the_first_catalog_level() {
        let levels = default_levels();
        let mut repo = InMemoryRepository::with_sample_students();
        let level = reconcile_level(&mut repo, 1, &levels).await.unwrap();
        assert_eq!(level, "Tartili 1");
    }

    #[test]
    fn top_of_ladder_does_not_promote_past_the_end() {
        let levels = default_levels();
        assert_eq!(next_level(&levels, "Al Baqarah"), "Al Baqarah");
        assert_eq!(next_level(&levels, "Tartili 6"), "Gharib");
    }
}
