//! Record repository: one storage interface with swappable backends
//!
//! A single trait covers record storage and the derived state the
//! reconciler owns; the in-memory backend doubles as the test double and
//! the demo data set.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

use tahfidz_types::{AcademicRecord, RecordKind, Student, StudentId, Surah, SurahTarget};

use crate::catalog::{default_levels, default_surahs, default_target_surahs, EntityCatalog};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("student not found: {0}")]
    StudentNotFound(StudentId),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Append-only record store plus the derived state the reconciler owns.
///
/// Calls are fallible async operations; a caller cancels one by dropping
/// the future. One form is active at a time, so no locking discipline
/// beyond read-compute-write is required.
#[allow(async_fn_in_trait)]
pub trait RecordRepository {
    /// Store a record, stamping the creation instant used for ordering
    async fn append(&mut self, record: AcademicRecord) -> Result<(), RepositoryError>;

    /// The most recently created record of one kind for one student.
    /// Creation order, never the (possibly back-dated) date field.
    async fn most_recent(
        &self,
        student: StudentId,
        kind: RecordKind,
    ) -> Result<Option<AcademicRecord>, RepositoryError>;

    /// Remove the most recently created record of one kind for one
    /// student; a no-op when the student has none
    async fn delete_most_recent(
        &mut self,
        student: StudentId,
        kind: RecordKind,
    ) -> Result<(), RepositoryError>;

    /// Every record of one student that references the named surah
    async fn history(
        &self,
        student: StudentId,
        surah: &str,
    ) -> Result<Vec<AcademicRecord>, RepositoryError>;

    async fn target(
        &self,
        student: StudentId,
        surah: &str,
    ) -> Result<Option<SurahTarget>, RepositoryError>;

    async fn save_target(&mut self, target: SurahTarget) -> Result<(), RepositoryError>;

    async fn current_level(&self, student: StudentId) -> Result<String, RepositoryError>;

    async fn set_current_level(
        &mut self,
        student: StudentId,
        level: &str,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
struct StoredRecord {
    seq: u64, // insertion order, tie-breaker for identical timestamps
    created_at: DateTime<Utc>,
    record: AcademicRecord,
}

/// In-memory backend over the default catalog
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    students: Vec<Student>,
    surahs: Vec<Surah>,
    target_surahs: Vec<Surah>,
    levels: Vec<String>,
    records: Vec<StoredRecord>,
    targets: Vec<SurahTarget>,
    current_levels: HashMap<StudentId, String>,
    next_student_id: StudentId,
    next_seq: u64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            surahs: default_surahs(),
            target_surahs: default_target_surahs(),
            levels: default_levels(),
            next_student_id: 1,
            ..Self::default()
        }
    }

    /// The five-student roster the school demos with
    pub fn with_sample_students() -> Self {
        let mut repo = Self::new();
        for (name, class, level) in [
            ("Ahmad Fauzi", "5C", "Tartili 3"),
            ("Budi Santoso", "5C", "Tartili 4"),
            ("Citra Lestari", "5D", "Tartili 2"),
            ("Dewi Anggraini", "6C", "Tartili 3"),
            ("Eka Wijaya", "6D", "Gharib"),
        ] {
            let student = repo.enroll_student(name, class);
            repo.current_levels.insert(student.id, level.to_string());
        }
        repo
    }

    /// Register a student and create one zeroed memorization target per
    /// tracked surah. The matching catalog is wider than the target
    /// list; assessments outside it get a target lazily on reconcile.
    pub fn enroll_student(&mut self, name: &str, class: &str) -> Student {
        let student = Student {
            id: self.next_student_id,
            name: name.to_string(),
            class: class.trim().to_uppercase(),
        };
        self.next_student_id += 1;
        for surah in &self.target_surahs {
            self.targets
                .push(SurahTarget::new(student.id, &surah.name, surah.total_verses));
        }
        if let Some(first) = self.levels.first() {
            self.current_levels.insert(student.id, first.clone());
        }
        self.students.push(student.clone());
        student
    }

    /// Drop a student along with their records and targets
    pub fn remove_student(&mut self, student: StudentId) {
        self.students.retain(|s| s.id != student);
        self.records.retain(|r| r.record.student_id != student);
        self.targets.retain(|t| t.student_id != student);
        self.current_levels.remove(&student);
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    fn student_exists(&self, student: StudentId) -> bool {
        self.students.iter().any(|s| s.id == student)
    }

    fn most_recent_index(&self, student: StudentId, kind: RecordKind) -> Option<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.record.student_id == student && r.record.detail.kind() == kind)
            .max_by_key(|(_, r)| (r.created_at, r.seq))
            .map(|(i, _)| i)
    }
}

impl RecordRepository for InMemoryRepository {
    async fn append(&mut self, record: AcademicRecord) -> Result<(), RepositoryError> {
        if !self.student_exists(record.student_id) {
            return Err(RepositoryError::StudentNotFound(record.student_id));
        }
        self.records.push(StoredRecord {
            seq: self.next_seq,
            created_at: Utc::now(),
            record,
        });
        self.next_seq += 1;
        Ok(())
    }

    async fn most_recent(
        &self,
        student: StudentId,
        kind: RecordKind,
    ) -> Result<Option<AcademicRecord>, RepositoryError> {
        Ok(self
            .most_recent_index(student, kind)
            .map(|i| self.records[i].record.clone()))
    }

    async fn delete_most_recent(
        &mut self,
        student: StudentId,
        kind: RecordKind,
    ) -> Result<(), RepositoryError> {
        if let Some(i) = self.most_recent_index(student, kind) {
            self.records.remove(i);
        }
        Ok(())
    }

    async fn history(
        &self,
        student: StudentId,
        surah: &str,
    ) -> Result<Vec<AcademicRecord>, RepositoryError> {
        Ok(self
            .records
            .iter()
            .filter(|r| {
                r.record.student_id == student && r.record.detail.surah_name() == Some(surah)
            })
            .map(|r| r.record.clone())
            .collect())
    }

    async fn target(
        &self,
        student: StudentId,
        surah: &str,
    ) -> Result<Option<SurahTarget>, RepositoryError> {
        Ok(self
            .targets
            .iter()
            .find(|t| t.student_id == student && t.surah_name == surah)
            .cloned())
    }

    async fn save_target(&mut self, target: SurahTarget) -> Result<(), RepositoryError> {
        match self
            .targets
            .iter_mut()
            .find(|t| t.student_id == target.student_id && t.surah_name == target.surah_name)
        {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
        Ok(())
    }

    async fn current_level(&self, student: StudentId) -> Result<String, RepositoryError> {
        self.current_levels
            .get(&student)
            .cloned()
            .ok_or(RepositoryError::StudentNotFound(student))
    }

    async fn set_current_level(
        &mut self,
        student: StudentId,
        level: &str,
    ) -> Result<(), RepositoryError> {
        if !self.student_exists(student) {
            return Err(RepositoryError::StudentNotFound(student));
        }
        self.current_levels.insert(student, level.to_string());
        Ok(())
    }
}

impl EntityCatalog for InMemoryRepository {
    async fn list_classes(&self) -> Result<Vec<String>, RepositoryError> {
        let mut classes: Vec<String> = self.students.iter().map(|s| s.class.clone()).collect();
        classes.sort();
        classes.dedup();
        Ok(classes)
    }

    async fn list_students(&self, class: Option<&str>) -> Result<Vec<Student>, RepositoryError> {
        let mut students: Vec<Student> = self
            .students
            .iter()
            .filter(|s| class.map_or(true, |c| s.class == c))
            .cloned()
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(students)
    }

    async fn list_surahs(&self) -> Result<Vec<Surah>, RepositoryError> {
        Ok(self.surahs.clone())
    }

    async fn list_levels(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.levels.clone())
    }
}
