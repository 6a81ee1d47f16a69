//! Entity catalog: read-only lookup of students, classes, surahs and
//! Tartili levels, plus the seed tables the school works from

use serde::{Deserialize, Serialize};
use tahfidz_types::{Student, Surah};

use crate::repository::RepositoryError;

/// The ordered Tartili proficiency ladder
pub const TARTILI_LEVELS: &[&str] = &[
    "Tartili 1",
    "Tartili 2",
    "Tartili 3",
    "Tartili 4",
    "Tartili 5",
    "Tartili 6",
    "Gharib",
    "Al Baqarah",
];

/// Passages outside the juz target lists that teachers still assess;
/// Al-Fatihah is the most commonly recited surah of all
const EXTRA_SURAHS: &[(&str, u32)] = &[("Al-Fatihah", 7)];

const JUZ_30: &[(&str, u32)] = &[
    ("An-Naba'", 40),
    ("An-Nazi'at", 46),
    ("'Abasa", 42),
    ("At-Takwir", 29),
    ("Al-Infitar", 19),
    ("Al-Mutaffifin", 36),
    ("Al-Inshiqaq", 25),
    ("Al-Buruj", 22),
    ("At-Tariq", 17),
    ("Al-A'la", 19),
    ("Al-Ghashiyah", 26),
    ("Al-Fajr", 30),
    ("Al-Balad", 20),
    ("Ash-Shams", 15),
    ("Al-Lail", 21),
    ("Ad-Duha", 11),
    ("Ash-Sharh", 8),
    ("At-Tin", 8),
    ("'Alaq", 19),
    ("Al-Qadr", 5),
    ("Al-Bayyinah", 8),
    ("Az-Zalzalah", 8),
    ("Al-'Adiyat", 11),
    ("Al-Qari'ah", 11),
    ("At-Takathur", 8),
    ("Al-'Asr", 3),
    ("Al-Humazah", 9),
    ("Al-Fil", 5),
    ("Quraysh", 4),
    ("Al-Ma'un", 7),
    ("Al-Kawthar", 3),
    ("Al-Kafirun", 6),
    ("An-Nasr", 3),
    ("Al-Masad", 5),
    ("Al-Ikhlas", 4),
    ("Al-Falaq", 5),
    ("An-Nas", 6),
];

const JUZ_29: &[(&str, u32)] = &[
    ("Al-Mulk", 30),
    ("Al-Qalam", 52),
    ("Al-Haqqah", 52),
    ("Al-Ma'arij", 44),
    ("Nuh", 28),
    ("Al-Jinn", 28),
    ("Al-Muzzammil", 20),
    ("Al-Muddaththir", 56),
    ("Al-Qiyamah", 40),
    ("Al-Insan", 31),
    ("Al-Mursalat", 50),
];

const JUZ_28: &[(&str, u32)] = &[
    ("Al-Mujadila", 22),
    ("Al-Hashr", 24),
    ("Al-Mumtahanah", 13),
    ("As-Saff", 14),
    ("Al-Jumu'ah", 11),
    ("Al-Munafiqun", 11),
    ("At-Taghabun", 18),
    ("At-Talaq", 12),
    ("At-Tahrim", 12),
];

const JUZ_27: &[(&str, u32)] = &[
    ("Adh-Dhariyat", 60),
    ("At-Tur", 49),
    ("An-Najm", 62),
    ("Al-Qamar", 55),
    ("Ar-Rahman", 78),
    ("Al-Waqi'ah", 96),
    ("Al-Hadid", 29),
];

fn surah_table(tables: &[&[(&str, u32)]]) -> Vec<Surah> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .enumerate()
        .map(|(i, (name, total_verses))| Surah {
            id: 100 + i as u32,
            name: name.to_string(),
            total_verses: *total_verses,
        })
        .collect()
}

/// Every surah a teacher can name in an assessment: Al-Fatihah plus
/// Juz 30 down through Juz 27
pub fn default_surahs() -> Vec<Surah> {
    surah_table(&[EXTRA_SURAHS, JUZ_30, JUZ_29, JUZ_28, JUZ_27])
}

/// The subset the memorization program tracks targets for. Enrollment
/// seeds one zeroed target per entry here, not per catalog surah.
pub fn default_target_surahs() -> Vec<Surah> {
    let tracked = |name: &str| {
        JUZ_30
            .iter()
            .chain(JUZ_29.iter())
            .any(|(tracked, _)| *tracked == name)
    };
    default_surahs()
        .into_iter()
        .filter(|s| tracked(&s.name))
        .collect()
}

/// Default level ladder as owned strings
pub fn default_levels() -> Vec<String> {
    TARTILI_LEVELS.iter().map(|s| s.to_string()).collect()
}

/// A point-in-time copy of the catalog, handed to the resolver so it can
/// stay free of I/O
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub classes: Vec<String>,
    pub students: Vec<Student>,
    pub surahs: Vec<Surah>,
    pub levels: Vec<String>,
}

impl CatalogSnapshot {
    pub fn student(&self, id: tahfidz_types::StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn surah(&self, name: &str) -> Option<&Surah> {
        self.surahs.iter().find(|s| s.name == name)
    }
}

/// Read-only lookup of known students, classes and surahs.
///
/// Backed by the record repository; calls are fallible async operations
/// that a caller may cancel by dropping the future.
#[allow(async_fn_in_trait)]
pub trait EntityCatalog {
    async fn list_classes(&self) -> Result<Vec<String>, RepositoryError>;

    /// Students, optionally narrowed to one class, sorted by name
    async fn list_students(&self, class: Option<&str>) -> Result<Vec<Student>, RepositoryError>;

    async fn list_surahs(&self) -> Result<Vec<Surah>, RepositoryError>;

    async fn list_levels(&self) -> Result<Vec<String>, RepositoryError>;

    async fn snapshot(&self) -> Result<CatalogSnapshot, RepositoryError> {
        Ok(CatalogSnapshot {
            classes: self.list_classes().await?,
            students: self.list_students(None).await?,
            surahs: self.list_surahs().await?,
            levels: self.list_levels().await?,
        })
    }
}
