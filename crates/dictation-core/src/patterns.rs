//! Regex patterns and vocabularies for transcript decomposition

use lazy_static::lazy_static;
use regex::Regex;

/// Spoken digit words substituted into the working text before any
/// numeric pattern runs, so "halaman tiga" parses like "halaman 3"
pub const NUMBER_WORDS: &[(&str, &str)] = &[
    ("satu", "1"),
    ("dua", "2"),
    ("tiga", "3"),
    ("empat", "4"),
    ("lima", "5"),
    ("enam", "6"),
];

/// Month vocabulary; index + 1 is the calendar month number
pub const MONTH_NAMES: &[&str] = &[
    "januari",
    "februari",
    "maret",
    "april",
    "mei",
    "juni",
    "juli",
    "agustus",
    "september",
    "oktober",
    "november",
    "desember",
];

lazy_static! {
    /// "[halaman|hal] N [sampai|s.d.|-] M", always checked before the
    /// single-page pattern
    pub static ref PAGE_RANGE: Regex =
        Regex::new(r"(?:halaman|hal)\s+(\d+)\s+(?:sampai|s\.d\.|-)\s+(\d+)").unwrap();

    /// "[halaman|hal] N"
    pub static ref PAGE_SINGLE: Regex = Regex::new(r"(?:halaman|hal)\s+(\d+)").unwrap();

    /// "nilai N"; range checking happens in the record builder
    pub static ref SCORE: Regex = Regex::new(r"nilai\s+(\d+)").unwrap();

    /// "catatan(nya) ...", run case-insensitively against the original
    /// transcript so the captured tail keeps the speaker's casing
    pub static ref NOTES: Regex = Regex::new(r"(?i)catatan(?:nya)?\s+(.*)").unwrap();

    /// "tanggal D <bulan> [Y]"
    pub static ref SPOKEN_DATE: Regex =
        Regex::new(r"tanggal\s+(\d{1,2})\s+([a-z]+)(?:\s+(\d{4}))?").unwrap();

    /// "tartili N" or "jilid N"; the digit selects the catalog level
    /// whose name ends in it
    pub static ref LEVEL: Regex = Regex::new(r"(?:tartili|jilid)\s+(\d)").unwrap();

    /// "kelas 5 c", "kelas 6d"; captured text is compared against
    /// catalog class labels with whitespace stripped
    pub static ref CLASS: Regex = Regex::new(r"kelas\s+([a-z0-9\s]+)").unwrap();
}

/// Substitute spoken digit words with digit characters
pub fn normalize_digits(text: &str) -> String {
    let mut out = text.to_string();
    for (word, digit) in NUMBER_WORDS {
        out = out.replace(word, digit);
    }
    out
}

/// Lower-case and strip spaces, hyphens and apostrophes so catalog names
/// like "An-Nas" match "an nas" and "annas" alike
pub fn normalize_name(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '\''))
        .collect()
}

/// Upper-case a class label and strip all whitespace for exact comparison
pub fn normalize_class_label(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_words_become_digits() {
        assert_eq!(normalize_digits("halaman tiga sampai lima"), "halaman 3 sampai 5");
        assert_eq!(normalize_digits("nilai sembilan puluh"), "nilai sembilan puluh");
    }

    #[test]
    fn name_normalization_strips_separators() {
        assert_eq!(normalize_name("An-Nas"), "annas");
        assert_eq!(normalize_name("An-Naba'"), "annaba");
        assert_eq!(normalize_name("al ghashiyah"), "alghashiyah");
    }

    #[test]
    fn class_label_normalization() {
        assert_eq!(normalize_class_label("5 c"), "5C");
        assert_eq!(normalize_class_label(" 6d "), "6D");
    }

    #[test]
    fn page_range_pattern_accepts_all_separators() {
        for text in [
            "halaman 1 sampai 5",
            "hal 1 s.d. 5",
            "halaman 1 - 5",
        ] {
            let caps = PAGE_RANGE.captures(text).unwrap();
            assert_eq!(&caps[1], "1");
            assert_eq!(&caps[2], "5");
        }
    }

    #[test]
    fn notes_pattern_captures_original_casing() {
        let caps = NOTES.captures("Catatannya Sangat Lancar").unwrap();
        assert_eq!(&caps[1], "Sangat Lancar");
    }

    #[test]
    fn level_pattern_accepts_both_trigger_words() {
        assert_eq!(&LEVEL.captures("tartili 3").unwrap()[1], "3");
        assert_eq!(&LEVEL.captures("jilid 4").unwrap()[1], "4");
    }
}
