//! Fuzzy catalog matching over small in-memory catalogs
//!
//! All matchers are linear scans; catalogs are dozens of entries at
//! most. First match wins everywhere, which means a name that is a
//! prefix of another can shadow it; a known limitation of the matching
//! contract, not a defect.

use tahfidz_types::{Student, Surah};

use crate::patterns::{normalize_class_label, normalize_name};

/// Find the first student whose full lower-cased name appears in the
/// working text
pub fn match_student<'a>(students: &'a [Student], working_text: &str) -> Option<&'a Student> {
    students
        .iter()
        .find(|s| working_text.contains(&s.name.to_lowercase()))
}

/// Find the first surah whose normalized name is contained in the
/// normalized working text; "An-Nas" matches "an nas" and "annas", but
/// "nas" alone matches nothing
pub fn match_surah<'a>(surahs: &'a [Surah], working_text: &str) -> Option<&'a Surah> {
    let haystack = normalize_name(working_text);
    surahs
        .iter()
        .find(|s| haystack.contains(&normalize_name(&s.name)))
}

/// Map a spoken level digit to the catalog level whose name ends in it
pub fn match_level<'a>(levels: &'a [String], digit: char) -> Option<&'a str> {
    levels
        .iter()
        .find(|level| level.ends_with(digit))
        .map(String::as_str)
}

/// Exact-equality class lookup after whitespace stripping on both sides
pub fn match_class<'a>(classes: &'a [String], normalized_hint: &str) -> Option<&'a str> {
    classes
        .iter()
        .find(|class| normalize_class_label(class) == normalized_hint)
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students() -> Vec<Student> {
        vec![
            Student {
                id: 1,
                name: "Ahmad Fauzi".to_string(),
                class: "5C".to_string(),
            },
            Student {
                id: 3,
                name: "Citra Lestari".to_string(),
                class: "5D".to_string(),
            },
        ]
    }

    fn surahs() -> Vec<Surah> {
        vec![
            Surah {
                id: 114,
                name: "An-Nas".to_string(),
                total_verses: 6,
            },
            Surah {
                id: 78,
                name: "An-Naba'".to_string(),
                total_verses: 40,
            },
        ]
    }

    #[test]
    fn student_full_name_substring_match() {
        let students = students();
        let found = match_student(&students, "ahmad fauzi kelas 5c nilai 90");
        assert_eq!(found.map(|s| s.id), Some(1));
        assert_eq!(match_student(&students, "ahmad saja nilai 90"), None);
    }

    #[test]
    fn surah_match_is_spacing_and_hyphen_insensitive() {
        let surahs = surahs();
        assert_eq!(match_surah(&surahs, "murojaah an nas").map(|s| s.id), Some(114));
        assert_eq!(match_surah(&surahs, "murojaah annas").map(|s| s.id), Some(114));
    }

    #[test]
    fn bare_fragment_does_not_match_a_surah() {
        assert_eq!(match_surah(&surahs(), "murojaah nas"), None);
    }

    #[test]
    fn apostrophe_in_catalog_name_is_ignored() {
        let surahs = surahs();
        assert_eq!(
            match_surah(&surahs, "hafalan an naba ayat 1").map(|s| s.id),
            Some(78)
        );
    }

    #[test]
    fn level_digit_selects_by_suffix() {
        let levels: Vec<String> = ["Tartili 1", "Tartili 2", "Tartili 3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(match_level(&levels, '3'), Some("Tartili 3"));
        assert_eq!(match_level(&levels, '7'), None);
    }

    #[test]
    fn class_match_ignores_whitespace_on_both_sides() {
        let classes: Vec<String> = ["5 C", "6D"].iter().map(|s| s.to_string()).collect();
        assert_eq!(match_class(&classes, "5C"), Some("5 C"));
        assert_eq!(match_class(&classes, "6D"), Some("6D"));
        assert_eq!(match_class(&classes, "7A"), None);
    }
}
