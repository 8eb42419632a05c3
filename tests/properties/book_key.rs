//! Property tests for book key normalization.

use proptest::prelude::*;

use marginalia::domain::value_objects::BookKey;

fn title() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ,.:;!?'éüñÅ-]{0,48}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The same title always yields the same key.
    #[test]
    fn property_key_is_deterministic(t in "(?s).{0,128}") {
        prop_assert_eq!(BookKey::from_title(&t), BookKey::from_title(&t));
    }

    /// PROPERTY: Keys are non-empty, lower-case ASCII slugs safe as file names.
    #[test]
    fn property_key_is_file_name_safe(t in "(?s).{0,128}") {
        let key = BookKey::from_title(&t);
        let s = key.as_str();

        prop_assert!(!s.is_empty());
        prop_assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!s.starts_with('-'));
        prop_assert!(!s.ends_with('-'));
        prop_assert!(!s.contains("--"));
    }

    /// PROPERTY: Case and surrounding punctuation never split a book.
    #[test]
    fn property_case_and_punctuation_variants_merge(t in title()) {
        let shouted = format!("  {}!!", t.to_uppercase());
        prop_assert_eq!(BookKey::from_title(&t), BookKey::from_title(&shouted));
    }

    /// PROPERTY: Titles in Cyrillic or Greek never collapse to the fallback key.
    #[test]
    fn property_non_latin_titles_keep_their_own_key(t in "[а-щыэюяα-ω ]{0,8}[а-щыэюяα-ω][а-щыэюяα-ω ]{0,8}") {
        let key = BookKey::from_title(&t);
        prop_assert_ne!(key.as_str(), "untitled");
    }

    /// PROPERTY: Two Cyrillic titles with different consonant skeletons
    /// never share a key.
    #[test]
    fn property_distinct_cyrillic_titles_stay_apart(
        a in "[бвгдзклмнпрстф]{1,12}",
        b in "[бвгдзклмнпрстф]{1,12}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(BookKey::from_title(&a), BookKey::from_title(&b));
    }

    /// PROPERTY: Normalizing an existing key is a no-op.
    #[test]
    fn property_key_is_idempotent(t in "(?s).{0,128}") {
        let key = BookKey::from_title(&t);
        prop_assert_eq!(BookKey::from_title(key.as_str()), key);
    }
}
