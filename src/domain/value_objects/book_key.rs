//! Book Key Value Object
//!
//! Normalized identity of a book within a sync pass. Two titles that differ
//! only in case, accents or punctuation produce the same key, so their
//! highlights land in the same artifact. Non-Latin titles are transliterated,
//! so distinct books in other scripts keep distinct keys.

use std::fmt;

use deunicode::deunicode_char;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Key used when a title normalizes to nothing (e.g. only punctuation)
const UNTITLED: &str = "untitled";

/// A normalized, file-name safe book identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookKey(String);

impl BookKey {
    /// Derive the key from a book title.
    ///
    /// Pure and deterministic: NFC composition, stray combining marks
    /// dropped, everything else transliterated to ASCII, alphanumerics
    /// lower-cased and every other run collapsed to `-`.
    pub fn from_title(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len());
        let mut pending_dash = false;

        for ch in title.nfc().filter(|c| !is_combining_mark(*c)) {
            let mut buf = [0u8; 4];
            let ascii = if ch.is_ascii() {
                &*ch.encode_utf8(&mut buf)
            } else {
                deunicode_char(ch).unwrap_or("")
            };

            for c in ascii.chars() {
                if c.is_ascii_alphanumeric() {
                    if pending_dash && !slug.is_empty() {
                        slug.push('-');
                    }
                    pending_dash = false;
                    slug.push(c.to_ascii_lowercase());
                } else {
                    pending_dash = true;
                }
            }
        }

        if slug.is_empty() {
            Self(UNTITLED.to_string())
        } else {
            Self(slug)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the artifact for this book
    pub fn file_name(&self) -> String {
        format!("{}.md", self.0)
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BookKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
