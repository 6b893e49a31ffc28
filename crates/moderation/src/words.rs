//! Vulgar vocabulary detection and masking
//!
//! Words are matched whole and case-insensitively: a listed word embedded
//! in a longer word ("hell" in "hello") never matches.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur while building a word list
#[derive(Debug, Error)]
pub enum WordListError {
    /// Empty entry
    #[error("Word list entries must not be empty")]
    EmptyWord,

    /// Entry contains characters that cannot be matched as a single word
    #[error("Invalid word list entry: {0}")]
    InvalidWord(String),

    /// Word list too large
    #[error("Word list too large: {count} exceeds maximum {max}")]
    TooManyWords {
        /// Actual count
        count: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Matcher could not be compiled
    #[error("Failed to compile word matcher: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for word list operations
pub type Result<T> = std::result::Result<T, WordListError>;

/// Maximum number of words in a list
pub const MAX_WORDS: usize = 500;

/// Built-in vocabulary hidden from younger viewers
pub const VULGAR_WORDS: &[&str] = &[
    "damn",
    "damned",
    "dammit",
    "hell",
    "crap",
    "crappy",
    "stupid",
    "idiot",
    "dumb",
    "moron",
    "jerk",
    "loser",
    "sucks",
    "ass",
    "piss",
    "pissed",
    "bastard",
    "bloody",
];

/// Character used to mask a matched word
pub const MASK_CHAR: char = '*';

/// An immutable, compiled list of words to detect and mask
#[derive(Debug, Clone)]
pub struct VulgarWordList {
    /// Normalized words, sorted and deduplicated
    words: Vec<String>,
    /// Whole-word matcher; `None` when the list is empty
    matcher: Option<Regex>,
}

impl VulgarWordList {
    /// Build a word list from arbitrary entries
    ///
    /// Entries are trimmed and lowercased; duplicates collapse. Each entry
    /// must start and end with a letter or digit and contain only word
    /// characters, apostrophes or hyphens.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = BTreeSet::new();
        for word in words {
            normalized.insert(normalize_word(word.as_ref())?);
        }

        if normalized.len() > MAX_WORDS {
            return Err(WordListError::TooManyWords {
                count: normalized.len(),
                max: MAX_WORDS,
            });
        }

        let words: Vec<String> = normalized.into_iter().collect();
        let matcher = compile_matcher(&words)?;

        Ok(Self { words, matcher })
    }

    /// The built-in list, compiled once per process
    pub fn builtin() -> &'static VulgarWordList {
        static BUILTIN: OnceLock<VulgarWordList> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            VulgarWordList::new(VULGAR_WORDS.iter().copied())
                .expect("built-in word list is valid")
        })
    }

    /// The built-in list extended with `extra` entries
    pub fn builtin_with<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra: Vec<String> = extra.into_iter().map(|w| w.as_ref().to_string()).collect();
        Self::new(VULGAR_WORDS.iter().map(|w| w.to_string()).chain(extra))
    }

    /// Normalized words in this list
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list has no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Check whether `word` is listed
    pub fn contains_word(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.words.binary_search(&word).is_ok()
    }

    /// Check if any listed word appears whole in `text`
    pub fn contains_vulgar_words(&self, text: &str) -> bool {
        match &self.matcher {
            Some(matcher) if !text.is_empty() => matcher.is_match(text),
            _ => false,
        }
    }

    /// Find the first listed word appearing whole in `text`, as written
    pub fn find_vulgar_word<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.matcher.as_ref()?.find(text).map(|m| m.as_str())
    }

    /// Mask every whole-word occurrence with an equal-length run of `*`
    pub fn sanitize_text(&self, text: &str) -> String {
        match &self.matcher {
            Some(matcher) => matcher
                .replace_all(text, |caps: &regex::Captures<'_>| mask(&caps[0]))
                .into_owned(),
            None => text.to_string(),
        }
    }
}

impl Default for VulgarWordList {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn normalize_word(word: &str) -> Result<String> {
    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return Err(WordListError::EmptyWord);
    }

    let inner_ok = word
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '\'' || c == '-');
    // Word boundaries only make sense next to word characters
    let edges_ok = word.starts_with(|c: char| c.is_alphanumeric())
        && word.ends_with(|c: char| c.is_alphanumeric());
    if !(inner_ok && edges_ok) {
        return Err(WordListError::InvalidWord(word));
    }

    Ok(word)
}

fn compile_matcher(words: &[String]) -> Result<Option<Regex>> {
    if words.is_empty() {
        return Ok(None);
    }

    // Longest first so that "crappy" wins over "crap" at the same position
    let mut ordered: Vec<&String> = words.iter().collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let alternation = ordered
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");

    let regex = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))?;
    Ok(Some(regex))
}

fn mask(matched: &str) -> String {
    std::iter::repeat(MASK_CHAR).take(matched.chars().count()).collect()
}

/// Check `text` against the built-in list
pub fn contains_vulgar_words(text: &str) -> bool {
    VulgarWordList::builtin().contains_vulgar_words(text)
}

/// Mask `text` using the built-in list
pub fn sanitize_text(text: &str) -> String {
    VulgarWordList::builtin().sanitize_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Detection tests

    #[test]
    fn test_contains_whole_word() {
        assert!(contains_vulgar_words("damn"));
        assert!(contains_vulgar_words("well, DAMN."));
        assert!(contains_vulgar_words("What the Hell?"));
    }

    #[test]
    fn test_embedded_word_does_not_match() {
        assert!(!contains_vulgar_words("condamnation"));
        assert!(!contains_vulgar_words("CONDAMNATION"));
        assert!(!contains_vulgar_words("hello there"));
        assert!(!contains_vulgar_words("shellfish"));
        assert!(!contains_vulgar_words("classic assessment"));
    }

    #[test]
    fn test_empty_text_is_clean() {
        assert!(!contains_vulgar_words(""));
    }

    #[test]
    fn test_find_vulgar_word_keeps_case() {
        let list = VulgarWordList::builtin();
        assert_eq!(list.find_vulgar_word("oh Crap, again"), Some("Crap"));
        assert_eq!(list.find_vulgar_word("all good"), None);
    }

    // Sanitization tests

    #[test]
    fn test_sanitize_single_word() {
        assert_eq!(sanitize_text("This is damn bad"), "This is **** bad");
    }

    #[test]
    fn test_sanitize_multiple_words() {
        assert_eq!(
            sanitize_text("Damn, that stupid crap is hell"),
            "****, that ****** **** is ****"
        );
        assert_eq!(sanitize_text("damn damn"), "**** ****");
    }

    #[test]
    fn test_sanitize_prefers_longest_word() {
        assert_eq!(sanitize_text("so crappy"), "so ******");
    }

    #[test]
    fn test_sanitize_leaves_clean_text() {
        let text = "Hello, the condamnation of shellfish is classic";
        assert_eq!(sanitize_text(text), text);
    }

    #[test]
    fn test_sanitize_preserves_length() {
        let text = "Stupid ideas, damn it";
        assert_eq!(sanitize_text(text).chars().count(), text.chars().count());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_text("damn hell crap");
        assert_eq!(sanitize_text(&once), once);
    }

    // Word list construction tests

    #[test]
    fn test_word_list_normalizes_entries() {
        let list = VulgarWordList::new(["  Frak ", "frak", "GORRAM"]).unwrap();
        assert_eq!(list.words(), &["frak".to_string(), "gorram".to_string()]);
        assert!(list.contains_word("FRAK"));
        assert!(list.contains_vulgar_words("what the frak"));
        assert!(!list.contains_vulgar_words("damn"));
    }

    #[test]
    fn test_word_list_rejects_bad_entries() {
        assert!(matches!(VulgarWordList::new([""]), Err(WordListError::EmptyWord)));
        assert!(matches!(
            VulgarWordList::new(["two words"]),
            Err(WordListError::InvalidWord(_))
        ));
        assert!(matches!(
            VulgarWordList::new(["a.*"]),
            Err(WordListError::InvalidWord(_))
        ));
        assert!(matches!(
            VulgarWordList::new(["-dash"]),
            Err(WordListError::InvalidWord(_))
        ));
        assert!(VulgarWordList::new(["dang-it", "can't"]).is_ok());
    }

    #[test]
    fn test_word_list_too_large() {
        let words: Vec<String> = (0..=MAX_WORDS).map(|i| format!("word{}", i)).collect();
        assert!(matches!(
            VulgarWordList::new(&words),
            Err(WordListError::TooManyWords { count, max }) if count == MAX_WORDS + 1 && max == MAX_WORDS
        ));
    }

    #[test]
    fn test_empty_word_list_matches_nothing() {
        let list = VulgarWordList::new(Vec::<String>::new()).unwrap();
        assert!(list.is_empty());
        assert!(!list.contains_vulgar_words("damn"));
        assert_eq!(list.sanitize_text("damn"), "damn");
    }

    #[test]
    fn test_builtin_with_extra_words() {
        let list = VulgarWordList::builtin_with(["frak"]).unwrap();
        assert_eq!(list.len(), VULGAR_WORDS.len() + 1);
        assert_eq!(list.sanitize_text("damn frak"), "**** ****");
    }

    #[test]
    fn test_error_display() {
        let error = WordListError::TooManyWords { count: 600, max: 500 };
        assert!(format!("{}", error).contains("600"));
    }
}
