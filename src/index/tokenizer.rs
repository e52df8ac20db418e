//! Text tokenization
//!
//! Normalizes raw field text into index terms: optional case folding,
//! splitting on whitespace and a fixed punctuation class, dropping
//! empties. Tokenizers are pure and restartable.

/// Tokenizer trait for pluggable text analysis
pub trait Tokenizer: Send + Sync {
    /// Tokenize text into a list of terms
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Characters that separate terms, besides Unicode whitespace.
const DELIMITERS: &[char] = &[
    ',', '.', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}', '/', '\\',
];

/// Default tokenizer: splits on whitespace and the fixed delimiter class,
/// lowercasing first unless `case_sensitive`.
#[derive(Debug, Clone)]
pub struct DelimiterTokenizer {
    pub case_sensitive: bool,
}

impl Default for DelimiterTokenizer {
    fn default() -> Self {
        Self {
            case_sensitive: false,
        }
    }
}

impl DelimiterTokenizer {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }
}

impl Tokenizer for DelimiterTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };

        normalized
            .split(|c: char| c.is_whitespace() || DELIMITERS.contains(&c))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        let tokenizer = DelimiterTokenizer::default();
        let tokens = tokenizer.tokenize("Hello World Test");
        assert_eq!(tokens, vec!["hello", "world", "test"]);
    }

    #[test]
    fn test_punctuation_class() {
        let tokenizer = DelimiterTokenizer::default();
        let tokens = tokenizer.tokenize("one,two.three!four?five;six:seven");
        assert_eq!(
            tokens,
            vec!["one", "two", "three", "four", "five", "six", "seven"]
        );

        let tokens = tokenizer.tokenize("a'b\"c(d)e[f]g{h}i/j\\k");
        assert_eq!(
            tokens,
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"]
        );
    }

    #[test]
    fn test_delimiter_runs_drop_empties() {
        let tokenizer = DelimiterTokenizer::default();
        let tokens = tokenizer.tokenize("  one,, ,two...  ");
        assert_eq!(tokens, vec!["one", "two"]);
    }

    #[test]
    fn test_case_folding() {
        let folded = DelimiterTokenizer::default();
        assert_eq!(folded.tokenize("JavaScript"), vec!["javascript"]);

        let sensitive = DelimiterTokenizer::new(true);
        assert_eq!(sensitive.tokenize("JavaScript"), vec!["JavaScript"]);
    }

    #[test]
    fn test_empty_input() {
        let tokenizer = DelimiterTokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \t\n ").is_empty());
        assert!(tokenizer.tokenize(",.!?").is_empty());
    }
}
