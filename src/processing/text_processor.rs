//! Text cleaning, tokenization and document statistics

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    email_regex: Regex,
    phone_regex: Regex,
    url_regex: Regex,
    whitespace_regex: Regex,
    punct_regex: Regex,
}

#[derive(Debug, Clone)]
pub struct ProcessedText {
    pub cleaned: String,
    pub tokens: Vec<String>,
    pub sentences: Vec<String>,
    pub word_count: usize,
    pub character_count: usize,
}

/// Shape statistics used as classifier features
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStats {
    pub word_count: usize,
    pub unique_words: usize,
    pub sentence_count: usize,
    /// Unique tokens over total tokens, 0.0 for empty text
    pub vocabulary_richness: f64,
    pub avg_sentence_length: f64,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"\b(?:\+?1[-. ]?)?\(?[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}\b")
            .expect("Invalid phone regex");

        let url_regex = Regex::new(r"https?://[^\s]+").expect("Invalid URL regex");

        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        let punct_regex = Regex::new(r"[.!?]{2,}").expect("Invalid punctuation regex");

        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            email_regex,
            phone_regex,
            url_regex,
            whitespace_regex,
            punct_regex,
        }
    }

    /// Clean, tokenize and split text into sentences
    pub fn process(&self, text: &str) -> ProcessedText {
        let cleaned = self.clean_text(text);
        let tokens = self.tokenize(&cleaned);
        let sentences = self.split_sentences(&cleaned);

        let word_count = tokens.len();
        let character_count = cleaned.chars().count();

        ProcessedText {
            cleaned,
            tokens,
            sentences,
            word_count,
            character_count,
        }
    }

    /// Strip contact details and normalize whitespace, punctuation and quotes
    pub fn clean_text(&self, text: &str) -> String {
        let mut cleaned = self.url_regex.replace_all(text, " ").to_string();
        cleaned = self.email_regex.replace_all(&cleaned, " ").to_string();
        cleaned = self.phone_regex.replace_all(&cleaned, " ").to_string();
        cleaned = self.whitespace_regex.replace_all(&cleaned, " ").trim().to_string();
        cleaned = self.punct_regex.replace_all(&cleaned, ".").to_string();
        Self::normalize_unicode(&cleaned)
    }

    /// Lowercased word tokens without stop words or pure numbers
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| word.chars().count() > 1 && !self.stop_words.contains(word.as_str()))
            .filter(|word| word.chars().any(|c| c.is_alphabetic()))
            .collect()
    }

    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn stats_of(processed: &ProcessedText) -> TextStats {
        let unique_words = processed.tokens.iter().collect::<HashSet<_>>().len();
        let sentence_count = processed.sentences.len();

        let vocabulary_richness = if processed.word_count == 0 {
            0.0
        } else {
            unique_words as f64 / processed.word_count as f64
        };

        let avg_sentence_length = if sentence_count == 0 {
            0.0
        } else {
            processed.word_count as f64 / sentence_count as f64
        };

        TextStats {
            word_count: processed.word_count,
            unique_words,
            sentence_count,
            vocabulary_richness,
            avg_sentence_length,
        }
    }

    /// Jaccard similarity of the two token sets
    pub fn token_similarity(a: &ProcessedText, b: &ProcessedText) -> f64 {
        let set1: HashSet<&String> = a.tokens.iter().collect();
        let set2: HashSet<&String> = b.tokens.iter().collect();

        let intersection = set1.intersection(&set2).count();
        let union = set1.union(&set2).count();

        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }

    fn normalize_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2026}' => '.',
                _ => c,
            })
            .collect()
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in",
    "is", "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "this",
    "but", "they", "have", "had", "what", "which", "she", "do", "how", "their", "if",
    "up", "out", "then", "them", "these", "so", "some", "her", "would", "into", "him",
    "more", "no", "could", "my", "than", "been", "who", "now", "did", "get", "may",
    "over", "only", "me", "our", "just", "very", "also", "any", "we", "you", "your",
    "or", "not", "all", "can", "were", "there", "about", "such", "should", "must",
    "i", "am", "us", "it's", "i'm", "don't", "while", "both", "each", "other",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_processing() {
        let processor = TextProcessor::new();
        let text = "Hello, world! This is a test document with email@example.com and phone (555) 123-4567.";

        let result = processor.process(text);

        assert!(!result.cleaned.is_empty());
        assert!(!result.cleaned.contains("email@example.com"));
        assert!(result.tokens.len() > 0);
        assert!(result.sentences.len() > 0);
    }

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming language is awesome in 2024!");

        assert!(tokens.contains(&"rust".to_string()));
        assert!(tokens.contains(&"programming".to_string()));
        assert!(tokens.contains(&"awesome".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        assert!(!tokens.contains(&"2024".to_string()));
    }

    #[test]
    fn test_stats_on_empty_text() {
        let stats = TextProcessor::stats_of(&TextProcessor::new().process("   "));
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.vocabulary_richness, 0.0);
        assert_eq!(stats.avg_sentence_length, 0.0);
    }

    #[test]
    fn test_vocabulary_richness() {
        let stats = TextProcessor::stats_of(&TextProcessor::new().process("rust rust rust python"));
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.unique_words, 2);
        assert!((stats.vocabulary_richness - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_token_similarity() {
        let processor = TextProcessor::new();
        let similarity = |a: &str, b: &str| {
            TextProcessor::token_similarity(&processor.process(a), &processor.process(b))
        };

        assert!((similarity("Rust programming language", "Programming in Rust language") - 1.0).abs() < 1e-9);
        assert_eq!(similarity("docker kubernetes", "painting sculpture"), 0.0);
        assert_eq!(similarity("", ""), 0.0);
    }
}
