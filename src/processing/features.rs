//! Feature vector for the fit classifier

use crate::processing::match_engine::MatchScore;
use crate::processing::text_processor::TextProcessor;
use serde::Serialize;

/// Characters of cleaned text compared with character-bigram similarity
const MAX_SIMILARITY_CHARS: usize = 4000;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "match_score",
    "num_matched",
    "num_missing",
    "resume_log_words",
    "job_log_words",
    "resume_vocabulary_richness",
    "job_vocabulary_richness",
    "token_jaccard",
    "char_bigram_dice",
    "resume_avg_sentence_length",
];

pub const FEATURE_COUNT: usize = 10;

/// Fixed-order numeric features describing a resume/job pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitFeatures {
    values: [f64; FEATURE_COUNT],
}

impl FitFeatures {
    pub fn build(
        processor: &TextProcessor,
        resume_text: &str,
        job_text: &str,
        match_score: MatchScore,
        num_matched: usize,
        num_missing: usize,
    ) -> Self {
        let resume = processor.process(resume_text);
        let job = processor.process(job_text);
        let resume_stats = TextProcessor::stats_of(&resume);
        let job_stats = TextProcessor::stats_of(&job);

        let dice = char_bigram_similarity(&resume.cleaned, &job.cleaned);

        let values = [
            match_score.value() / 100.0,
            num_matched as f64,
            num_missing as f64,
            (resume_stats.word_count as f64).ln_1p(),
            (job_stats.word_count as f64).ln_1p(),
            resume_stats.vocabulary_richness,
            job_stats.vocabulary_richness,
            TextProcessor::token_similarity(&resume, &job),
            dice,
            resume_stats.avg_sentence_length,
        ];

        Self { values }
    }

    pub fn names() -> &'static [&'static str] {
        &FEATURE_NAMES
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }
}

fn char_bigram_similarity(a: &str, b: &str) -> f64 {
    let a: String = a.to_lowercase().chars().take(MAX_SIMILARITY_CHARS).collect();
    let b: String = b.to_lowercase().chars().take(MAX_SIMILARITY_CHARS).collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::sorensen_dice(&a, &b)
}
