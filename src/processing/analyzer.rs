//! Fit analysis engine wiring extraction, matching and classification together

use crate::config::Config;
use crate::error::Result;
use crate::processing::extractor::{
    CommandRecognizer, EntityRecognizer, LexiconExtractor, NerExtractor, SkillExtractor,
};
use crate::processing::fit_classifier::{FitClassifier, FitVerdict};
use crate::processing::lexicon::{Lexicon, SkillCategory};
use crate::processing::match_engine::{match_skills, MatchResult};
use crate::processing::normalizer::SkillNormalizer;
use crate::processing::skill::{Skill, SkillSet};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Read-only engine built once per process and shared by callers
pub struct FitAnalysisEngine {
    normalizer: Arc<SkillNormalizer>,
    lexicon: Arc<Lexicon>,
    extractor: SkillExtractor,
    classifier: FitClassifier,
}

/// Everything derived from one resume/job pair
#[derive(Debug, Clone, Serialize)]
pub struct FitAnalysis {
    pub resume_skills: SkillSet,
    pub job_skills: SkillSet,
    pub match_result: MatchResult,
    pub verdict: FitVerdict,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub lexicon_size: usize,
    pub alias_count: usize,
    pub pattern_count: usize,
    pub extraction_strategies: Vec<String>,
    pub fit_model: Option<String>,
}

impl FitAnalysisEngine {
    /// Build the lexicon, aliases, extractor and classifier from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let normalizer = Arc::new(SkillNormalizer::with_extra_aliases(
            &config.lexicon.extra_aliases,
        )?);

        // Alias targets must be known skills or the scanner would drop them
        let mut extra_skills = config.lexicon.extra_skills.clone();
        extra_skills.extend(config.lexicon.extra_aliases.values().cloned());
        let lexicon = Arc::new(Lexicon::with_extra_skills(&extra_skills, &normalizer));

        let baseline = LexiconExtractor::new(Arc::clone(&normalizer), Arc::clone(&lexicon))?;
        let mut extractor = SkillExtractor::new(baseline);

        if config.extraction.use_ner {
            match config
                .extraction
                .ner_command
                .as_deref()
                .and_then(CommandRecognizer::from_command_line)
                .map(|r| r.with_timeout(Duration::from_secs(config.extraction.ner_timeout_secs)))
            {
                Some(recognizer) => {
                    log::info!("Entity recognizer enabled: {}", recognizer.name());
                    extractor = extractor.with_strategy(Box::new(NerExtractor::new(
                        Box::new(recognizer),
                        Arc::clone(&normalizer),
                    )));
                }
                None => log::warn!("NER enabled but no recognizer command configured; using lexicon only"),
            }
        }

        let classifier = FitClassifier::from_config(&config.classifier);

        log::debug!(
            "Engine ready: {} skills, {} aliases",
            lexicon.len(),
            normalizer.alias_count()
        );

        Ok(Self {
            normalizer,
            lexicon,
            extractor,
            classifier,
        })
    }

    /// Skills found in one document by the configured extraction strategies
    pub fn extract_skills(&self, text: &str) -> SkillSet {
        self.extractor.extract(text)
    }

    /// Normalize caller-supplied skill names, dropping unusable ones
    pub fn normalize_skills<I, S>(&self, raw: I) -> SkillSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.normalizer.skill_set(raw)
    }

    /// Extract, match and classify one resume/job pair
    pub fn analyze(&self, resume_text: &str, job_text: &str) -> FitAnalysis {
        let start_time = Instant::now();

        let resume_skills = self.extract_skills(resume_text);
        let job_skills = self.extract_skills(job_text);
        log::info!(
            "Extracted {} resume skills and {} job skills",
            resume_skills.len(),
            job_skills.len()
        );

        let match_result = match_skills(&resume_skills, &job_skills);
        let verdict = self.classifier.predict_fit(
            resume_text,
            job_text,
            match_result.score,
            match_result.num_matched(),
            match_result.num_missing(),
        );

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        log::info!(
            "Match score {} -> {} ({:.0}% confidence) in {}ms",
            match_result.score,
            verdict.prediction,
            verdict.confidence * 100.0,
            processing_time_ms
        );

        FitAnalysis {
            resume_skills,
            job_skills,
            match_result,
            verdict,
            processing_time_ms,
        }
    }

    /// Category of a skill; anything outside the lexicon counts as domain
    pub fn category_of(&self, skill: &Skill) -> SkillCategory {
        self.lexicon
            .category(skill.as_str())
            .unwrap_or(SkillCategory::Domain)
    }

    pub fn get_stats(&self) -> EngineStats {
        EngineStats {
            lexicon_size: self.lexicon.len(),
            alias_count: self.normalizer.alias_count(),
            pattern_count: self.extractor.baseline().pattern_count(),
            extraction_strategies: self.extractor.strategy_names(),
            fit_model: self.classifier.model_name().map(|s| s.to_string()),
        }
    }
}
