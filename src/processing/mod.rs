//! Skill extraction, matching and fit assessment

pub mod analyzer;
pub mod extractor;
pub mod features;
pub mod fit_classifier;
pub mod lexicon;
pub mod match_engine;
pub mod normalizer;
pub mod readiness;
pub mod skill;
pub mod text_processor;

pub use analyzer::{FitAnalysis, FitAnalysisEngine};
pub use fit_classifier::{FitClassifier, FitLabel, FitVerdict, ModelType};
pub use match_engine::{match_skills, MatchResult, MatchScore};
pub use normalizer::SkillNormalizer;
pub use readiness::{assess, ReadinessAssessment, ReadinessLevel};
pub use skill::{Skill, SkillSet};
