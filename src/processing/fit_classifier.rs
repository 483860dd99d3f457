//! Fit classification: statistical model first, score thresholds as fallback

use crate::config::ClassifierConfig;
use crate::error::{Result, SkillFitError};
use crate::processing::features::{FitFeatures, FEATURE_COUNT, FEATURE_NAMES};
use crate::processing::match_engine::MatchScore;
use crate::processing::text_processor::TextProcessor;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Fallback confidence gained per point of distance from the nearest threshold
const CONFIDENCE_SLOPE: f64 = 0.015;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitLabel {
    GoodFit,
    PotentialFit,
    NoFit,
}

impl FitLabel {
    /// Tie-break order, most optimistic first
    pub const PRIORITY: [FitLabel; 3] = [FitLabel::GoodFit, FitLabel::PotentialFit, FitLabel::NoFit];

    pub fn as_str(self) -> &'static str {
        match self {
            FitLabel::GoodFit => "Good Fit",
            FitLabel::PotentialFit => "Potential Fit",
            FitLabel::NoFit => "No Fit",
        }
    }

    /// Accepts display names and identifiers, e.g. "Good Fit", "good_fit", "GoodFit"
    pub fn parse(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "goodfit" => Some(FitLabel::GoodFit),
            "potentialfit" => Some(FitLabel::PotentialFit),
            "nofit" => Some(FitLabel::NoFit),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            FitLabel::GoodFit => 0,
            FitLabel::PotentialFit => 1,
            FitLabel::NoFit => 2,
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            FitLabel::GoodFit => {
                "You have an excellent profile for this role. Highlight your matched skills and relevant experience in your application."
            }
            FitLabel::PotentialFit => {
                "You have good potential. Focus on developing one or two key missing skills and emphasize your transferable experience."
            }
            FitLabel::NoFit => {
                "Focus on strategic skill development. Consider courses in the missing technical skills and build projects that demonstrate them."
            }
        }
    }
}

impl fmt::Display for FitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    AdvancedMl,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.8 {
            ConfidenceLevel::VeryHigh
        } else if confidence > 0.6 {
            ConfidenceLevel::High
        } else if confidence > 0.4 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConfidenceLevel::VeryHigh => "Very High",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        };
        f.write_str(text)
    }
}

/// Probability for each fit label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitDistribution {
    pub good_fit: f64,
    pub potential_fit: f64,
    pub no_fit: f64,
}

impl FitDistribution {
    pub fn get(&self, label: FitLabel) -> f64 {
        match label {
            FitLabel::GoodFit => self.good_fit,
            FitLabel::PotentialFit => self.potential_fit,
            FitLabel::NoFit => self.no_fit,
        }
    }

    fn set(&mut self, label: FitLabel, value: f64) {
        match label {
            FitLabel::GoodFit => self.good_fit = value,
            FitLabel::PotentialFit => self.potential_fit = value,
            FitLabel::NoFit => self.no_fit = value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FitLabel, f64)> + '_ {
        FitLabel::PRIORITY.iter().map(move |&label| (label, self.get(label)))
    }

    pub fn sum(&self) -> f64 {
        self.good_fit + self.potential_fit + self.no_fit
    }

    /// Highest probability; ties go to the earlier label in `FitLabel::PRIORITY`
    pub fn argmax(&self) -> FitLabel {
        let mut best = FitLabel::GoodFit;
        for (label, p) in self.iter() {
            if p > self.get(best) {
                best = label;
            }
        }
        best
    }

    /// Rescale to sum to one. Fails on negative, non-finite or all-zero input.
    pub fn normalized(self) -> Result<Self> {
        if self.iter().any(|(_, p)| !p.is_finite() || p < 0.0) {
            return Err(SkillFitError::Inference(format!(
                "invalid probability distribution: {:?}",
                self
            )));
        }
        let total = self.sum();
        if total <= 0.0 {
            return Err(SkillFitError::Inference("probability mass is zero".to_string()));
        }
        Ok(Self {
            good_fit: self.good_fit / total,
            potential_fit: self.potential_fit / total,
            no_fit: self.no_fit / total,
        })
    }
}

/// Categorical fit prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitVerdict {
    pub prediction: FitLabel,
    pub confidence: f64,
    pub probabilities: FitDistribution,
    pub model_type: ModelType,
}

impl FitVerdict {
    /// Prediction and confidence always come from the distribution itself
    fn from_distribution(probabilities: FitDistribution, model_type: ModelType) -> Self {
        let prediction = probabilities.argmax();
        Self {
            prediction,
            confidence: probabilities.get(prediction),
            probabilities,
            model_type,
        }
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }

    pub fn recommendation(&self) -> &'static str {
        self.prediction.recommendation()
    }
}

/// Trained statistical model collaborator
pub trait FitModel: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, features: &FitFeatures) -> Result<FitDistribution>;
}

/// On-disk format of a multinomial logistic regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModelFile {
    pub labels: Vec<String>,
    pub feature_names: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
    /// One row per label, one column per feature
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Multinomial logistic regression over standardized features
#[derive(Debug, Clone)]
pub struct LogisticFitModel {
    name: String,
    labels: Vec<FitLabel>,
    means: Array1<f64>,
    scales: Array1<f64>,
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl LogisticFitModel {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SkillFitError::ModelLoading(format!("Failed to read model '{}': {}", path.display(), e))
        })?;
        let file: LogisticModelFile = serde_json::from_str(&content).map_err(|e| {
            SkillFitError::ModelLoading(format!("Failed to parse model '{}': {}", path.display(), e))
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "logistic".to_string());
        Self::from_file(name, file)
    }

    /// Validate shapes, labels and that the feature pipeline matches
    pub fn from_file(name: impl Into<String>, file: LogisticModelFile) -> Result<Self> {
        let expected: Vec<&str> = FEATURE_NAMES.to_vec();
        if file.feature_names != expected {
            return Err(SkillFitError::ModelLoading(format!(
                "model features {:?} do not match pipeline features {:?}",
                file.feature_names, expected
            )));
        }

        let mut labels = Vec::with_capacity(file.labels.len());
        for raw in &file.labels {
            let label = FitLabel::parse(raw)
                .ok_or_else(|| SkillFitError::ModelLoading(format!("unknown label '{}'", raw)))?;
            if labels.contains(&label) {
                return Err(SkillFitError::ModelLoading(format!("duplicate label '{}'", raw)));
            }
            labels.push(label);
        }
        if labels.len() != FitLabel::PRIORITY.len() {
            return Err(SkillFitError::ModelLoading(format!(
                "expected {} labels, found {}",
                FitLabel::PRIORITY.len(),
                labels.len()
            )));
        }

        let n_labels = labels.len();
        if file.means.len() != FEATURE_COUNT || file.scales.len() != FEATURE_COUNT {
            return Err(SkillFitError::ModelLoading(
                "means and scales must have one entry per feature".to_string(),
            ));
        }
        if file.bias.len() != n_labels
            || file.weights.len() != n_labels
            || file.weights.iter().any(|row| row.len() != FEATURE_COUNT)
        {
            return Err(SkillFitError::ModelLoading(format!(
                "weights must be {}x{} and bias {} long",
                n_labels, FEATURE_COUNT, n_labels
            )));
        }

        let flat: Vec<f64> = file.weights.into_iter().flatten().collect();
        if flat.iter().chain(&file.bias).chain(&file.means).chain(&file.scales).any(|v| !v.is_finite()) {
            return Err(SkillFitError::ModelLoading("model parameters must be finite".to_string()));
        }
        let weights = Array2::from_shape_vec((n_labels, FEATURE_COUNT), flat)
            .map_err(|e| SkillFitError::ModelLoading(format!("bad weight shape: {}", e)))?;

        // Zero scale means a constant feature during training; leave it unscaled
        let scales = Array1::from(file.scales).mapv(|s| if s.abs() < f64::EPSILON { 1.0 } else { s });

        Ok(Self {
            name: name.into(),
            labels,
            means: Array1::from(file.means),
            scales,
            weights,
            bias: Array1::from(file.bias),
        })
    }
}

impl FitModel for LogisticFitModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FitFeatures) -> Result<FitDistribution> {
        let x = (Array1::from(features.values().to_vec()) - &self.means) / &self.scales;
        let logits = self.weights.dot(&x) + &self.bias;

        let max = logits.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        if !max.is_finite() {
            return Err(SkillFitError::Inference(format!("non-finite logits: {}", logits)));
        }
        let exp = logits.mapv(|v| (v - max).exp());
        let total = exp.sum();

        let mut distribution = FitDistribution {
            good_fit: 0.0,
            potential_fit: 0.0,
            no_fit: 0.0,
        };
        for (label, p) in self.labels.iter().zip(exp.iter()) {
            distribution.set(*label, p / total);
        }
        distribution.normalized()
    }
}

/// Deterministic verdict from the match score alone
#[derive(Debug, Clone, Copy)]
pub struct ThresholdFallback {
    good_fit_threshold: f64,
    potential_fit_threshold: f64,
    min_confidence: f64,
    max_confidence: f64,
}

impl ThresholdFallback {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            good_fit_threshold: config.good_fit_threshold,
            potential_fit_threshold: config.potential_fit_threshold,
            min_confidence: config.min_confidence,
            max_confidence: config.max_confidence,
        }
    }

    pub fn distribution(&self, score: MatchScore) -> FitDistribution {
        let s = score.value();

        let prediction = if s >= self.good_fit_threshold {
            FitLabel::GoodFit
        } else if s >= self.potential_fit_threshold {
            FitLabel::PotentialFit
        } else {
            FitLabel::NoFit
        };

        let distance = (s - self.good_fit_threshold)
            .abs()
            .min((s - self.potential_fit_threshold).abs());
        let confidence = (self.min_confidence + CONFIDENCE_SLOPE * distance)
            .clamp(self.min_confidence, self.max_confidence);

        // Remaining mass goes 2:1 to the neighbouring and the far label
        let midpoint = (self.good_fit_threshold + self.potential_fit_threshold) / 2.0;
        let (near, far) = match prediction {
            FitLabel::GoodFit => (FitLabel::PotentialFit, FitLabel::NoFit),
            FitLabel::NoFit => (FitLabel::PotentialFit, FitLabel::GoodFit),
            FitLabel::PotentialFit if s >= midpoint => (FitLabel::GoodFit, FitLabel::NoFit),
            FitLabel::PotentialFit => (FitLabel::NoFit, FitLabel::GoodFit),
        };
        let rest = 1.0 - confidence;

        let mut distribution = FitDistribution {
            good_fit: 0.0,
            potential_fit: 0.0,
            no_fit: 0.0,
        };
        distribution.set(prediction, confidence);
        distribution.set(near, rest * 2.0 / 3.0);
        distribution.set(far, rest / 3.0);
        distribution
    }
}

/// A way of producing a fit distribution, tried in order
enum FitStrategy {
    Model(Arc<dyn FitModel>),
    Threshold(ThresholdFallback),
}

/// Fit classifier adapter.
///
/// Holds an ordered strategy list that always ends in the threshold
/// fallback, so `predict_fit` cannot fail.
pub struct FitClassifier {
    strategies: Vec<FitStrategy>,
    processor: TextProcessor,
}

impl FitClassifier {
    /// Fallback-only classifier
    pub fn fallback_only(config: &ClassifierConfig) -> Self {
        Self {
            strategies: vec![FitStrategy::Threshold(ThresholdFallback::from_config(config))],
            processor: TextProcessor::new(),
        }
    }

    /// Load the configured model once; a missing or broken model leaves the
    /// fallback in charge for this classifier's lifetime.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let classifier = Self::fallback_only(config);

        let Some(path) = &config.model_path else {
            log::info!("No fit model configured; using score-threshold fallback");
            return classifier;
        };

        match LogisticFitModel::load(path) {
            Ok(model) => {
                log::info!("Loaded fit model '{}' from {}", model.name(), path.display());
                classifier.with_model(Arc::new(model))
            }
            Err(e) => {
                log::warn!("Fit model unavailable, using fallback: {}", e);
                classifier
            }
        }
    }

    /// Put a model ahead of the existing strategies
    pub fn with_model(mut self, model: Arc<dyn FitModel>) -> Self {
        self.strategies.insert(0, FitStrategy::Model(model));
        self
    }

    pub fn has_model(&self) -> bool {
        self.strategies
            .iter()
            .any(|s| matches!(s, FitStrategy::Model(_)))
    }

    pub fn model_name(&self) -> Option<&str> {
        self.strategies.iter().find_map(|s| match s {
            FitStrategy::Model(model) => Some(model.name()),
            FitStrategy::Threshold(_) => None,
        })
    }

    pub fn predict_fit(
        &self,
        resume_text: &str,
        job_text: &str,
        match_score: MatchScore,
        num_matched: usize,
        num_missing: usize,
    ) -> FitVerdict {
        let mut features: Option<FitFeatures> = None;

        for strategy in &self.strategies {
            match strategy {
                FitStrategy::Model(model) => {
                    let features = features.get_or_insert_with(|| {
                        FitFeatures::build(
                            &self.processor,
                            resume_text,
                            job_text,
                            match_score,
                            num_matched,
                            num_missing,
                        )
                    });
                    match model.predict(features).and_then(FitDistribution::normalized) {
                        Ok(distribution) => {
                            return FitVerdict::from_distribution(distribution, ModelType::AdvancedMl);
                        }
                        Err(e) => log::warn!("Fit model '{}' failed, falling back: {}", model.name(), e),
                    }
                }
                FitStrategy::Threshold(fallback) => {
                    return FitVerdict::from_distribution(
                        fallback.distribution(match_score),
                        ModelType::Fallback,
                    );
                }
            }
        }

        // The list is built with the threshold strategy last
        let fallback = self.strategies.iter().find_map(|s| match s {
            FitStrategy::Threshold(t) => Some(*t),
            FitStrategy::Model(_) => None,
        });
        let distribution = match fallback {
            Some(t) => t.distribution(match_score),
            None => ThresholdFallback::from_config(&ClassifierConfig::default()).distribution(match_score),
        };
        FitVerdict::from_distribution(distribution, ModelType::Fallback)
    }
}
