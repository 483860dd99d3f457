//! Configuration management for skill-fit

use crate::error::{Result, SkillFitError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lexicon: LexiconConfig,
    pub extraction: ExtractionConfig,
    pub classifier: ClassifierConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Skills recognized in addition to the built-in vocabulary
    #[serde(default)]
    pub extra_skills: Vec<String>,
    /// Alias -> canonical skill, merged over the built-in alias table
    #[serde(default)]
    pub extra_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub use_ner: bool,
    /// Program and arguments of an external entity recognizer
    pub ner_command: Option<Vec<String>>,
    /// Seconds the recognizer may run before it is killed
    pub ner_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model_path: Option<PathBuf>,
    pub good_fit_threshold: f64,
    pub potential_fit_threshold: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lexicon: LexiconConfig::default(),
            extraction: ExtractionConfig::default(),
            classifier: ClassifierConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            use_ner: false,
            ner_command: None,
            ner_timeout_secs: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            good_fit_threshold: 70.0,
            potential_fit_threshold: 40.0,
            min_confidence: 0.5,
            max_confidence: 0.95,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SkillFitError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillFitError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overwrite the stored configuration with defaults
    pub fn reset() -> Result<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-fit")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.classifier;
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);

        if !in_range(c.good_fit_threshold) || !in_range(c.potential_fit_threshold) {
            return Err(SkillFitError::Configuration(
                "fit thresholds must lie within 0..=100".to_string(),
            ));
        }
        if c.potential_fit_threshold >= c.good_fit_threshold {
            return Err(SkillFitError::Configuration(format!(
                "potential_fit_threshold ({}) must be below good_fit_threshold ({})",
                c.potential_fit_threshold, c.good_fit_threshold
            )));
        }
        // Predicted class holds at least half the mass
        if !(0.5..=1.0).contains(&c.min_confidence)
            || !(0.5..=1.0).contains(&c.max_confidence)
            || c.min_confidence > c.max_confidence
        {
            return Err(SkillFitError::Configuration(format!(
                "confidence bounds must satisfy 0.5 <= min ({}) <= max ({}) <= 1.0",
                c.min_confidence, c.max_confidence
            )));
        }
        if self.extraction.ner_timeout_secs == 0 {
            return Err(SkillFitError::Configuration(
                "ner_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.extraction.use_ner
            && self.extraction.ner_command.as_ref().map_or(true, |cmd| cmd.is_empty())
        {
            log::warn!("use_ner is enabled but no ner_command is configured; lexicon extraction only");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.classifier.good_fit_threshold, 70.0);
        assert_eq!(config.classifier.potential_fit_threshold, 40.0);
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.lexicon.extra_skills.push("solidity".to_string());
        config
            .lexicon
            .extra_aliases
            .insert("sol".to_string(), "solidity".to_string());
        config.output.format = OutputFormat::Json;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.lexicon.extra_skills, vec!["solidity".to_string()]);
        assert_eq!(loaded.lexicon.extra_aliases.get("sol").map(String::as_str), Some("solidity"));
        assert_eq!(loaded.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.classifier.potential_fit_threshold = 80.0;
        assert!(matches!(config.validate(), Err(SkillFitError::Configuration(_))));
    }

    #[test]
    fn test_rejects_low_confidence_floor() {
        let mut config = Config::default();
        config.classifier.min_confidence = 0.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[classifier]\ngood_fit_threshold = 75.0\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.classifier.good_fit_threshold, 75.0);
        assert_eq!(config.classifier.potential_fit_threshold, 40.0);
        assert!(config.lexicon.extra_skills.is_empty());
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[output]\nformat = \"Json\"\n\n[extraction]\nner_command = [\"ner\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.detailed);
        assert!(config.output.color_output);
        assert_eq!(config.extraction.ner_command, Some(vec!["ner".to_string()]));
        assert!(!config.extraction.use_ner);
        assert_eq!(config.extraction.ner_timeout_secs, 10);
    }

    #[test]
    fn test_rejects_zero_ner_timeout() {
        let mut config = Config::default();
        config.extraction.ner_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(SkillFitError::Configuration(_))));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "lexicon = 42").unwrap();
        assert!(matches!(Config::load_from(&path), Err(SkillFitError::Configuration(_))));
    }
}
