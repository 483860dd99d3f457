//! Built-in skill vocabulary and alias tables

use crate::processing::normalizer::SkillNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillCategory {
    Technical,
    Soft,
    Domain,
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillCategory::Technical => write!(f, "Technical"),
            SkillCategory::Soft => write!(f, "Soft"),
            SkillCategory::Domain => write!(f, "Domain"),
        }
    }
}

/// Canonical skill vocabulary, read-only once built
#[derive(Debug, Clone)]
pub struct Lexicon {
    skills: HashMap<String, SkillCategory>,
}

impl Lexicon {
    /// Built-in vocabulary only
    pub fn builtin() -> Self {
        let mut skills = HashMap::new();

        for skill in TECH_SKILLS {
            skills.insert(skill.to_string(), SkillCategory::Technical);
        }
        for skill in SOFT_SKILLS {
            skills.insert(skill.to_string(), SkillCategory::Soft);
        }
        for skill in DOMAIN_SKILLS {
            skills.insert(skill.to_string(), SkillCategory::Domain);
        }

        Self { skills }
    }

    /// Built-in vocabulary plus user-supplied skills.
    ///
    /// Extra entries go through the normalizer; ones that normalize to nothing
    /// are skipped with a warning.
    pub fn with_extra_skills(extra: &[String], normalizer: &SkillNormalizer) -> Self {
        let mut lexicon = Self::builtin();

        for raw in extra {
            match normalizer.normalize(raw) {
                Some(skill) => {
                    lexicon
                        .skills
                        .entry(skill.into_string())
                        .or_insert(SkillCategory::Domain);
                }
                None => log::warn!("Ignoring configured skill '{}': not a valid skill name", raw),
            }
        }

        lexicon
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.skills.contains_key(canonical)
    }

    pub fn category(&self, canonical: &str) -> Option<SkillCategory> {
        self.skills.get(canonical).copied()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.skills.keys().map(|s| s.as_str())
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

pub(crate) const TECH_SKILLS: &[&str] = &[
    // Programming languages
    "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "ruby",
    "php", "swift", "kotlin", "scala", "matlab", "perl", "haskell", "sql", "bash",
    "html", "css",
    // Web
    "react", "angular", "vue", "svelte", "node.js", "next.js", "express", "django",
    "flask", "fastapi", "spring", "jquery", "tailwind", "bootstrap", "graphql",
    "rest api", ".net", "webpack",
    // Data and ML
    "pandas", "numpy", "scikit learn", "tensorflow", "pytorch", "keras", "spark",
    "hadoop", "kafka", "airflow", "tableau", "power bi", "excel", "machine learning",
    "deep learning", "data analysis", "data science", "natural language processing",
    "computer vision", "statistics",
    // Cloud and infrastructure
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible", "jenkins",
    "cicd", "git", "github", "gitlab", "linux", "microservices", "devops", "nginx",
    // Databases
    "postgresql", "mysql", "mongodb", "redis", "sqlite", "oracle", "elasticsearch",
    "dynamodb", "cassandra",
    // Testing
    "jest", "pytest", "junit", "selenium", "cypress", "unit testing",
];

pub(crate) const SOFT_SKILLS: &[&str] = &[
    "leadership", "communication", "teamwork", "problem solving", "critical thinking",
    "time management", "project management", "collaboration", "mentoring",
    "presentation", "negotiation", "adaptability", "creativity",
];

pub(crate) const DOMAIN_SKILLS: &[&str] = &[
    "agile", "scrum", "kanban", "jira", "product management", "digital marketing",
    "seo", "ux design", "ui design", "figma", "cybersecurity", "blockchain",
];

/// Alias -> canonical skill. Targets are never themselves aliases.
pub(crate) const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("nodejs", "node.js"),
    ("vuejs", "vue"),
    ("vue.js", "vue"),
    ("angularjs", "angular"),
    ("nextjs", "next.js"),
    ("golang", "go"),
    ("cpp", "c++"),
    ("c sharp", "c#"),
    ("dotnet", ".net"),
    ("postgres", "postgresql"),
    ("mongo", "mongodb"),
    ("k8s", "kubernetes"),
    ("sklearn", "scikit learn"),
    ("ml", "machine learning"),
    ("nlp", "natural language processing"),
    ("amazon web services", "aws"),
    ("google cloud", "gcp"),
    ("google cloud platform", "gcp"),
    ("ci cd", "cicd"),
    ("restful api", "rest api"),
    ("rest apis", "rest api"),
    ("restful apis", "rest api"),
    ("powerbi", "power bi"),
    ("ms excel", "excel"),
    ("microsoft excel", "excel"),
    ("tailwindcss", "tailwind"),
    ("html5", "html"),
    ("css3", "css"),
    ("team work", "teamwork"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries_are_canonical() {
        let normalizer = SkillNormalizer::builtin();
        for skill in Lexicon::builtin().skills() {
            let normalized = normalizer.normalize(skill).map(|s| s.into_string());
            assert_eq!(normalized.as_deref(), Some(skill), "'{}' is not canonical", skill);
        }
    }

    #[test]
    fn test_alias_targets_are_in_vocabulary() {
        let lexicon = Lexicon::builtin();
        for (alias, target) in DEFAULT_ALIASES {
            assert!(lexicon.contains(target), "alias '{}' points outside the vocabulary", alias);
        }
    }

    #[test]
    fn test_extra_skills_are_normalized() {
        let normalizer = SkillNormalizer::builtin();
        let extra = vec!["  Solidity ".to_string(), "!".to_string(), "ReactJS".to_string()];
        let lexicon = Lexicon::with_extra_skills(&extra, &normalizer);

        assert!(lexicon.contains("solidity"));
        assert_eq!(lexicon.category("solidity"), Some(SkillCategory::Domain));
        // Already known through its alias; category untouched
        assert_eq!(lexicon.category("react"), Some(SkillCategory::Technical));
        assert_eq!(lexicon.len(), Lexicon::builtin().len() + 1);
    }
}
