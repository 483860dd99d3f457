//! Set-based skill matching and compatibility scoring

use crate::error::{Result, SkillFitError};
use crate::processing::skill::SkillSet;
use serde::{Serialize, Serializer};
use std::fmt;

/// Percentage of job skills covered by the resume, always finite and in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MatchScore(f64);

impl MatchScore {
    pub const ZERO: MatchScore = MatchScore(0.0);

    /// Rejects NaN, infinities and values outside 0..=100
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(MatchScore(value))
        } else {
            Err(SkillFitError::InvalidInput(format!(
                "match score must be a percentage in 0..=100, got {}",
                value
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// One decimal place, for display
    pub fn rounded(self) -> f64 {
        (self.0 * 10.0).round() / 10.0
    }

    pub fn band(self) -> CompatibilityBand {
        CompatibilityBand::from_score(self)
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Serialize for MatchScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

/// Qualitative reading of a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompatibilityBand {
    Outstanding,
    Excellent,
    Good,
    Moderate,
    GrowthOpportunity,
}

impl CompatibilityBand {
    pub fn from_score(score: MatchScore) -> Self {
        match score.value() {
            s if s >= 80.0 => CompatibilityBand::Outstanding,
            s if s >= 60.0 => CompatibilityBand::Excellent,
            s if s >= 40.0 => CompatibilityBand::Good,
            s if s >= 20.0 => CompatibilityBand::Moderate,
            _ => CompatibilityBand::GrowthOpportunity,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            CompatibilityBand::Outstanding => "Outstanding match",
            CompatibilityBand::Excellent => "Excellent match",
            CompatibilityBand::Good => "Good match with growth potential",
            CompatibilityBand::Moderate => "Moderate match - skill development recommended",
            CompatibilityBand::GrowthOpportunity => {
                "Growth opportunity - consider targeted skill development"
            }
        }
    }
}

/// Partition of resume and job skills plus the coverage score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub matched: SkillSet,
    pub missing: SkillSet,
    pub extra: SkillSet,
    pub score: MatchScore,
}

impl MatchResult {
    pub fn num_matched(&self) -> usize {
        self.matched.len()
    }

    pub fn num_missing(&self) -> usize {
        self.missing.len()
    }

    pub fn num_extra(&self) -> usize {
        self.extra.len()
    }

    pub fn band(&self) -> CompatibilityBand {
        self.score.band()
    }
}

/// Compare resume skills against job skills.
///
/// Pure and total: an empty job set scores 0 whatever the resume holds.
pub fn match_skills(resume_skills: &SkillSet, job_skills: &SkillSet) -> MatchResult {
    let matched = resume_skills.intersection(job_skills);
    let missing = job_skills.difference(resume_skills);
    let extra = resume_skills.difference(job_skills);

    let score = if job_skills.is_empty() {
        MatchScore::ZERO
    } else {
        MatchScore(100.0 * matched.len() as f64 / job_skills.len() as f64)
    };

    MatchResult {
        matched,
        missing,
        extra,
        score,
    }
}
