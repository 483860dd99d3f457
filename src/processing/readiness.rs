//! Interview readiness aggregation and heuristic answer evaluation

use crate::error::{Result, SkillFitError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadinessLevel {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
    RequiresWork,
    NotStarted,
}

impl ReadinessLevel {
    /// Bucket a mean answer score
    pub fn from_mean(mean: f64) -> Self {
        if mean >= 90.0 {
            ReadinessLevel::Excellent
        } else if mean >= 80.0 {
            ReadinessLevel::Good
        } else if mean >= 70.0 {
            ReadinessLevel::Satisfactory
        } else if mean >= 60.0 {
            ReadinessLevel::NeedsImprovement
        } else {
            ReadinessLevel::RequiresWork
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadinessLevel::Excellent => "Excellent",
            ReadinessLevel::Good => "Good",
            ReadinessLevel::Satisfactory => "Satisfactory",
            ReadinessLevel::NeedsImprovement => "Needs Improvement",
            ReadinessLevel::RequiresWork => "Requires Significant Work",
            ReadinessLevel::NotStarted => "Not Started",
        }
    }

    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            ReadinessLevel::Excellent => &[
                "You're well-prepared! Focus on company-specific research",
                "Prepare thoughtful questions for your interviewers",
            ],
            ReadinessLevel::Good => &[
                "Strong preparation. Practice a few more questions",
                "Tighten answers with concrete, quantified results",
            ],
            ReadinessLevel::Satisfactory => &[
                "Good start. Focus on technical depth and examples",
                "Rehearse explaining trade-offs in your past projects",
            ],
            ReadinessLevel::NeedsImprovement => &[
                "Practice more. Focus on STAR method and technical details",
                "Write out answers for the most common questions in your field",
            ],
            ReadinessLevel::RequiresWork => &[
                "Intensive practice needed. Consider mock interviews",
                "Review the core skills listed in the job description",
                "Use the STAR method to structure every behavioral answer",
            ],
            ReadinessLevel::NotStarted => &["Start practicing interview questions"],
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessAssessment {
    /// Mean answer score rounded to one decimal place
    pub overall_score: f64,
    pub level: ReadinessLevel,
    pub question_count: usize,
    pub recommendations: Vec<String>,
}

impl ReadinessAssessment {
    pub fn not_started() -> Self {
        Self::for_level(0.0, ReadinessLevel::NotStarted, 0)
    }

    fn for_level(overall_score: f64, level: ReadinessLevel, question_count: usize) -> Self {
        Self {
            overall_score,
            level,
            question_count,
            recommendations: level.recommendations().iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Fold per-question scores into one assessment.
///
/// The level is bucketed on the unrounded mean; only the reported score is rounded.
pub fn assess(scores: &[f64]) -> Result<ReadinessAssessment> {
    if let Some(bad) = scores.iter().find(|s| !s.is_finite() || !(0.0..=100.0).contains(*s)) {
        return Err(SkillFitError::InvalidInput(format!(
            "answer scores must be within 0..=100, got {}",
            bad
        )));
    }

    if scores.is_empty() {
        return Ok(ReadinessAssessment::not_started());
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let rounded = (mean * 10.0).round() / 10.0;

    Ok(ReadinessAssessment::for_level(
        rounded,
        ReadinessLevel::from_mean(mean),
        scores.len(),
    ))
}

/// Ordered answer scores for one practice session
#[derive(Debug, Clone)]
pub struct InterviewSession {
    scores: Vec<f64>,
    assessment: ReadinessAssessment,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            scores: Vec::new(),
            assessment: ReadinessAssessment::not_started(),
        }
    }

    /// Append a score and replace the assessment with one computed over all scores
    pub fn record(&mut self, score: f64) -> Result<&ReadinessAssessment> {
        let mut scores = self.scores.clone();
        scores.push(score);
        let assessment = assess(&scores)?;

        self.scores = scores;
        self.assessment = assessment;
        Ok(&self.assessment)
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn assessment(&self) -> &ReadinessAssessment {
        &self.assessment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerRating {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnswerSubScores {
    pub technical_depth: f64,
    pub communication: f64,
    pub problem_solving: f64,
    pub relevance: f64,
}

/// Evaluation of one interview answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerEvaluation {
    pub overall_score: f64,
    pub scores: AnswerSubScores,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
    pub follow_up_suggestions: Vec<String>,
    pub rating: AnswerRating,
}

/// Length-based evaluation used when no external evaluator is available
pub fn evaluate_answer_heuristic(answer: &str) -> AnswerEvaluation {
    let word_count = answer.split_whitespace().count();

    let (score, rating) = if word_count > 100 {
        (85.0, AnswerRating::Good)
    } else if word_count > 50 {
        (70.0, AnswerRating::Satisfactory)
    } else {
        (55.0, AnswerRating::NeedsImprovement)
    };

    let sub = |delta: f64| f64::clamp(score + delta, 0.0, 100.0);

    AnswerEvaluation {
        overall_score: score,
        scores: AnswerSubScores {
            technical_depth: sub(-5.0),
            communication: sub(5.0),
            problem_solving: sub(0.0),
            relevance: sub(10.0),
        },
        strengths: vec!["Provided a response".to_string(), "Showed engagement".to_string()],
        improvements: vec![
            "Add more specific examples".to_string(),
            "Include technical details".to_string(),
        ],
        detailed_feedback: "Your answer shows engagement with the question. Consider adding more specific examples and technical details to strengthen your response.".to_string(),
        follow_up_suggestions: vec![
            "Use the STAR method for behavioral questions".to_string(),
            "Include quantifiable results".to_string(),
        ],
        rating,
    }
}
