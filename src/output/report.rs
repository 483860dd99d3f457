//! Report structures built from analysis results

use crate::processing::analyzer::{FitAnalysis, FitAnalysisEngine};
use crate::processing::fit_classifier::{ConfidenceLevel, FitDistribution, FitLabel, ModelType};
use crate::processing::lexicon::SkillCategory;
use crate::processing::match_engine::CompatibilityBand;
use crate::processing::readiness::{AnswerEvaluation, ReadinessAssessment};
use crate::processing::skill::SkillSet;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Full resume/job fit report
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub metadata: ReportMetadata,
    pub summary: FitSummary,
    pub skills: SkillBreakdown,
    /// Missing job skills grouped by category, technical first
    pub missing_by_category: Vec<SkillGroup>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resume_file: String,
    pub job_file: String,
    pub processing_time_ms: u64,
    pub model_type: ModelType,
    pub fit_model: Option<String>,
    pub tool_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FitSummary {
    /// Percentage rounded to one decimal place
    pub match_score: f64,
    pub band: CompatibilityBand,
    pub headline: String,
    pub prediction: FitLabel,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub probabilities: FitDistribution,
    pub fit_recommendation: String,
}

/// Sorted skill lists for each side of the match
#[derive(Debug, Clone, Serialize)]
pub struct SkillBreakdown {
    pub resume: Vec<String>,
    pub job: Vec<String>,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGroup {
    pub category: SkillCategory,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: RecommendationPriority,
    pub actionable_steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RecommendationPriority {
    Critical,
    High,
    Medium,
    Low,
}

/// Skills found in a single document
#[derive(Debug, Clone, Serialize)]
pub struct SkillListReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub total: usize,
    pub by_category: Vec<SkillGroup>,
}

/// One evaluated interview answer
#[derive(Debug, Clone, Serialize)]
pub struct AnswerEntry {
    pub source: String,
    pub word_count: usize,
    pub evaluation: AnswerEvaluation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub generated_at: DateTime<Utc>,
    pub answers: Vec<AnswerEntry>,
    pub assessment: ReadinessAssessment,
}

impl FitReport {
    pub fn from_analysis(
        analysis: &FitAnalysis,
        engine: &FitAnalysisEngine,
        resume_file: &str,
        job_file: &str,
    ) -> Self {
        let result = &analysis.match_result;
        let verdict = &analysis.verdict;

        let missing_by_category = group_by_category(&result.missing, engine);
        let recommendations = build_recommendations(analysis, &missing_by_category);

        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                resume_file: resume_file.to_string(),
                job_file: job_file.to_string(),
                processing_time_ms: analysis.processing_time_ms,
                model_type: verdict.model_type,
                fit_model: engine.get_stats().fit_model,
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            summary: FitSummary {
                match_score: result.score.rounded(),
                band: result.band(),
                headline: result.band().headline().to_string(),
                prediction: verdict.prediction,
                confidence: verdict.confidence,
                confidence_level: verdict.confidence_level(),
                probabilities: verdict.probabilities,
                fit_recommendation: verdict.recommendation().to_string(),
            },
            skills: SkillBreakdown {
                resume: analysis.resume_skills.sorted_names(),
                job: analysis.job_skills.sorted_names(),
                matched: result.matched.sorted_names(),
                missing: result.missing.sorted_names(),
                extra: result.extra.sorted_names(),
            },
            missing_by_category,
            recommendations,
        }
    }

    /// Percentage shown in badges
    pub fn score_percentage(&self) -> u8 {
        self.summary.match_score.round().clamp(0.0, 100.0) as u8
    }
}

impl SkillListReport {
    pub fn new(source: &str, skills: &SkillSet, engine: &FitAnalysisEngine) -> Self {
        Self {
            generated_at: Utc::now(),
            source: source.to_string(),
            total: skills.len(),
            by_category: group_by_category(skills, engine),
        }
    }
}

impl ReadinessReport {
    pub fn new(answers: Vec<AnswerEntry>, assessment: ReadinessAssessment) -> Self {
        Self {
            generated_at: Utc::now(),
            answers,
            assessment,
        }
    }
}

/// Non-empty groups in category order, skills sorted within each group
pub fn group_by_category(skills: &SkillSet, engine: &FitAnalysisEngine) -> Vec<SkillGroup> {
    let mut groups: BTreeMap<SkillCategory, Vec<String>> = BTreeMap::new();
    for skill in skills.sorted() {
        groups
            .entry(engine.category_of(skill))
            .or_default()
            .push(skill.to_string());
    }

    groups
        .into_iter()
        .map(|(category, skills)| SkillGroup { category, skills })
        .collect()
}

fn build_recommendations(analysis: &FitAnalysis, missing: &[SkillGroup]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if analysis.job_skills.is_empty() {
        recommendations.push(Recommendation {
            title: "No Recognizable Skills in Job Description".to_string(),
            description: "The job description did not mention any known skills, so the match score is 0.".to_string(),
            priority: RecommendationPriority::Critical,
            actionable_steps: vec![
                "Check that the job description file contains the full posting".to_string(),
                "Add domain-specific skills to the lexicon in your config file".to_string(),
            ],
        });
    }

    if analysis.resume_skills.is_empty() {
        recommendations.push(Recommendation {
            title: "No Recognizable Skills in Resume".to_string(),
            description: "No known skills were found in the resume text.".to_string(),
            priority: RecommendationPriority::Critical,
            actionable_steps: vec![
                "Make sure the resume is a text-based PDF, not a scanned image".to_string(),
                "Add a dedicated Skills section listing your tools and technologies".to_string(),
            ],
        });
    }

    for group in missing {
        let joined = group.skills.join(", ");
        let recommendation = match group.category {
            SkillCategory::Technical => Recommendation {
                title: "Enhance Technical Skills Section".to_string(),
                description: format!("Add missing technical skills: {}", joined),
                priority: RecommendationPriority::High,
                actionable_steps: vec![
                    "Review job requirements for technical skills".to_string(),
                    "Add relevant skills to your Skills section".to_string(),
                    "Provide examples of using these skills in Experience section".to_string(),
                ],
            },
            SkillCategory::Soft => Recommendation {
                title: "Highlight Soft Skills".to_string(),
                description: format!("Emphasize soft skills: {}", joined),
                priority: RecommendationPriority::Medium,
                actionable_steps: vec![
                    "Include soft skills in your Summary section".to_string(),
                    "Provide specific examples in Experience descriptions".to_string(),
                    "Use action verbs that demonstrate these qualities".to_string(),
                ],
            },
            SkillCategory::Domain => Recommendation {
                title: "Show Domain Experience".to_string(),
                description: format!("Mention domain knowledge the role expects: {}", joined),
                priority: RecommendationPriority::Medium,
                actionable_steps: vec![
                    "Name the methodologies and tools you have used on past teams".to_string(),
                    "Consider a short course or certification for the gaps".to_string(),
                ],
            },
        };
        recommendations.push(recommendation);
    }

    if !analysis.match_result.matched.is_empty() {
        recommendations.push(Recommendation {
            title: "Lead With Matched Skills".to_string(),
            description: format!(
                "Put these matching skills where recruiters look first: {}",
                analysis.match_result.matched.sorted_names().join(", ")
            ),
            priority: RecommendationPriority::Low,
            actionable_steps: vec![
                "Mention them in your summary".to_string(),
                "Quantify results achieved with each one".to_string(),
            ],
        });
    }

    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::readiness::{assess, evaluate_answer_heuristic};

    fn engine() -> FitAnalysisEngine {
        FitAnalysisEngine::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_fit_report_from_analysis() {
        let engine = engine();
        let analysis = engine.analyze(
            "Python and SQL developer, strong communication.",
            "Python, Docker, leadership and agile experience required.",
        );
        let report = FitReport::from_analysis(&analysis, &engine, "resume.txt", "job.txt");

        assert_eq!(report.skills.matched, vec!["python"]);
        assert_eq!(report.skills.missing, vec!["agile", "docker", "leadership"]);
        assert_eq!(report.summary.match_score, 25.0);
        assert_eq!(report.summary.band, CompatibilityBand::Moderate);
        assert_eq!(report.summary.prediction, FitLabel::NoFit);
        assert_eq!(report.score_percentage(), 25);

        let categories: Vec<SkillCategory> =
            report.missing_by_category.iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            vec![SkillCategory::Technical, SkillCategory::Soft, SkillCategory::Domain]
        );

        let titles: Vec<&str> = report.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles[0], "Enhance Technical Skills Section");
        assert!(titles.contains(&"Highlight Soft Skills"));
        assert_eq!(titles.last(), Some(&"Lead With Matched Skills"));
    }

    #[test]
    fn test_empty_job_recommendation() {
        let engine = engine();
        let analysis = engine.analyze("Rust developer", "We are hiring!");
        let report = FitReport::from_analysis(&analysis, &engine, "r.txt", "j.txt");

        assert_eq!(report.recommendations[0].priority, RecommendationPriority::Critical);
        assert_eq!(
            report.recommendations[0].title,
            "No Recognizable Skills in Job Description"
        );
    }

    #[test]
    fn test_skill_list_report() {
        let engine = engine();
        let skills = engine.extract_skills("Rust, Docker, mentoring and scrum");
        let report = SkillListReport::new("resume.md", &skills, &engine);

        assert_eq!(report.total, 4);
        assert_eq!(report.by_category[0].skills, vec!["docker", "rust"]);
        assert_eq!(report.by_category[1].skills, vec!["mentoring"]);
        assert_eq!(report.by_category[2].skills, vec!["scrum"]);
    }

    #[test]
    fn test_readiness_report() {
        let evaluation = evaluate_answer_heuristic("short answer");
        let scores = vec![evaluation.overall_score];
        let report = ReadinessReport::new(
            vec![AnswerEntry {
                source: "q1.txt".to_string(),
                word_count: 2,
                evaluation,
            }],
            assess(&scores).unwrap(),
        );
        assert_eq!(report.assessment.question_count, 1);
        assert_eq!(report.assessment.overall_score, 55.0);
    }
}
