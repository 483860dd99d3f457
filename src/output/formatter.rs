//! Output formatters: colored console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::*;
use crate::processing::fit_classifier::{FitLabel, ModelType};
use crate::processing::match_engine::CompatibilityBand;
use crate::processing::readiness::ReadinessLevel;
use colored::{Color, Colorize};
use std::path::Path;

/// Renders each report kind in one output format
pub trait OutputFormatter {
    fn format_fit(&self, report: &FitReport) -> Result<String>;
    fn format_skills(&self, report: &SkillListReport) -> Result<String>;
    fn format_readiness(&self, report: &ReadinessReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn file_label(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn model_label(model_type: ModelType, model: Option<&str>) -> String {
    match (model_type, model) {
        (ModelType::AdvancedMl, Some(name)) => format!("statistical model '{}'", name),
        (ModelType::AdvancedMl, None) => "statistical model".to_string(),
        (ModelType::Fallback, _) => "score thresholds".to_string(),
    }
}

fn priority_label(priority: RecommendationPriority) -> &'static str {
    match priority {
        RecommendationPriority::Critical => "Critical",
        RecommendationPriority::High => "High",
        RecommendationPriority::Medium => "Medium",
        RecommendationPriority::Low => "Low",
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_band_badge(&self, band: CompatibilityBand) -> String {
        let (badge, color) = match band {
            CompatibilityBand::Outstanding => ("OUTSTANDING", Color::Green),
            CompatibilityBand::Excellent => ("EXCELLENT", Color::BrightGreen),
            CompatibilityBand::Good => ("GOOD", Color::Yellow),
            CompatibilityBand::Moderate => ("MODERATE", Color::BrightYellow),
            CompatibilityBand::GrowthOpportunity => ("GROWTH", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn fit_color(label: FitLabel) -> Color {
        match label {
            FitLabel::GoodFit => Color::Green,
            FitLabel::PotentialFit => Color::Yellow,
            FitLabel::NoFit => Color::Red,
        }
    }

    fn readiness_color(level: ReadinessLevel) -> Color {
        match level {
            ReadinessLevel::Excellent | ReadinessLevel::Good => Color::Green,
            ReadinessLevel::Satisfactory => Color::Yellow,
            ReadinessLevel::NeedsImprovement => Color::BrightYellow,
            ReadinessLevel::RequiresWork => Color::Red,
            ReadinessLevel::NotStarted => Color::BrightBlack,
        }
    }

    fn format_priority_icon(&self, priority: RecommendationPriority) -> String {
        if self.use_colors {
            let icon = match priority {
                RecommendationPriority::Critical => "🚨",
                RecommendationPriority::High => "⚠️",
                RecommendationPriority::Medium => "📋",
                RecommendationPriority::Low => "💡",
            };
            format!("{} ", icon)
        } else {
            let text_icon = match priority {
                RecommendationPriority::Critical => "[!]",
                RecommendationPriority::High => "[*]",
                RecommendationPriority::Medium => "[-]",
                RecommendationPriority::Low => "[+]",
            };
            format!("{} ", text_icon)
        }
    }

    fn format_skill_line(&self, label: &str, skills: &[String], color: Color) -> String {
        let list = if skills.is_empty() {
            "none".to_string()
        } else {
            skills.join(", ")
        };
        format!("{} ({}): {}\n", label, skills.len(), self.colorize(&list, color))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_fit(&self, report: &FitReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;

        output.push_str(&self.format_header("🎯 SKILL FIT ANALYSIS", 1));
        output.push_str(&format!(
            "Resume: {} | Job: {}\n",
            file_label(&report.metadata.resume_file),
            file_label(&report.metadata.job_file)
        ));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Match Summary", 2));
        output.push_str(&format!(
            "Match Score: {:.1}% {}\n",
            summary.match_score,
            self.format_band_badge(summary.band)
        ));
        output.push_str(&format!("{}\n", self.colorize(&summary.headline, Color::Cyan)));

        output.push_str(&self.format_header("Fit Verdict", 2));
        output.push_str(&format!(
            "Prediction: {}\n",
            self.colorize(summary.prediction.as_str(), Self::fit_color(summary.prediction))
        ));
        output.push_str(&format!(
            "Confidence: {:.1}% ({})\n",
            summary.confidence * 100.0,
            summary.confidence_level
        ));
        output.push_str(&format!(
            "Method: {}\n",
            model_label(report.metadata.model_type, report.metadata.fit_model.as_deref())
        ));
        output.push_str(&format!("💡 {}\n", summary.fit_recommendation));

        output.push_str(&self.format_header("Skills", 2));
        output.push_str(&self.format_skill_line("✅ Matched", &report.skills.matched, Color::Green));
        output.push_str(&self.format_skill_line("❌ Missing", &report.skills.missing, Color::Red));
        output.push_str(&self.format_skill_line("➕ Additional", &report.skills.extra, Color::Blue));

        if !report.recommendations.is_empty() {
            output.push_str(&self.format_header("📋 Recommendations", 2));
            for (i, rec) in report.recommendations.iter().enumerate() {
                output.push_str(&format!(
                    "{}. {}{}\n",
                    i + 1,
                    self.format_priority_icon(rec.priority),
                    self.colorize(&rec.title, Color::White)
                ));
                output.push_str(&format!("   {}\n", rec.description));
                if self.detailed {
                    for step in &rec.actionable_steps {
                        output.push_str(&format!("   • {}\n", step));
                    }
                }
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("📊 Detailed Analysis", 2));
            output.push_str(&self.format_header("Class Probabilities", 3));
            let p = &summary.probabilities;
            output.push_str(&format!("  Good Fit:      {:.1}%\n", p.good_fit * 100.0));
            output.push_str(&format!("  Potential Fit: {:.1}%\n", p.potential_fit * 100.0));
            output.push_str(&format!("  No Fit:        {:.1}%\n", p.no_fit * 100.0));

            if !report.missing_by_category.is_empty() {
                output.push_str(&self.format_header("Missing Skills by Category", 3));
                for group in &report.missing_by_category {
                    output.push_str(&format!("  {}: {}\n", group.category, group.skills.join(", ")));
                }
            }

            output.push_str(&self.format_header("All Extracted Skills", 3));
            output.push_str(&self.format_skill_line("Resume", &report.skills.resume, Color::White));
            output.push_str(&self.format_skill_line("Job", &report.skills.job, Color::White));
        }

        output.push_str(&format!(
            "\n{} Generated by skill-fit v{}\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.tool_version
        ));

        Ok(output)
    }

    fn format_skills(&self, report: &SkillListReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🔍 EXTRACTED SKILLS", 1));
        output.push_str(&format!(
            "Source: {} | {} skills found\n",
            file_label(&report.source),
            report.total
        ));

        if report.by_category.is_empty() {
            output.push_str(&self.colorize("\nNo known skills found.\n", Color::Yellow));
        }
        for group in &report.by_category {
            output.push_str(&self.format_header(&format!("{} ({})", group.category, group.skills.len()), 3));
            for skill in &group.skills {
                output.push_str(&format!("  • {}\n", skill));
            }
        }

        Ok(output)
    }

    fn format_readiness(&self, report: &ReadinessReport) -> Result<String> {
        let mut output = String::new();
        let assessment = &report.assessment;

        output.push_str(&self.format_header("🎤 INTERVIEW READINESS", 1));
        output.push_str(&format!(
            "Readiness: {} | Score: {:.1}% | Questions: {}\n",
            self.colorize(assessment.level.label(), Self::readiness_color(assessment.level)),
            assessment.overall_score,
            assessment.question_count
        ));

        if !report.answers.is_empty() {
            output.push_str(&self.format_header("Answers", 2));
            for (i, entry) in report.answers.iter().enumerate() {
                output.push_str(&format!(
                    "{}. {} - {:.0}% ({} words)\n",
                    i + 1,
                    file_label(&entry.source),
                    entry.evaluation.overall_score,
                    entry.word_count
                ));
                if self.detailed {
                    let scores = &entry.evaluation.scores;
                    output.push_str(&format!(
                        "   Technical depth {:.0} | Communication {:.0} | Problem solving {:.0} | Relevance {:.0}\n",
                        scores.technical_depth,
                        scores.communication,
                        scores.problem_solving,
                        scores.relevance
                    ));
                    for improvement in &entry.evaluation.improvements {
                        output.push_str(&format!("   • {}\n", improvement));
                    }
                }
            }
        }

        output.push_str(&self.format_header("📋 Recommendations", 2));
        for rec in &assessment.recommendations {
            output.push_str(&format!("  • {}\n", rec));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_fit(&self, report: &FitReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_skills(&self, report: &SkillListReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_readiness(&self, report: &ReadinessReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_fit_badge(label: FitLabel) -> &'static str {
        match label {
            FitLabel::GoodFit => "🟢 Good Fit",
            FitLabel::PotentialFit => "🟡 Potential Fit",
            FitLabel::NoFit => "🔴 No Fit",
        }
    }

    fn skill_list(skills: &[String]) -> String {
        if skills.is_empty() {
            "_none_".to_string()
        } else {
            format!("`{}`", skills.join("`, `"))
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_fit(&self, report: &FitReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;

        output.push_str("# 🎯 Skill Fit Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                file_label(&report.metadata.resume_file),
                file_label(&report.metadata.job_file)
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str("| Measure | Value |\n");
        output.push_str("|---------|-------|\n");
        output.push_str(&format!("| Match Score | {:.1}% |\n", summary.match_score));
        output.push_str(&format!("| Band | {} |\n", summary.headline));
        output.push_str(&format!("| Verdict | {} |\n", Self::markdown_fit_badge(summary.prediction)));
        output.push_str(&format!(
            "| Confidence | {:.1}% ({}) |\n",
            summary.confidence * 100.0,
            summary.confidence_level
        ));
        output.push_str(&format!(
            "| Method | {} |\n\n",
            model_label(report.metadata.model_type, report.metadata.fit_model.as_deref())
        ));
        output.push_str(&format!("> {}\n\n", summary.fit_recommendation));

        output.push_str("## Skills\n\n");
        output.push_str(&format!("- **Matched ({}):** {}\n", report.skills.matched.len(), Self::skill_list(&report.skills.matched)));
        output.push_str(&format!("- **Missing ({}):** {}\n", report.skills.missing.len(), Self::skill_list(&report.skills.missing)));
        output.push_str(&format!("- **Additional ({}):** {}\n\n", report.skills.extra.len(), Self::skill_list(&report.skills.extra)));

        if !report.missing_by_category.is_empty() {
            output.push_str("### Missing Skills by Category\n\n");
            output.push_str("| Category | Skills |\n");
            output.push_str("|----------|--------|\n");
            for group in &report.missing_by_category {
                output.push_str(&format!("| {} | {} |\n", group.category, group.skills.join(", ")));
            }
            output.push('\n');
        }

        if !report.recommendations.is_empty() {
            output.push_str("## 📋 Recommendations\n\n");
            for (i, rec) in report.recommendations.iter().enumerate() {
                output.push_str(&format!(
                    "### {}. {} ({})\n\n{}\n\n",
                    i + 1,
                    rec.title,
                    priority_label(rec.priority),
                    rec.description
                ));
                for step in &rec.actionable_steps {
                    output.push_str(&format!("- {}\n", step));
                }
                output.push('\n');
            }
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!("*Generated by skill-fit v{}*\n", report.metadata.tool_version));
        }

        Ok(output)
    }

    fn format_skills(&self, report: &SkillListReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("# 🔍 Skills in `{}`\n\n", file_label(&report.source)));
        output.push_str(&format!("**Total:** {}\n\n", report.total));

        for group in &report.by_category {
            output.push_str(&format!("## {}\n\n", group.category));
            for skill in &group.skills {
                output.push_str(&format!("- {}\n", skill));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn format_readiness(&self, report: &ReadinessReport) -> Result<String> {
        let mut output = String::new();
        let assessment = &report.assessment;

        output.push_str("# 🎤 Interview Readiness\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {}\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        output.push_str(&format!(
            "**Readiness:** {} | **Score:** {:.1}% | **Questions:** {}\n\n",
            assessment.level, assessment.overall_score, assessment.question_count
        ));

        if !report.answers.is_empty() {
            output.push_str("## Answers\n\n");
            output.push_str("| # | Answer | Score | Words |\n");
            output.push_str("|---|--------|-------|-------|\n");
            for (i, entry) in report.answers.iter().enumerate() {
                output.push_str(&format!(
                    "| {} | {} | {:.0}% | {} |\n",
                    i + 1,
                    file_label(&entry.source),
                    entry.evaluation.overall_score,
                    entry.word_count
                ));
            }
            output.push('\n');
        }

        output.push_str("## Recommendations\n\n");
        for rec in &assessment.recommendations {
            output.push_str(&format!("- {}\n", rec));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_fit(&self, report: &FitReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_fit(report)
    }

    pub fn generate_skills(&self, report: &SkillListReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_skills(report)
    }

    pub fn generate_readiness(&self, report: &ReadinessReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_readiness(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// File name for a saved report, e.g. `resume_fit_20240101_120000.md`
pub fn suggest_filename(format: OutputFormat, source_name: &str, kind: &str, timestamp: bool) -> String {
    let base_name = Path::new(source_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_{}{}.{}", base_name, kind, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::analyzer::FitAnalysisEngine;
    use crate::processing::readiness::{assess, evaluate_answer_heuristic};
    use tempfile::TempDir;

    fn fit_report() -> FitReport {
        let engine = FitAnalysisEngine::from_config(&Config::default()).unwrap();
        let analysis = engine.analyze(
            "Python developer with Docker, AWS and teamwork.",
            "Python, Docker, AWS and Kubernetes.",
        );
        FitReport::from_analysis(&analysis, &engine, "/tmp/resume.pdf", "/tmp/job.txt")
    }

    fn readiness_report() -> ReadinessReport {
        let evaluation = evaluate_answer_heuristic(&"detail ".repeat(120));
        let assessment = assess(&[evaluation.overall_score]).unwrap();
        ReadinessReport::new(
            vec![AnswerEntry {
                source: "answers/q1.txt".to_string(),
                word_count: 120,
                evaluation,
            }],
            assessment,
        )
    }

    #[test]
    fn test_console_output_without_colors() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_fit(&fit_report()).unwrap();

        assert!(output.contains("SKILL FIT ANALYSIS"));
        assert!(output.contains("Match Score: 75.0% [EXCELLENT]"));
        assert!(output.contains("Prediction: Good Fit"));
        assert!(output.contains("Missing (1): kubernetes"));
        assert!(output.contains("Resume: resume.pdf | Job: job.txt"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_output_is_valid() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format_fit(&fit_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["summary"]["match_score"], 75.0);
        assert_eq!(value["summary"]["prediction"], "GoodFit");
        assert_eq!(value["metadata"]["model_type"], "fallback");
        assert_eq!(value["skills"]["missing"][0], "kubernetes");
    }

    #[test]
    fn test_markdown_output() {
        let formatter = MarkdownFormatter::new(true);
        let output = formatter.format_fit(&fit_report()).unwrap();

        assert!(output.starts_with("# 🎯 Skill Fit Report"));
        assert!(output.contains("| Verdict | 🟢 Good Fit |"));
        assert!(output.contains("**Missing (1):** `kubernetes`"));
        assert!(output.contains("Enhance Technical Skills Section"));
    }

    #[test]
    fn test_readiness_formats() {
        let generator = ReportGenerator::with_options(false, true, true, true);
        let report = readiness_report();

        let console = generator.generate_readiness(&report, OutputFormat::Console).unwrap();
        assert!(console.contains("Readiness: Good | Score: 85.0% | Questions: 1"));
        assert!(console.contains("Strong preparation. Practice a few more questions"));

        let markdown = generator.generate_readiness(&report, OutputFormat::Markdown).unwrap();
        assert!(markdown.contains("| 1 | q1.txt | 85% | 120 |"));

        let json = generator.generate_readiness(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["assessment"]["level"], "Good");
        assert_eq!(value["answers"][0]["evaluation"]["rating"], "good");
    }

    #[test]
    fn test_generator_dispatches_by_format() {
        let generator = ReportGenerator::new();
        for format in [OutputFormat::Console, OutputFormat::Json, OutputFormat::Markdown] {
            assert_eq!(generator.formatter(format).supports_format(), format);
        }
    }

    #[test]
    fn test_suggest_filename() {
        let name = suggest_filename(OutputFormat::Markdown, "docs/my_resume.pdf", "fit", false);
        assert_eq!(name, "my_resume_fit.md");

        let stamped = suggest_filename(OutputFormat::Json, "resume.txt", "readiness", true);
        assert!(stamped.starts_with("resume_readiness_"));
        assert!(stamped.ends_with(".json"));
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports/nested/report.md");
        save_report_to_file("# Report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report");
    }
}
