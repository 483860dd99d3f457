//! Integration tests for skill-fit

use skill_fit::config::{Config, OutputFormat};
use skill_fit::error::SkillFitError;
use skill_fit::input::{FileType, InputManager};
use skill_fit::output::{FitReport, ReportGenerator};
use skill_fit::processing::fit_classifier::{FitLabel, ModelType};
use skill_fit::processing::readiness::{assess, evaluate_answer_heuristic, ReadinessLevel};
use skill_fit::processing::FitAnalysisEngine;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

async fn read_fixture(name: &str) -> String {
    InputManager::new()
        .extract_text(&fixture(name))
        .await
        .unwrap()
        .text
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let extracted = manager.extract_text(&fixture("sample_resume.txt")).await.unwrap();

    assert_eq!(extracted.source_kind, FileType::Text);
    assert!(extracted.text.contains("John Doe"));
    assert!(extracted.text.contains("Software Engineer"));
    assert!(extracted.text.contains("React"));
    assert!(extracted.text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let extracted = manager.extract_text(&fixture("sample_resume.md")).await.unwrap();
    let text = extracted.text;

    assert_eq!(extracted.source_kind, FileType::Markdown);
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = fixture("sample_resume.txt");

    let first = manager.extract_text(&path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.extract_text(&path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_format() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(&fixture("unsupported.xyz")).await;
    assert!(matches!(result, Err(SkillFitError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_txt_and_markdown_resumes_yield_same_skills() {
    let engine = FitAnalysisEngine::from_config(&Config::default()).unwrap();

    let from_txt = engine.extract_skills(&read_fixture("sample_resume.txt").await);
    let from_md = engine.extract_skills(&read_fixture("sample_resume.md").await);

    assert_eq!(
        from_txt.sorted_names(),
        vec![
            "docker", "javascript", "leadership", "mentoring", "node.js", "postgresql", "python",
            "react", "rest api", "unit testing",
        ]
    );
    assert_eq!(from_txt, from_md);
}

#[tokio::test]
async fn test_end_to_end_fallback_analysis() {
    let engine = FitAnalysisEngine::from_config(&Config::default()).unwrap();
    let resume = read_fixture("sample_resume.txt").await;
    let job = read_fixture("sample_job.txt").await;

    let analysis = engine.analyze(&resume, &job);
    let result = &analysis.match_result;

    assert_eq!(
        analysis.job_skills.sorted_names(),
        vec![
            "aws", "communication", "django", "docker", "kubernetes", "postgresql", "python",
            "redis", "rest api",
        ]
    );
    assert_eq!(result.matched.sorted_names(), vec!["docker", "postgresql", "python", "rest api"]);
    assert_eq!(
        result.missing.sorted_names(),
        vec!["aws", "communication", "django", "kubernetes", "redis"]
    );
    assert_eq!(result.num_extra(), 6);
    assert_eq!(result.score.rounded(), 44.4);

    let verdict = &analysis.verdict;
    assert_eq!(verdict.prediction, FitLabel::PotentialFit);
    assert_eq!(verdict.model_type, ModelType::Fallback);
    assert!((verdict.probabilities.sum() - 1.0).abs() < 1e-6);
    assert!(verdict.probabilities.potential_fit > verdict.probabilities.no_fit);
    assert!(verdict.probabilities.no_fit > verdict.probabilities.good_fit);
}

#[tokio::test]
async fn test_end_to_end_with_statistical_model() {
    let mut config = Config::default();
    config.classifier.model_path = Some(fixture("fit_model.json"));
    let engine = FitAnalysisEngine::from_config(&config).unwrap();
    assert_eq!(engine.get_stats().fit_model.as_deref(), Some("fit_model"));

    let analysis = engine.analyze(
        &read_fixture("sample_resume.txt").await,
        &read_fixture("sample_job.txt").await,
    );

    assert_eq!(analysis.verdict.model_type, ModelType::AdvancedMl);
    assert_eq!(analysis.verdict.prediction, FitLabel::PotentialFit);
    assert!((analysis.verdict.probabilities.sum() - 1.0).abs() < 1e-6);

    let perfect = engine.analyze("Python and Docker", "Python, Docker");
    assert_eq!(perfect.verdict.prediction, FitLabel::GoodFit);
}

#[test]
fn test_incompatible_model_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old_model.json");
    let model = std::fs::read_to_string(fixture("fit_model.json"))
        .unwrap()
        .replace("char_bigram_dice", "embedding_similarity");
    std::fs::write(&path, model).unwrap();

    let mut config = Config::default();
    config.classifier.model_path = Some(path);
    let engine = FitAnalysisEngine::from_config(&config).unwrap();

    assert!(engine.get_stats().fit_model.is_none());
    let analysis = engine.analyze("Python", "Python");
    assert_eq!(analysis.verdict.model_type, ModelType::Fallback);
    assert_eq!(analysis.verdict.prediction, FitLabel::GoodFit);
}

#[test]
fn test_config_file_extends_lexicon() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[lexicon]
extra_skills = ["Solidity"]

[lexicon.extra_aliases]
sol = "solidity"
"rust lang" = "rust"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let engine = FitAnalysisEngine::from_config(&config).unwrap();
    let skills = engine.extract_skills("Smart contracts in SOL and Rust Lang");
    assert_eq!(skills.sorted_names(), vec!["rust", "solidity"]);
}

#[test]
fn test_chained_alias_config_is_rejected() {
    let mut config = Config::default();
    config
        .lexicon
        .extra_aliases
        .insert("ecmascript".to_string(), "js".to_string());

    assert!(matches!(
        FitAnalysisEngine::from_config(&config),
        Err(SkillFitError::Configuration(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_external_recognizer_and_fallback() {
    let mut config = Config::default();
    config.extraction.use_ner = true;
    config.extraction.ner_command = Some(vec![
        "sh".to_string(),
        "-c".to_string(),
        r#"cat > /dev/null; echo '["Rust", "K8s", "!!"]'"#.to_string(),
    ]);
    let engine = FitAnalysisEngine::from_config(&config).unwrap();
    assert_eq!(engine.get_stats().extraction_strategies, vec!["sh", "lexicon"]);

    // Recognizer output wins over the lexicon when it succeeds
    let skills = engine.extract_skills("Python developer");
    assert_eq!(skills.sorted_names(), vec!["kubernetes", "rust"]);

    config.extraction.ner_command = Some(vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()]);
    let engine = FitAnalysisEngine::from_config(&config).unwrap();
    let skills = engine.extract_skills("Python developer");
    assert_eq!(skills.sorted_names(), vec!["python"]);
}

#[tokio::test]
async fn test_readiness_from_answer_files() {
    let short = evaluate_answer_heuristic(&read_fixture("answer_short.txt").await);
    let long = evaluate_answer_heuristic(&read_fixture("answer_long.txt").await);
    assert_eq!(short.overall_score, 55.0);
    assert_eq!(long.overall_score, 85.0);

    let assessment = assess(&[short.overall_score, long.overall_score]).unwrap();
    assert_eq!(assessment.overall_score, 70.0);
    assert_eq!(assessment.level, ReadinessLevel::Satisfactory);
    assert_eq!(
        assessment.recommendations[0],
        "Good start. Focus on technical depth and examples"
    );
}

#[tokio::test]
async fn test_fit_report_renders_in_all_formats() {
    let engine = FitAnalysisEngine::from_config(&Config::default()).unwrap();
    let analysis = engine.analyze(
        &read_fixture("sample_resume.txt").await,
        &read_fixture("sample_job.txt").await,
    );
    let report = FitReport::from_analysis(&analysis, &engine, "sample_resume.txt", "sample_job.txt");
    let generator = ReportGenerator::with_options(false, true, true, true);

    let json = generator.generate_fit(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["prediction"], "PotentialFit");
    assert_eq!(value["summary"]["match_score"], 44.4);
    assert_eq!(value["skills"]["matched"].as_array().map(Vec::len), Some(4));

    let console = generator.generate_fit(&report, OutputFormat::Console).unwrap();
    assert!(console.contains("Prediction: Potential Fit"));
    assert!(console.contains("Match Score: 44.4% [GOOD]"));

    let markdown = generator.generate_fit(&report, OutputFormat::Markdown).unwrap();
    assert!(markdown.contains("| Verdict | 🟡 Potential Fit |"));
    assert!(markdown.contains("| Technical | aws, django, kubernetes, redis |"));
    assert!(markdown.contains("| Soft | communication |"));
}

#[cfg(unix)]
#[test]
fn test_hanging_recognizer_times_out_to_lexicon() {
    let mut config = Config::default();
    config.extraction.use_ner = true;
    config.extraction.ner_command = Some(vec!["sleep".to_string(), "30".to_string()]);
    config.extraction.ner_timeout_secs = 1;
    let engine = FitAnalysisEngine::from_config(&config).unwrap();

    let started = std::time::Instant::now();
    let skills = engine.extract_skills("Python and Kubernetes");
    assert_eq!(skills.sorted_names(), vec!["kubernetes", "python"]);
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}
