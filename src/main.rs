//! skill-fit: skill extraction, resume/job matching and fit assessment

use clap::Parser;
use log::{error, info};
use skill_fit::cli::{self, Cli, Commands, ConfigAction};
use skill_fit::config::{Config, OutputFormat};
use skill_fit::error::{Result, SkillFitError};
use skill_fit::input::InputManager;
use skill_fit::output::report::AnswerEntry;
use skill_fit::output::{
    save_report_to_file, suggest_filename, FitReport, ReadinessReport, ReportGenerator,
    SkillListReport,
};
use skill_fit::processing::readiness::{evaluate_answer_heuristic, InterviewSession};
use skill_fit::processing::FitAnalysisEngine;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn resolve_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(format) => cli::parse_output_format(format).map_err(SkillFitError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// Print the report and optionally save an uncolored copy
fn emit(
    render: impl Fn(&ReportGenerator) -> Result<String>,
    format: OutputFormat,
    use_colors: bool,
    detailed: bool,
    save: Option<PathBuf>,
    source_name: &str,
    kind: &str,
) -> Result<()> {
    let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
    println!("{}", render(&generator)?);

    if let Some(save_path) = save {
        let target = if save_path.is_dir() {
            save_path.join(suggest_filename(format, source_name, kind, true))
        } else {
            save_path
        };

        let plain = ReportGenerator::with_options(false, detailed, true, true);
        save_report_to_file(&render(&plain)?, &target)?;
        if format == OutputFormat::Console {
            println!("💾 Report saved to {}", target.display());
        } else {
            info!("Report saved to {}", target.display());
        }
    }

    Ok(())
}

async fn run_command(command: Commands, mut config: Config, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Match {
            resume,
            job,
            model,
            detailed,
            output,
            save,
            no_color,
        } => {
            info!("Starting skill fit analysis");

            cli::validate_file_extension(&resume, cli::DOCUMENT_EXTENSIONS)
                .map_err(|e| SkillFitError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, cli::DOCUMENT_EXTENSIONS)
                .map_err(|e| SkillFitError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format = resolve_format(output.as_deref(), &config)?;
            let detailed = detailed || config.output.detailed;
            let use_colors = config.output.color_output && !no_color;

            if let Some(model_path) = model {
                config.classifier.model_path = Some(model_path);
            }

            let console = output_format == OutputFormat::Console;
            if console {
                println!("🚀 Skill fit analysis");
                println!("📄 Resume: {}", resume.display());
                println!("💼 Job Description: {}", job.display());
            }

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;

            if console && (resume_text.is_empty() || job_text.is_empty()) {
                println!("⚠️  No text could be read from one of the documents; results will be empty");
            }

            let engine = FitAnalysisEngine::from_config(&config)?;
            let analysis = engine.analyze(&resume_text.text, &job_text.text);

            let report = FitReport::from_analysis(
                &analysis,
                &engine,
                &resume.to_string_lossy(),
                &job.to_string_lossy(),
            );

            emit(
                |generator| generator.generate_fit(&report, output_format),
                output_format,
                use_colors,
                detailed,
                save,
                &resume.to_string_lossy(),
                "fit",
            )?;
        }

        Commands::Skills { file, output, save } => {
            cli::validate_file_extension(&file, cli::DOCUMENT_EXTENSIONS)
                .map_err(SkillFitError::InvalidInput)?;
            let output_format = resolve_format(output.as_deref(), &config)?;

            let extracted = InputManager::new().extract_text(&file).await?;
            let engine = FitAnalysisEngine::from_config(&config)?;
            let skills = engine.extract_skills(&extracted.text);

            let report = SkillListReport::new(&file.to_string_lossy(), &skills, &engine);

            emit(
                |generator| generator.generate_skills(&report, output_format),
                output_format,
                config.output.color_output,
                config.output.detailed,
                save,
                &file.to_string_lossy(),
                "skills",
            )?;
        }

        Commands::Readiness {
            answers,
            scores,
            detailed,
            output,
            save,
        } => {
            let output_format = resolve_format(output.as_deref(), &config)?;

            let mut input_manager = InputManager::new();
            let mut session = InterviewSession::new();
            let mut entries = Vec::with_capacity(answers.len());

            for path in &answers {
                cli::validate_file_extension(path, cli::ANSWER_EXTENSIONS)
                    .map_err(|e| SkillFitError::InvalidInput(format!("Answer file: {}", e)))?;

                let answer = input_manager.extract_text(path).await?;
                let evaluation = evaluate_answer_heuristic(&answer.text);
                session.record(evaluation.overall_score)?;

                entries.push(AnswerEntry {
                    source: path.to_string_lossy().to_string(),
                    word_count: answer.text.split_whitespace().count(),
                    evaluation,
                });
            }

            for score in scores {
                session.record(score)?;
            }

            info!("Assessed {} answers", session.scores().len());
            let report = ReadinessReport::new(entries, session.assessment().clone());
            let source_name = answers
                .first()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|| "interview".to_string());

            emit(
                |generator| generator.generate_readiness(&report, output_format),
                output_format,
                config.output.color_output,
                detailed || config.output.detailed,
                save,
                &source_name,
                "readiness",
            )?;
        }

        Commands::Config { action } => {
            let path = config_override.clone().unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Configuration ({})\n", path.display());
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        SkillFitError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    match &config_override {
                        Some(custom) => Config::default().save_to(custom)?,
                        None => {
                            Config::reset()?;
                        }
                    }
                    println!("✅ Configuration reset to defaults at {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
