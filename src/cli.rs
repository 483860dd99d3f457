//! CLI interface for skill-fit

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Document types accepted for resumes and job descriptions
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];

/// Answer files are read as plain text
pub const ANSWER_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "skill-fit")]
#[command(about = "Skill extraction, resume/job matching and fit assessment")]
#[command(long_about = "Extract skills from resumes and job descriptions, score how well they match, predict fit and track interview readiness")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match a resume against a job description and predict fit
    Match {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Fit model file, overriding the configured one
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Disable colored console output
        #[arg(long)]
        no_color: bool,
    },

    /// List the skills found in one document
    Skills {
        /// Path to the document
        file: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Assess interview readiness from answer files or scores
    Readiness {
        /// Answer files, evaluated in order
        answers: Vec<PathBuf>,

        /// Per-question scores (0-100), appended after evaluated answers
        #[arg(short = 'S', long = "score")]
        scores: Vec<f64>,

        /// Output detailed evaluation
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_match_command() {
        let cli = Cli::try_parse_from([
            "skill-fit", "match", "-r", "resume.pdf", "-j", "job.txt", "-o", "json", "--detailed",
        ])
        .unwrap();

        match cli.command {
            Commands::Match { resume, job, output, detailed, .. } => {
                assert_eq!(resume, PathBuf::from("resume.pdf"));
                assert_eq!(job, PathBuf::from("job.txt"));
                assert_eq!(output.as_deref(), Some("json"));
                assert!(detailed);
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_parse_readiness_scores() {
        let cli = Cli::try_parse_from(["skill-fit", "readiness", "--score", "80", "-S", "92.5"]).unwrap();
        match cli.command {
            Commands::Readiness { answers, scores, .. } => {
                assert!(answers.is_empty());
                assert_eq!(scores, vec![80.0, 92.5]);
            }
            _ => panic!("expected readiness command"),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_extension_validation() {
        assert!(validate_file_extension(Path::new("cv.PDF"), DOCUMENT_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.xyz"), DOCUMENT_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("cv"), DOCUMENT_EXTENSIONS).is_err());
    }
}
