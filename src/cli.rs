//! CLI interface for the skill matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "skill-matcher")]
#[command(about = "Match resumes against a job description by skill overlap")]
#[command(long_about = "Extract known skills (with synonyms and near-spellings) from a job description and a set of resumes, then rank each resume by the share of job skills it covers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skill vocabulary file (TOML or JSON), overrides the configured one
    #[arg(long, global = true)]
    pub vocabulary: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match resumes against a job description file or an explicit skill list
    Match {
        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long, required_unless_present = "skills")]
        job: Option<PathBuf>,

        /// Comma-separated required skills, used instead of a job description
        #[arg(long, value_delimiter = ',', conflicts_with = "job")]
        skills: Vec<String>,

        /// Resume files, directories of resumes or ZIP archives
        #[arg(short, long, required = true, num_args = 1..)]
        resume: Vec<PathBuf>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Match pasted resume text (resumes separated by `---` lines)
    AnalyzeText {
        /// Job description text
        #[arg(long)]
        jd_text: String,

        /// Resume text; separate multiple resumes with a line that is only `---`
        #[arg(long)]
        resume_text: String,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Stage a job description or resumes for a later `analyze`
    Stage {
        #[command(subcommand)]
        target: StageTarget,
    },

    /// Analyze the staged job description and resumes
    Analyze {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// List the skill vocabulary
    Skills {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(clap::Args, Clone)]
pub struct ReportArgs {
    /// Fuzzy similarity cutoff in [0, 1]
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Output format: console, json, markdown, html
    #[arg(short, long)]
    pub output: Option<String>,

    /// Show ranked skills and examples for each candidate
    #[arg(short, long)]
    pub detailed: bool,

    /// Save output to file
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum StageTarget {
    /// Stage a job description file
    Jd {
        path: PathBuf,
    },

    /// Stage resume files, directories or ZIP archives
    Resumes {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },

    /// Remove all staged data
    Clear,
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
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
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
