//! skill-matcher: rank resumes against a job description by skill overlap

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use skill_matcher::cli::{self, Cli, Commands, ConfigAction, ReportArgs, StageTarget};
use skill_matcher::config::Config;
use skill_matcher::input::manager::InputManager;
use skill_matcher::input::staging::StagingStore;
use skill_matcher::output::formatter::{save_report_to_file, ReportGenerator};
use skill_matcher::processing::analyzer::{split_resume_text, BatchAnalysis, Candidate, CandidateAnalyzer};
use skill_matcher::processing::extractor::ExtractorOptions;
use skill_matcher::{FuzzyCutoff, SkillMatchError};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown", "docx", "doc"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(vocabulary) = cli.vocabulary {
        config.vocabulary.path = Some(vocabulary);
    }

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Match {
            job,
            skills,
            resume,
            report,
        } => {
            let analyzer = build_analyzer(&config, &report)?;
            let mut input_manager = InputManager::new().with_cache(config.input.enable_cache);
            let candidates = collect_with_spinner(&mut input_manager, &resume).await?;
            if candidates.is_empty() {
                bail!(SkillMatchError::InvalidInput(
                    "No resume text could be extracted from the given paths".to_string()
                ));
            }

            let batch = match job {
                Some(job) => {
                    cli::validate_file_extension(&job, DOCUMENT_EXTENSIONS)
                        .map_err(|e| SkillMatchError::InvalidInput(format!("Job file: {}", e)))?;
                    let jd_text = input_manager
                        .extract_text(&job)
                        .await
                        .with_context(|| format!("Reading job description {}", job.display()))?;
                    analyzer.analyze(&jd_text, &candidates)?
                }
                None => {
                    info!("Scoring against required skills: {}", skills.join(", "));
                    analyzer.analyze_against_skills(&skills, &candidates)
                }
            };

            render(&config, &report, &batch)
        }

        Commands::AnalyzeText {
            jd_text,
            resume_text,
            report,
        } => {
            if jd_text.trim().is_empty() {
                bail!(SkillMatchError::InvalidInput("Missing jd_text".to_string()));
            }
            let candidates = split_resume_text(&resume_text);
            if candidates.is_empty() {
                bail!(SkillMatchError::InvalidInput("Missing resume_text".to_string()));
            }

            let analyzer = build_analyzer(&config, &report)?;
            let batch = analyzer.analyze(jd_text.trim(), &candidates)?;
            render(&config, &report, &batch)
        }

        Commands::Stage { target } => {
            let store = StagingStore::new(&config.input.staging_dir);
            let mut input_manager = InputManager::new().with_cache(config.input.enable_cache);

            match target {
                StageTarget::Jd { path } => {
                    cli::validate_file_extension(&path, DOCUMENT_EXTENSIONS)
                        .map_err(|e| SkillMatchError::InvalidInput(format!("Job file: {}", e)))?;
                    let text = input_manager.extract_text(&path).await?;
                    store.save_jd(&text)?;
                    println!(
                        "Staged job description ({} words) in {}",
                        text.split_whitespace().count(),
                        store.dir().display()
                    );
                }
                StageTarget::Resumes { paths } => {
                    let candidates = collect_with_spinner(&mut input_manager, &paths).await?;
                    store.save_candidates(&candidates)?;
                    let failed = candidates.iter().filter(|c| c.error.is_some()).count();
                    println!(
                        "Staged {} resumes ({} failed to parse) in {}",
                        candidates.len(),
                        failed,
                        store.dir().display()
                    );
                }
                StageTarget::Clear => {
                    store.clear()?;
                    println!("Cleared staged data in {}", store.dir().display());
                }
            }
            Ok(())
        }

        Commands::Analyze { report } => {
            let store = StagingStore::new(&config.input.staging_dir);
            let candidates = store.load_candidates()?;
            let jd_text = store.load_jd()?.unwrap_or_default();
            if jd_text.trim().is_empty() {
                info!("No job description staged; every candidate will score 0%");
            }

            let analyzer = build_analyzer(&config, &report)?;
            let batch = analyzer.analyze(&jd_text, &candidates)?;
            render(&config, &report, &batch)
        }

        Commands::Skills { json } => {
            let vocabulary = config.load_vocabulary()?;
            if json {
                let skills: Vec<serde_json::Value> = vocabulary
                    .entries()
                    .iter()
                    .map(|e| serde_json::json!({ "name": e.name(), "variants": e.variants() }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&skills)?);
            } else {
                for entry in vocabulary.entries() {
                    println!("{:<20} {}", entry.name(), entry.variants().join(", "));
                }
            }
            Ok(())
        }

        Commands::Config { action } => {
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    let content = toml::to_string_pretty(&config)
                        .context("Serializing configuration")?;
                    println!("{}", content);
                }
                ConfigAction::Reset => {
                    Config::default().save_to(config_path)?;
                    println!("Configuration reset: {}", config_path.display());
                }
                ConfigAction::Path => println!("{}", config_path.display()),
            }
            Ok(())
        }
    }
}

fn build_analyzer(config: &Config, report: &ReportArgs) -> anyhow::Result<CandidateAnalyzer> {
    let mut options = ExtractorOptions::from_config(&config.matching)?;
    if let Some(cutoff) = &report.cutoff {
        options = options.with_cutoff(cutoff.parse::<FuzzyCutoff>()?);
    }

    let vocabulary = config.load_vocabulary().context("Loading skill vocabulary")?;
    info!(
        "Using {} skills, fuzzy cutoff {}",
        vocabulary.len(),
        options.cutoff
    );

    Ok(CandidateAnalyzer::new(Arc::new(vocabulary), options)?
        .with_bar_length(config.output.progress_bar_length))
}

async fn collect_with_spinner(
    input_manager: &mut InputManager,
    paths: &[PathBuf],
) -> anyhow::Result<Vec<Candidate>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .context("Building progress style")?,
    );
    spinner.set_message("Extracting resume text...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let candidates = input_manager.collect_candidates(paths).await;
    spinner.finish_and_clear();
    Ok(candidates?)
}

fn render(config: &Config, report: &ReportArgs, batch: &BatchAnalysis) -> anyhow::Result<()> {
    let format = match &report.output {
        Some(output) => cli::parse_output_format(output).map_err(SkillMatchError::InvalidInput)?,
        None => config.output.format,
    };
    let detailed = report.detailed || config.output.detailed;
    // Files get no ANSI codes
    let use_colors = config.output.color_output && report.save.is_none();

    let generator = ReportGenerator::with_options(use_colors, detailed);
    let content = generator.generate_report(batch, &format)?;

    match &report.save {
        Some(path) => {
            save_report_to_file(&content, path)?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
