//! Output formatters for batch analysis results

use crate::config::OutputFormat;
use crate::error::{Result, SkillMatchError};
use crate::processing::analyzer::{BatchAnalysis, CandidateAnalysis};
use crate::processing::extractor::ExtractionResult;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Renders a [`BatchAnalysis`] in one output format.
pub trait OutputFormatter {
    fn format_report(&self, report: &BatchAnalysis) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and score badges
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for handing results to other tools
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_jd_details: bool,
}

pub struct HtmlFormatter;

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Candidate Skill Match Report</title>
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 960px; margin: 0 auto; padding: 20px; color: #333; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border-bottom: 1px solid #e9ecef; padding: 8px; text-align: left; vertical-align: top; }
        .bar { font-family: monospace; }
        .missing { color: #dc3545; }
        .matched { color: #28a745; }
    </style>
</head>
<body>
    <h1>Candidate Skill Match Report</h1>
    <p><strong>Job skills:</strong> {{ jd_skills }}</p>
    <p>{{ candidates_count }} candidates, fuzzy cutoff {{ fuzzy_cutoff }}</p>
    <table>
        <tr><th>Candidate</th><th>Score</th><th>Matched</th><th>Missing</th><th>Extra</th></tr>
        {% for row in rows %}
        <tr>
            <td>{{ row.name }}</td>
            <td class="bar">{{ row.bar }}</td>
            <td class="matched">{{ row.matched }}</td>
            <td class="missing">{{ row.missing }}</td>
            <td>{{ row.extra }}</td>
        </tr>
        {% endfor %}
    </table>
    {% if !failures.is_empty() %}
    <h2>Failed candidates</h2>
    <ul>
        {% for failure in failures %}
        <li>{{ failure }}</li>
        {% endfor %}
    </ul>
    {% endif %}
</body>
</html>"#,
    ext = "html"
)]
struct HtmlTemplate {
    jd_skills: String,
    candidates_count: usize,
    fuzzy_cutoff: String,
    rows: Vec<HtmlRow>,
    failures: Vec<String>,
}

struct HtmlRow {
    name: String,
    bar: String,
    matched: String,
    missing: String,
    extra: String,
}

fn join_or_dash(skills: &[String]) -> String {
    if skills.is_empty() {
        "-".to_string()
    } else {
        skills.join(", ")
    }
}

fn jd_skill_list(jd: &ExtractionResult) -> Vec<String> {
    jd.present_skills().map(str::to_string).collect()
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
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, percent: f64) -> String {
        let (badge, color) = match percent {
            p if p >= 90.0 => ("EXCELLENT", Color::Green),
            p if p >= 75.0 => ("STRONG", Color::BrightGreen),
            p if p >= 50.0 => ("PARTIAL", Color::Yellow),
            p if p > 0.0 => ("WEAK", Color::Red),
            _ => ("NO MATCH", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_candidate(&self, candidate: &CandidateAnalysis) -> String {
        let mut output = String::new();
        let m = &candidate.match_result;

        output.push_str(&self.format_header(&candidate.name, 3));
        output.push_str(&format!(
            "{} {}\n",
            m.progress_bar,
            self.format_score_badge(m.match_score_percent)
        ));
        output.push_str(&format!(
            "  Matched: {}\n",
            self.colorize(&join_or_dash(&m.matched_skills), Color::Green)
        ));
        output.push_str(&format!(
            "  Missing: {}\n",
            self.colorize(&join_or_dash(&m.missing_skills), Color::Red)
        ));
        output.push_str(&format!("  Extra:   {}\n", join_or_dash(&m.extra_skills)));

        if self.detailed {
            if let Some(email) = &candidate.profile.email {
                output.push_str(&format!("  Email: {}\n", email));
            }
            if candidate.profile.experience_years > 0 {
                output.push_str(&format!(
                    "  Experience: {} years\n",
                    candidate.profile.experience_years
                ));
            }
            for ranked in &candidate.resume_results.ranked {
                output.push_str(&format!(
                    "    • {} (score {:.3}, {}x): {}\n",
                    ranked.skill,
                    ranked.score,
                    ranked.count,
                    ranked.examples.join(", ")
                ));
            }
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &BatchAnalysis) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("CANDIDATE SKILL MATCH", 1));
        output.push_str(&format!(
            "Job description: {} words | Candidates: {} | Fuzzy cutoff: {}\n",
            report.meta.jd_word_count, report.meta.candidates_count, report.meta.fuzzy_cutoff
        ));

        output.push_str(&self.format_header("Job Skills", 2));
        let jd_skills = jd_skill_list(&report.jd);
        if jd_skills.is_empty() {
            output.push_str(&self.colorize(
                "No known skills found in the job description; all scores are 0%.\n",
                Color::Yellow,
            ));
        } else {
            output.push_str(&format!("{}\n", jd_skills.join(", ")));
        }

        output.push_str(&self.format_header("Candidates", 2));
        for candidate in &report.candidates {
            output.push_str(&self.format_candidate(candidate));
        }

        if !report.failures.is_empty() {
            output.push_str(&self.format_header("Failed Candidates", 2));
            for failure in &report.failures {
                output.push_str(&format!(
                    "  {} #{} {}: {}\n",
                    self.colorize("✗", Color::Red),
                    failure.index + 1,
                    failure.name,
                    failure.reason
                ));
            }
        }

        output.push_str(&self.format_header("Leaderboard", 2));
        for (rank, candidate) in report.leaderboard().iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} ({}%)\n",
                rank + 1,
                candidate.name,
                candidate.match_result.match_score_percent
            ));
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
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &BatchAnalysis) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_jd_details: bool) -> Self {
        Self { include_jd_details }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &BatchAnalysis) -> Result<String> {
        let mut content = String::new();

        content.push_str("# Candidate Skill Match Report\n\n");
        content.push_str(&format!(
            "**Job skills:** {}\n\n",
            join_or_dash(&jd_skill_list(&report.jd))
        ));

        if self.include_jd_details && !report.jd.ranked.is_empty() {
            content.push_str("| Skill | Score | Count | Examples |\n|---|---|---|---|\n");
            for ranked in &report.jd.ranked {
                content.push_str(&format!(
                    "| {} | {:.3} | {} | {} |\n",
                    ranked.skill,
                    ranked.score,
                    ranked.count,
                    ranked.examples.join(", ")
                ));
            }
            content.push('\n');
        }

        content.push_str("## Candidates\n\n");
        content.push_str("| Candidate | Match | Matched | Missing | Extra |\n|---|---|---|---|---|\n");
        for candidate in &report.candidates {
            let m = &candidate.match_result;
            content.push_str(&format!(
                "| {} | {}% | {} | {} | {} |\n",
                candidate.name,
                m.match_score_percent,
                join_or_dash(&m.matched_skills),
                join_or_dash(&m.missing_skills),
                join_or_dash(&m.extra_skills)
            ));
        }

        if !report.failures.is_empty() {
            content.push_str("\n## Failed Candidates\n\n");
            for failure in &report.failures {
                content.push_str(&format!("- **{}**: {}\n", failure.name, failure.reason));
            }
        }

        Ok(content)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &BatchAnalysis) -> Result<String> {
        let template = HtmlTemplate {
            jd_skills: join_or_dash(&jd_skill_list(&report.jd)),
            candidates_count: report.meta.candidates_count,
            fuzzy_cutoff: report.meta.fuzzy_cutoff.to_string(),
            rows: report
                .candidates
                .iter()
                .map(|c| HtmlRow {
                    name: c.name.clone(),
                    bar: c.match_result.progress_bar.clone(),
                    matched: join_or_dash(&c.match_result.matched_skills),
                    missing: join_or_dash(&c.match_result.missing_skills),
                    extra: join_or_dash(&c.match_result.extra_skills),
                })
                .collect(),
            failures: report
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.name, f.reason))
                .collect(),
        };

        template.render().map_err(|e| {
            SkillMatchError::OutputFormatting(format!("Failed to render HTML report: {}", e))
        })
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(detailed),
            html_formatter: HtmlFormatter,
        }
    }

    pub fn generate_report(&self, report: &BatchAnalysis, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}
