//! Presentation: text and JSON formatters for command results.

use crate::cli::parse::OutputFormat;
use crate::commit::CommitSummary;
use crate::error::VcsError;
use crate::reconcile::RollbackReport;
use crate::workspace::CommitOutcome;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn format_commit_outcome(outcome: &CommitOutcome) -> String {
    match outcome {
        CommitOutcome::Committed(commit) => format!("Committed:\n{}", commit),
        CommitOutcome::AlreadyCommitted(commit) => format!("Already committed\n{}", commit),
    }
}

pub fn format_commit_list_text(commits: &[CommitSummary]) -> String {
    if commits.is_empty() {
        return "No commits yet.".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Hash", "Message", "UUID", "Created", "Entries"]);
    for c in commits {
        table.add_row(vec![
            c.root_digest.clone(),
            c.message.clone(),
            c.id.clone(),
            c.created_at.clone(),
            c.entries.to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_commit_list_json(commits: &[CommitSummary]) -> Result<String, VcsError> {
    serde_json::to_string_pretty(commits)
        .map_err(|e| VcsError::ConfigError(format!("Failed to render JSON: {}", e)))
}

pub fn format_rollback_report(
    report: &RollbackReport,
    format: OutputFormat,
) -> Result<String, VcsError> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(report)
            .map_err(|e| VcsError::ConfigError(format!("Failed to render JSON: {}", e)));
    }

    let mut out = format!("Rolled back to {}", report.target);
    if !report.removed.is_empty() {
        out.push_str(&format!("\n\n{}", format_section_heading("Removed")));
        for path in &report.removed {
            out.push_str(&format!("\n  - {}", path));
        }
    }
    if !report.discrepancies.is_empty() {
        out.push_str(&format!("\n\n{}", format_section_heading("Discrepancies")));
        for d in &report.discrepancies {
            out.push_str(&format!(
                "\n  {} {} ({}, {})",
                d.kind.yellow(),
                d.path,
                d.expected_kind,
                &d.expected_digest[..d.expected_digest.len().min(12)]
            ));
        }
    }
    Ok(out)
}
