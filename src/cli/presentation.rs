//! CLI presentation: text and json formatters per command.

use crate::backup::BackupReport;
use crate::engine::{CleanReport, DirtyReport};
use crate::error::ApiError;
use crate::snapshot::{ComparisonResult, FileEntry};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Output format shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self, ApiError> {
        match format {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ApiError::InvalidArgument(format!(
                "Unknown format '{}' (expected 'text' or 'json')",
                other
            ))),
        }
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn path_table(paths: &[(&str, &str)]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Change", "Path"]);
    for (change, path) in paths {
        table.add_row(vec![change.to_string(), path.to_string()]);
    }
    table
}

fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(12)]
}

pub fn format_scan(root: &str, entries: &[FileEntry], format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(entries);
    }
    let mut out = format!("{}\n\n", format_section_heading(&format!("Scan of {}", root)));
    if entries.is_empty() {
        out.push_str("No files.\n");
        return Ok(out);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Path", "SHA-256"]);
    for entry in entries {
        table.add_row(vec![
            entry.id.to_string(),
            entry.relative_path.clone(),
            short_hash(&entry.content_hash).to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n{} file(s)", table, entries.len()));
    Ok(out)
}

pub fn format_comparison(result: &ComparisonResult, format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(result);
    }
    if result.is_identical() {
        return Ok("Trees are identical.".to_string());
    }
    let mut rows = Vec::new();
    rows.extend(result.right_only.iter().map(|p| ("added", p.as_str())));
    rows.extend(result.changed.iter().map(|p| ("changed", p.as_str())));
    rows.extend(result.left_only.iter().map(|p| ("removed", p.as_str())));
    Ok(format!(
        "{}\n\n{}\n\n{} added, {} changed, {} removed",
        format_section_heading("Differences"),
        path_table(&rows),
        result.right_only.len(),
        result.changed.len(),
        result.left_only.len()
    ))
}

pub fn format_except(entries: &[FileEntry], format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(entries);
    }
    if entries.is_empty() {
        return Ok("No files removed.".to_string());
    }
    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("  {}", e.relative_path))
        .collect();
    Ok(format!(
        "{}\n{}",
        format_section_heading("Only in old tree"),
        lines.join("\n")
    ))
}

pub fn format_clean_report(report: &CleanReport, format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    if report.is_empty() {
        return Ok(format!(
            "No changes: patch set is empty ({} unchanged, {} not carried over).",
            report.unchanged.len(),
            report.deleted.len()
        ));
    }
    let mut rows = Vec::new();
    rows.extend(report.added.iter().map(|p| ("added", p.as_str())));
    rows.extend(report.patched.iter().map(|p| ("patched", p.as_str())));
    rows.extend(report.deleted.iter().map(|p| ("not carried over", p.as_str())));
    Ok(format!(
        "{}\n\n{}\n\n{} added, {} patched, {} unchanged",
        format_section_heading("Patch set"),
        path_table(&rows),
        report.added.len(),
        report.patched.len(),
        report.unchanged.len()
    ))
}

pub fn format_dirty_report(report: &DirtyReport, format: OutputFormat) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    let mut rows = Vec::new();
    rows.extend(report.patched.iter().map(|p| ("patched", p.as_str())));
    rows.extend(report.added.iter().map(|p| ("added", p.as_str())));
    rows.extend(report.skipped.iter().map(|p| ("skipped", p.as_str())));
    if rows.is_empty() {
        return Ok("Nothing to apply.".to_string());
    }
    Ok(format!(
        "{}\n\n{}\n\n{} patched, {} added, {} skipped",
        format_section_heading("Applied"),
        path_table(&rows),
        report.patched.len(),
        report.added.len(),
        report.skipped.len()
    ))
}

pub fn format_backup_report(
    action: &str,
    report: &BackupReport,
    format: OutputFormat,
) -> Result<String, ApiError> {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    Ok(format!(
        "{}: copied {} file(s) from {} to {}",
        action,
        report.files_copied,
        report.source.display(),
        report.destination.display()
    ))
}
