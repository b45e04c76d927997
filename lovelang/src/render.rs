//! Report output: terminal, Markdown and JSON.

use anyhow::{Context, Result};
use lovelang_core::format::percent_bar;
use lovelang_core::report::{ContextSummary, DeepDiveEntry};
use lovelang_core::{CompatibilityResult, ProfileReport};
use std::io::{self, Write};
use std::path::Path;

const WIDTH: usize = 60;
const BAR_WIDTH: usize = 20;

/// Export formats accepted by `--export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        }
    }
}

/// Write `report` in `format`.
pub fn write_export<W: Write>(out: &mut W, report: &ProfileReport, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Markdown => write_markdown(out, report)?,
        ExportFormat::Json => write_json(out, report)?,
    }
    Ok(())
}

/// Write an export to `path` via a temporary file in the same directory, so a
/// failure never leaves a partial file behind.
pub fn write_export_file(path: &Path, report: &ProfileReport, format: ExportFormat) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("failed to resolve current directory")?,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    write_export(&mut tmp, report, format)?;
    tmp.flush().context("failed to flush export")?;
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), ?format, "Exported report");
    Ok(())
}

// ============================================
// Terminal
// ============================================

pub fn print_terminal(report: &ProfileReport) {
    println!();
    println!("╭{}╮", "─".repeat(WIDTH));
    println!("│{:^60}│", "YOUR LOVE LANGUAGE PROFILE");
    println!("╰{}╯", "─".repeat(WIDTH));
    println!();

    for summary in [&report.receiving, &report.giving] {
        print_context(summary);
    }

    println!("KEY INSIGHTS");
    let alignment = &report.insights.alignment;
    println!("   {}: {}", alignment.title(), alignment.message());
    println!("   Balance: {}", report.insights.balance.message());
    println!();

    println!("DEEP DIVE");
    for entry in &report.deep_dive {
        print_deep_dive(entry);
    }

    println!("ACTIVITIES TO TRY");
    for language in &report.focus_languages {
        println!("   {} - {}", language.name, language.short_description);
        for activity in &language.activities {
            println!(
                "     • {} ({}, {}): {}",
                activity.title, activity.difficulty, activity.time, activity.description
            );
        }
    }
    println!();

    if !report.couples_activities.is_empty() {
        println!("TOGETHER");
        for activity in &report.couples_activities {
            println!("   • {}: {}", activity.title, activity.description);
        }
        println!();
    }

    if let Some(compat) = &report.compatibility {
        print_compatibility(compat);
    }
}

fn print_context(summary: &ContextSummary) {
    println!(
        "{} (max {} points)",
        summary.context.label().to_uppercase(),
        summary.max_score
    );
    for (i, row) in summary.ranked.iter().enumerate() {
        println!(
            "   {}. {:<22} {} {:>3}%  {:<6} ({} pts)",
            i + 1,
            row.name,
            percent_bar(row.percentage, BAR_WIDTH),
            row.percentage,
            row.intensity,
            row.score
        );
    }
    println!();
}

fn print_deep_dive(entry: &DeepDiveEntry) {
    println!(
        "   {} {}: {} ({}%, {})",
        entry.rank.label(),
        entry.context.label(),
        entry.name,
        entry.percentage,
        entry.intensity
    );
    println!("     {}", entry.description);
    print_list("Strengths", &entry.strengths);
    print_list("Challenges", &entry.challenges);
    print_list("Triggers", &entry.triggers);
    print_list("Growth areas", &entry.growth_areas);
    println!();
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("     {}:", label);
    for item in items {
        println!("       - {}", item);
    }
}

fn print_compatibility(compat: &CompatibilityResult) {
    println!("PARTNER COMPATIBILITY: {}", compat.match_type.display_name());
    let pairing = &compat.pairing;
    println!(
        "   You give {} / partner receives {}",
        pairing.self_giving.display_name(),
        pairing.partner_receiving.display_name()
    );
    println!(
        "   Partner gives {} / you receive {}",
        pairing.partner_giving.display_name(),
        pairing.self_receiving.display_name()
    );
    if let Some(dynamics) = &compat.dynamics {
        println!("   {}", dynamics.description);
        println!("   Advice: {}", dynamics.advice);
        println!("   Risk: {}", dynamics.risk);
    }
    if let Some(mismatch) = &compat.specific_mismatch {
        println!("   Challenge: {}", mismatch.challenge);
        println!("   Bridge: {}", mismatch.bridge);
        println!("   Watch for: {}", mismatch.watch_for);
    }
    println!();
}

// ============================================
// Markdown
// ============================================

fn write_markdown<W: Write>(out: &mut W, report: &ProfileReport) -> io::Result<()> {
    writeln!(out, "# Your Love Language Profile")?;
    writeln!(out)?;

    for summary in [&report.receiving, &report.giving] {
        writeln!(out, "## {}", summary.context.label())?;
        writeln!(out)?;
        writeln!(out, "| Rank | Language | Score | Percentage | Intensity |")?;
        writeln!(out, "|------|----------|-------|------------|-----------|")?;
        for (i, row) in summary.ranked.iter().enumerate() {
            writeln!(
                out,
                "| {} | {} | {}/{} | {}% | {} |",
                i + 1,
                row.name,
                row.score,
                summary.max_score,
                row.percentage,
                row.intensity
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Key Insights")?;
    writeln!(out)?;
    let alignment = &report.insights.alignment;
    writeln!(out, "- **{}:** {}", alignment.title(), alignment.message())?;
    writeln!(out, "- **Balance:** {}", report.insights.balance.message())?;
    writeln!(out)?;

    writeln!(out, "## Deep Dive")?;
    writeln!(out)?;
    for entry in &report.deep_dive {
        writeln!(
            out,
            "### {} {}: {} ({}%, {})",
            entry.rank.label(),
            entry.context.label(),
            entry.name,
            entry.percentage,
            entry.intensity
        )?;
        writeln!(out)?;
        writeln!(out, "{}", entry.description)?;
        writeln!(out)?;
        write_markdown_list(out, "Strengths", &entry.strengths)?;
        write_markdown_list(out, "Challenges", &entry.challenges)?;
        write_markdown_list(out, "Triggers", &entry.triggers)?;
        write_markdown_list(out, "Growth areas", &entry.growth_areas)?;
    }

    writeln!(out, "## Activities")?;
    writeln!(out)?;
    for language in &report.focus_languages {
        writeln!(out, "### {}", language.name)?;
        writeln!(out)?;
        writeln!(out, "*{}*", language.short_description)?;
        writeln!(out)?;
        for activity in &language.activities {
            writeln!(
                out,
                "- **{}** ({}, {}): {}",
                activity.title, activity.difficulty, activity.time, activity.description
            )?;
        }
        writeln!(out)?;
    }

    if !report.couples_activities.is_empty() {
        writeln!(out, "### Together")?;
        writeln!(out)?;
        for activity in &report.couples_activities {
            writeln!(out, "- **{}**: {}", activity.title, activity.description)?;
        }
        writeln!(out)?;
    }

    if let Some(compat) = &report.compatibility {
        writeln!(out, "## Partner Compatibility: {}", compat.match_type.display_name())?;
        writeln!(out)?;
        if let Some(dynamics) = &compat.dynamics {
            writeln!(out, "{}", dynamics.description)?;
            writeln!(out)?;
            writeln!(out, "- **Advice:** {}", dynamics.advice)?;
            writeln!(out, "- **Risk:** {}", dynamics.risk)?;
        }
        if let Some(mismatch) = &compat.specific_mismatch {
            writeln!(out, "- **Challenge:** {}", mismatch.challenge)?;
            writeln!(out, "- **Bridge:** {}", mismatch.bridge)?;
            writeln!(out, "- **Watch for:** {}", mismatch.watch_for)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn write_markdown_list<W: Write>(out: &mut W, label: &str, items: &[String]) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "**{}**", label)?;
    writeln!(out)?;
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    writeln!(out)
}

// ============================================
// JSON
// ============================================

fn write_json<W: Write>(out: &mut W, report: &ProfileReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).context("failed to serialize report")?;
    writeln!(out)?;
    Ok(())
}
