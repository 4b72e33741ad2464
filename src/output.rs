//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (game, article, role, page) is its semantic identity —
//! title and positional index — with source files and asset names shown as
//! indented context lines.
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::assets::{AssetEvent, StageStatus};
use crate::generate::{BuiltPage, PageCheck};
use crate::reveal::{ResourceKind, RevealReport, RevealTrigger};
use crate::scan::Manifest;
use std::time::Duration;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Pluralize a count: `count(2, "image")` → `"2 images"`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn format_millis(d: Duration) -> String {
    format!("{}ms", d.as_millis())
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered content inventory.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    if !manifest.games.is_empty() {
        lines.push("Games".to_string());
        for (i, game) in manifest.games.iter().enumerate() {
            let mut badges = Vec::new();
            if game.hero {
                badges.push("hero");
            }
            if game.promo {
                badges.push("promo");
            }
            let suffix = if badges.is_empty() {
                String::new()
            } else {
                format!(" ({})", badges.join(", "))
            };
            lines.push(format!(
                "    {} {}{}",
                format_index(i + 1),
                game.title,
                suffix
            ));
            lines.push(format!("        Cover: {}", game.cover));
        }
    }

    if !manifest.news.is_empty() {
        lines.push("News".to_string());
        for (i, article) in manifest.news.iter().enumerate() {
            let featured = if article.featured { " (featured)" } else { "" };
            lines.push(format!(
                "    {} {} [{}]{}",
                format_index(i + 1),
                article.title,
                article.tag.label(),
                featured
            ));
        }
    }

    if !manifest.careers.roles.is_empty() {
        lines.push("Careers".to_string());
        for (i, role) in manifest.careers.roles.iter().enumerate() {
            lines.push(format!("    {} {}", format_index(i + 1), role.title));
            lines.push(format!(
                "        {} · {} · {}",
                role.location, role.employment, role.team
            ));
        }
    }

    if let Some(team) = &manifest.team {
        lines.push("Team".to_string());
        lines.push(format!(
            "    {}, {}",
            count(team.members.len(), "member"),
            count(team.commitments.len(), "commitment")
        ));
    }

    if !manifest.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            lines.push(format!("    {} {}", format_index(i + 1), page.title));
            lines.push(format!("        Source: pages/{}.md", page.slug));
        }
    }

    lines.push("Assets".to_string());
    lines.push(format!("    {}", count(manifest.assets.len(), "file")));

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Asset staging output
// ============================================================================

/// Format a single staging progress event as a display line.
pub fn format_asset_event(event: &AssetEvent) -> String {
    let status = match event.status {
        StageStatus::Copied => "copied",
        StageStatus::Cached => "cached",
    };
    match event.dimensions {
        Some((w, h)) => format!("    {}: {} ({}x{})", event.path, status, w, h),
        None => format!("    {}: {}", event.path, status),
    }
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format generate stage output showing generated HTML files.
pub fn format_generate_output(pages: &[BuiltPage]) -> Vec<String> {
    let mut lines = Vec::new();
    for page in pages {
        let images = page
            .resources
            .iter()
            .filter(|r| r.kind == ResourceKind::Image)
            .count();
        lines.push(format!(
            "{} \u{2192} {} ({})",
            page.title,
            page.file,
            count(images, "image")
        ));
    }
    lines.push(format!("Generated {}", count(pages.len(), "page")));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(pages: &[BuiltPage]) {
    for line in format_generate_output(pages) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

fn format_report(label: &str, report: &RevealReport) -> String {
    if !report.revealed {
        let stuck = report.stragglers.join(", ");
        return format!("        {label}: STUCK waiting on {stuck}");
    }
    let trigger = match report.trigger {
        Some(RevealTrigger::AllSettled) => "all settled",
        Some(RevealTrigger::FallbackTimeout) => "fallback timeout",
        None => "unknown",
    };
    let at = report
        .revealed_at
        .map(format_millis)
        .unwrap_or_else(|| "?".to_string());
    format!("        {label}: revealed at {at} ({trigger})")
}

/// Format the per-page reveal simulation verdicts.
pub fn format_check_output(checks: &[PageCheck]) -> Vec<String> {
    let mut lines = Vec::new();
    for check in checks {
        lines.push(check.file.clone());
        let mut inventory = count(check.images, "image");
        if check.animations > 0 {
            inventory = format!(
                "{}, {}",
                inventory,
                count(check.animations, "animation player")
            );
        }
        if check.timeout_armed {
            inventory.push_str(", fallback timeout armed");
        }
        lines.push(format!("    {}", inventory));
        lines.push(format_report("settled", &check.settled));
        lines.push(format_report("starved", &check.starved));
    }

    let stuck = checks.iter().filter(|c| !c.ok()).count();
    if stuck == 0 {
        lines.push("All pages reveal".to_string());
    } else {
        lines.push(format!("{} would hang", count(stuck, "page")));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(checks: &[PageCheck]) {
    for line in format_check_output(checks) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
