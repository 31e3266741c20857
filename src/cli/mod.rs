//! CLI command implementations for resonanze.
//!
//! Provides subcommand handlers for:
//! - `resonanze dashboard` — fetch and render the dashboard
//! - `resonanze findings [TEXT]` — clean a findings text
//! - `resonanze history` — fetch activity summary
//! - `resonanze config show|init|set|reset` — configuration management

use std::io::Read;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::logger::{FetchLog, FetchLogEntry};
use crate::analytics::reporter::{self, FetchSummary};
use crate::config;
use crate::dashboard::derive::MetricStatus;
use crate::dashboard::view::MetricGauge;
use crate::dashboard::{self, DashboardClient, DashboardState, DashboardView, findings};

/// Output format for commands that print data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Width of the text progress bars.
const BAR_WIDTH: usize = 30;

// ---------------------------------------------------------------------------
// resonanze dashboard
// ---------------------------------------------------------------------------

/// Fetch the dashboard once and render it.
///
/// A failed fetch prints the failure state and still exits successfully:
/// the failure is a display state, not a process error.
pub fn run_dashboard(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let client = DashboardClient::new(&config::client_options(&cfg));
    let auth = config::auth_context(&cfg);

    let state = dashboard::load(&client, &auth);

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&state).context("failed to serialize dashboard")?;
            println!("{json}");
        }
        OutputFormat::Table => match &state {
            DashboardState::Loaded(view) => print_dashboard_table(view),
            DashboardState::Loading | DashboardState::Failed => {
                println!("{}", dashboard::FAILED_MESSAGE.red().bold());
                println!(
                    "  {}",
                    format!("endpoint: {}", client.endpoint()).dimmed()
                );
            }
        },
    }

    Ok(())
}

fn print_dashboard_table(view: &DashboardView) {
    println!("{}", view.greeting.bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    // Voice stability
    println!("{}", "Voice Stability".bold());
    print_gauge(&view.stability.jitter);
    print_gauge(&view.stability.shimmer);
    println!();

    // Exercises
    println!("{}", "Exercise Progress".bold());
    println!(
        "  {:<10} {} {}",
        "Completed",
        progress_bar(view.exercises.ratio),
        view.exercises.display
    );
    println!();

    // Prediction distribution
    println!("{}", "Prediction Distribution".bold());
    if view.distribution.is_empty() {
        println!("  {}", "No predictions yet.".dimmed());
    } else {
        let total: u64 = view.distribution.iter().map(|s| s.value).sum();
        for slice in &view.distribution {
            let pct = if total == 0 {
                0.0
            } else {
                slice.value as f64 / total as f64 * 100.0
            };
            println!(
                "  {:<20} {:>5} {:>6.1}%  {}",
                truncate(&slice.name, 20),
                slice.value,
                pct,
                slice.color.dimmed()
            );
        }
    }
    println!();

    // Weekly series
    println!("{}", "Weekly Progress".bold());
    if view.weekly.is_empty() {
        println!("  {}", "No sessions this week.".dimmed());
    } else {
        println!(
            "  {:<8} {:>10} {:>10}",
            "Date".dimmed(),
            "Jitter".dimmed(),
            "Shimmer".dimmed()
        );
        for point in &view.weekly.points {
            println!(
                "  {:<8} {:>10} {:>10}",
                point.tick,
                format_optional(point.jitter),
                format_optional(point.shimmer)
            );
        }
    }
    println!();

    // Latest findings
    println!("{}", "Latest AI Findings".bold());
    if view.latest_findings.is_empty() {
        println!("  {}", "No reports yet.".dimmed());
    } else {
        for line in view.latest_findings.lines() {
            println!("  {line}");
        }
    }
    println!();
    println!(
        "  {}",
        format!("{} recent report(s)", view.report_count).dimmed()
    );
}

fn print_gauge(gauge: &MetricGauge) {
    println!(
        "  {:<10} {} {:>7}  {}",
        gauge.label,
        progress_bar(gauge.ratio),
        gauge.display,
        colorize_status(gauge.status)
    );
}

// ---------------------------------------------------------------------------
// resonanze findings
// ---------------------------------------------------------------------------

/// Clean a findings text given inline or on stdin.
pub fn run_findings(text: Option<String>) -> Result<()> {
    let raw = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read findings from stdin")?;
            buf
        }
    };

    println!("{}", findings::clean_findings(&raw));
    Ok(())
}

// ---------------------------------------------------------------------------
// resonanze history
// ---------------------------------------------------------------------------

/// Show the most recent fetch attempts and a summary.
pub fn run_history(limit: usize, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let log = FetchLog::new(config::expand_home(&cfg.logging.path));
    let entries = log.read_recent(limit);

    if entries.is_empty() {
        println!(
            "{}",
            "No fetches logged yet. Run `resonanze dashboard` first.".yellow()
        );
        return Ok(());
    }

    let summary = reporter::summarize(&entries);

    match format {
        OutputFormat::Json => print_history_json(&entries, &summary)?,
        OutputFormat::Table => print_history_table(&entries, &summary),
    }

    Ok(())
}

fn print_history_table(entries: &[FetchLogEntry], summary: &FetchSummary) {
    println!("{}", "Dashboard Fetch History".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    println!("  {} {}", "Fetches:     ".bold(), summary.total);
    println!(
        "  {} {:.1}%",
        "Success rate:".bold(),
        summary.success_pct()
    );
    println!("  {} {} ms", "Avg latency: ".bold(), summary.avg_latency_ms);
    for (kind, count) in &summary.failures_by_kind {
        println!("  {} {kind} x{count}", "Failure:     ".bold());
    }
    println!();

    println!(
        "  {:<27} {:<8} {:>6} {:>8}  {}",
        "Timestamp".dimmed(),
        "Outcome".dimmed(),
        "Status".dimmed(),
        "Latency".dimmed(),
        "Error".dimmed()
    );
    for entry in entries {
        let outcome = if entry.is_success() {
            entry.outcome.green()
        } else {
            entry.outcome.red()
        };
        println!(
            "  {:<27} {:<8} {:>6} {:>6}ms  {}",
            truncate(&entry.timestamp, 27),
            outcome,
            entry.status.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
            entry.latency_ms,
            entry.error.as_deref().unwrap_or("")
        );
    }
}

fn print_history_json(entries: &[FetchLogEntry], summary: &FetchSummary) -> Result<()> {
    let json = serde_json::json!({
        "summary": {
            "total": summary.total,
            "succeeded": summary.succeeded,
            "failed": summary.failed,
            "success_pct": summary.success_pct(),
            "avg_latency_ms": summary.avg_latency_ms,
            "failures_by_kind": summary.failures_by_kind,
        },
        "entries": entries,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// resonanze config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective resonanze Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.resonanze/config.toml");
    print_source(project_exists, ".resonanze.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "RESONANZE_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.resonanze/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Set backend.base_url and auth.token_file to get started.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Text bar for a ratio in `[0, 100]`.
fn progress_bar(ratio: f64) -> String {
    let filled = ((ratio / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled).magenta(),
        "░".repeat(BAR_WIDTH - filled).dimmed()
    )
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}%")).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn colorize_status(status: MetricStatus) -> colored::ColoredString {
    match status {
        MetricStatus::Normal => "normal".green(),
        MetricStatus::Elevated => "elevated".yellow(),
        MetricStatus::Unknown => "unknown".dimmed(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
