/// Presentation-ready dashboard values.
///
/// [`DashboardView::build`] is a pure function of the stats payload and the
/// auth context; the presentation layers (CLI, web) only format what it
/// returns.
use serde::Serialize;

use super::chart::{self, ChartSlice, WeeklyChart};
use super::derive::{self, MetricStatus};
use super::findings;
use super::stats::DashboardStats;
use crate::auth::AuthContext;

/// A single voice metric gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGauge {
    pub label: &'static str,
    pub value: Option<f64>,
    /// Formatted value, e.g. `"1.25%"`.
    pub display: String,
    /// Bar width in `[0, 100]`.
    pub ratio: f64,
    pub status: MetricStatus,
}

/// Jitter and shimmer gauges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceStability {
    pub jitter: MetricGauge,
    pub shimmer: MetricGauge,
}

/// Exercise progress gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseGauge {
    pub completed: u64,
    pub target: u64,
    /// `"completed/target"`.
    pub display: String,
    /// Bar width in `[0, 100]`.
    pub ratio: f64,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub greeting: String,
    pub stability: VoiceStability,
    pub exercises: ExerciseGauge,
    pub distribution: Vec<ChartSlice>,
    pub weekly: WeeklyChart,
    /// Cleaned findings of the most recent report.
    pub latest_findings: String,
    pub report_count: usize,
}

impl DashboardView {
    pub fn build(stats: &DashboardStats, auth: &AuthContext) -> Self {
        let averages = stats.averages;
        let progress = stats.exercise_progress;

        Self {
            greeting: greeting(auth.full_name.as_deref()),
            stability: VoiceStability {
                jitter: MetricGauge {
                    label: "Jitter",
                    value: averages.avg_jitter,
                    display: derive::metric_label(averages.avg_jitter),
                    ratio: derive::jitter_ratio(averages.avg_jitter),
                    status: MetricStatus::for_jitter(averages.avg_jitter),
                },
                shimmer: MetricGauge {
                    label: "Shimmer",
                    value: averages.avg_shimmer,
                    display: derive::metric_label(averages.avg_shimmer),
                    ratio: derive::shimmer_ratio(averages.avg_shimmer),
                    status: MetricStatus::for_shimmer(averages.avg_shimmer),
                },
            },
            exercises: ExerciseGauge {
                completed: progress.completed,
                target: derive::display_target(progress.total),
                display: derive::exercise_label(progress.completed, progress.total),
                ratio: derive::completion_ratio(progress.completed, progress.total),
            },
            distribution: chart::distribution_series(&stats.prediction_distribution),
            weekly: chart::weekly_chart(&stats.weekly_data),
            latest_findings: findings::report_findings(stats.latest_report()),
            report_count: stats.recent_reports.len(),
        }
    }
}

fn greeting(full_name: Option<&str>) -> String {
    match full_name {
        Some(name) => format!("Welcome back, {name}"),
        None => "Welcome back".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;

    #[test]
    fn empty_stats_build_zeroed_view() {
        let auth = AuthContext::new(StaticToken::new("t"));
        let view = DashboardView::build(&DashboardStats::default(), &auth);

        assert_eq!(view.greeting, "Welcome back");
        assert_eq!(view.stability.jitter.ratio, 0.0);
        assert_eq!(view.stability.jitter.display, "0%");
        assert_eq!(view.stability.shimmer.ratio, 0.0);
        assert_eq!(view.stability.shimmer.status, MetricStatus::Unknown);
        assert_eq!(view.exercises.ratio, 0.0);
        assert_eq!(view.exercises.display, "0/9");
        assert!(view.distribution.is_empty());
        assert!(view.weekly.is_empty());
        assert_eq!(view.latest_findings, "");
        assert_eq!(view.report_count, 0);
    }

    #[test]
    fn greeting_uses_full_name() {
        let auth = AuthContext::new(StaticToken::new("t")).with_user(None, Some("Ada Lovelace".into()));
        let view = DashboardView::build(&DashboardStats::default(), &auth);
        assert_eq!(view.greeting, "Welcome back, Ada Lovelace");
    }
}
