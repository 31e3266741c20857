/// Derived display values: progress ratios, metric labels, range status.
///
/// Every ratio returned from this module is already clamped into
/// `[0, 100]` and is safe to use directly as a percentage width.
use serde::Serialize;

// ---------------------------------------------------------------------------
// Scale constants
// ---------------------------------------------------------------------------

/// Jitter value (percent) drawn as a full bar.
pub const JITTER_SCALE_CEILING: f64 = 3.0;

/// Shimmer value (percent) drawn as a full bar.
pub const SHIMMER_SCALE_CEILING: f64 = 100.0;

/// Upper bound of the normal jitter range, percent.
pub const JITTER_NORMAL_MAX: f64 = 2.2;

/// Upper bound of the normal shimmer range, percent.
pub const SHIMMER_NORMAL_MAX: f64 = 3.81;

/// Exercise target shown when the backend reports none.
pub const DEFAULT_EXERCISE_TARGET: u64 = 9;

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// Clamp a value into `[0, 100]`. `NaN` becomes `0`.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Jitter progress: `avg / 3 * 100`, capped at 100. Missing -> 0.
pub fn jitter_ratio(avg_jitter: Option<f64>) -> f64 {
    scaled_ratio(avg_jitter, JITTER_SCALE_CEILING)
}

/// Shimmer progress: `avg / 100 * 100`, capped at 100. Missing -> 0.
pub fn shimmer_ratio(avg_shimmer: Option<f64>) -> f64 {
    scaled_ratio(avg_shimmer, SHIMMER_SCALE_CEILING)
}

/// Exercise completion: `completed / total * 100`. A zero total yields 0.
pub fn completion_ratio(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    clamp_percent(completed as f64 / total as f64 * 100.0)
}

fn scaled_ratio(value: Option<f64>, ceiling: f64) -> f64 {
    match value {
        // Already on the percent scale; `v / 100 * 100` would only add rounding.
        Some(v) if ceiling == 100.0 => clamp_percent(v),
        Some(v) => clamp_percent(v / ceiling * 100.0),
        None => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Metric label with two decimals, e.g. `"1.25%"`. Missing renders `"0%"`.
pub fn metric_label(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "0%".to_string(),
    }
}

/// Exercise counter label, e.g. `"2/9"`.
pub fn exercise_label(completed: u64, total: u64) -> String {
    format!("{completed}/{}", display_target(total))
}

/// Target shown to the user; falls back to [`DEFAULT_EXERCISE_TARGET`].
pub fn display_target(total: u64) -> u64 {
    if total == 0 {
        DEFAULT_EXERCISE_TARGET
    } else {
        total
    }
}

// ---------------------------------------------------------------------------
// Normal-range status
// ---------------------------------------------------------------------------

/// Whether a metric falls inside its clinical normal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Normal,
    Elevated,
    Unknown,
}

impl MetricStatus {
    fn against(value: Option<f64>, normal_max: f64) -> Self {
        match value {
            Some(v) if v.is_nan() => Self::Unknown,
            Some(v) if v <= normal_max => Self::Normal,
            Some(_) => Self::Elevated,
            None => Self::Unknown,
        }
    }

    pub fn for_jitter(value: Option<f64>) -> Self {
        Self::against(value, JITTER_NORMAL_MAX)
    }

    pub fn for_shimmer(value: Option<f64>) -> Self {
        Self::against(value, SHIMMER_NORMAL_MAX)
    }
}

impl std::fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Elevated => write!(f, "elevated"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
