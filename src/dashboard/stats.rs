/// Dashboard statistics payload as returned by the backend.
///
/// The backend wraps the payload in `{ "data": { ... } }`. Every field of
/// the payload is optional on the wire: an absent key or an explicit `null`
/// resolves to the field's default here, once, so nothing downstream has to
/// re-check for missing data.
///
/// A field that is present with the wrong JSON type (e.g. `"weeklyData": 3`)
/// is a malformed body and fails deserialization as a whole.
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Response body of `GET /api/reports/dashboard-stats`.
#[derive(Debug, Deserialize)]
pub struct StatsEnvelope {
    pub data: DashboardStats,
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Pre-aggregated statistics for the current user. Read-only to the client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(deserialize_with = "null_as_default")]
    pub averages: Averages,
    #[serde(deserialize_with = "null_as_default")]
    pub exercise_progress: ExerciseProgress,
    #[serde(deserialize_with = "null_as_default")]
    pub prediction_distribution: LabelCounts,
    #[serde(deserialize_with = "null_as_default")]
    pub weekly_data: Vec<WeeklyPoint>,
    /// Report records, most recent last. Opaque apart from `findings`.
    #[serde(deserialize_with = "null_as_default")]
    pub recent_reports: Vec<Value>,
}

impl DashboardStats {
    /// The most recent report, if any.
    pub fn latest_report(&self) -> Option<&Value> {
        self.recent_reports.last()
    }
}

/// Mean voice metrics across recent sessions, in percent.
///
/// Kept as `Option` because a missing average renders differently from a
/// measured `0.0` (`"0%"` vs `"0.00%"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Averages {
    pub avg_jitter: Option<f64>,
    pub avg_shimmer: Option<f64>,
}

/// Exercise counts for the current period.
///
/// `total == 0` covers both an absent and a zero target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExerciseProgress {
    #[serde(deserialize_with = "null_as_default")]
    pub completed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
}

/// A single point of the weekly time series.
///
/// A missing metric stays `None` so the chart shows a gap rather than a
/// fabricated zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeeklyPoint {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    pub jitter: Option<f64>,
    pub shimmer: Option<f64>,
}

// ---------------------------------------------------------------------------
// Prediction histogram
// ---------------------------------------------------------------------------

/// Label -> count histogram in the key order of the JSON document.
///
/// Deserialized straight from the map entries so the order is the one the
/// backend wrote, independent of any map type's iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounts(Vec<(String, u64)>);

impl LabelCounts {
    pub fn new(entries: Vec<(String, u64)>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

impl<'de> Deserialize<'de> for LabelCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelCountsVisitor;

        impl<'de> Visitor<'de> for LabelCountsVisitor {
            type Value = LabelCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of prediction labels to non-negative counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LabelCounts, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, count)) = map.next_entry::<String, u64>()? {
                    entries.push((label, count));
                }
                Ok(LabelCounts(entries))
            }
        }

        deserializer.deserialize_map(LabelCountsVisitor)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Treat an explicit JSON `null` the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_object_resolves_to_defaults() {
        let envelope: StatsEnvelope = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert_eq!(envelope.data, DashboardStats::default());
        assert!(envelope.data.latest_report().is_none());
    }

    #[test]
    fn null_fields_resolve_to_defaults() {
        let json = r#"{
            "averages": null,
            "exerciseProgress": { "completed": null, "total": 4 },
            "predictionDistribution": null,
            "weeklyData": null,
            "recentReports": null
        }"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.averages, Averages::default());
        assert_eq!(stats.exercise_progress.completed, 0);
        assert_eq!(stats.exercise_progress.total, 4);
        assert!(stats.prediction_distribution.is_empty());
        assert!(stats.weekly_data.is_empty());
        assert!(stats.recent_reports.is_empty());
    }

    #[test]
    fn full_payload_parses() {
        let json = r#"{
            "averages": { "avgJitter": 1.25, "avgShimmer": 3.5 },
            "exerciseProgress": { "completed": 2, "total": 9 },
            "predictionDistribution": { "Normal": 3, "Nodule": 1 },
            "weeklyData": [
                { "date": "2025-03-07T00:00:00.000Z", "jitter": 1.1, "shimmer": 3.2 }
            ],
            "recentReports": [ { "findings": "old" }, { "findings": "new" } ]
        }"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.averages.avg_jitter, Some(1.25));
        assert_eq!(stats.averages.avg_shimmer, Some(3.5));
        assert_eq!(stats.exercise_progress, ExerciseProgress { completed: 2, total: 9 });
        assert_eq!(stats.prediction_distribution.total(), 4);
        assert_eq!(stats.weekly_data[0].jitter, Some(1.1));
        assert_eq!(stats.latest_report().unwrap()["findings"], "new");
    }

    #[test]
    fn label_counts_keep_document_order() {
        let json = r#"{ "predictionDistribution": { "Zeta": 1, "Alpha": 2, "Mid": 0 } }"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        let labels: Vec<&str> = stats.prediction_distribution.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn weekly_point_missing_metric_is_gap() {
        let json = r#"{ "weeklyData": [ { "date": "2025-03-07", "jitter": 0.8 } ] }"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.weekly_data[0].shimmer, None);
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        assert!(serde_json::from_str::<DashboardStats>(r#"{ "weeklyData": 3 }"#).is_err());
        assert!(
            serde_json::from_str::<DashboardStats>(r#"{ "predictionDistribution": { "A": -1 } }"#)
                .is_err()
        );
    }

    #[test]
    fn envelope_without_data_is_malformed() {
        assert!(serde_json::from_str::<StatsEnvelope>(r#"{}"#).is_err());
    }
}
