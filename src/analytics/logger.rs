use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fetch log entry (JSONL activity log)
// ---------------------------------------------------------------------------

/// A single entry in the activity log (`~/.resonanze/fetch-log.jsonl`).
///
/// One entry is written per dashboard fetch attempt. Used by the reporter
/// for `resonanze history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchLogEntry {
    pub timestamp: String,
    pub endpoint: String,
    /// `"ok"` or `"failed"`.
    pub outcome: String,
    /// HTTP status, when the backend answered.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<u16>,
    pub latency_ms: u64,
    /// Failure kind (`network`, `status`, `malformed`, `missing_token`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl FetchLogEntry {
    pub fn success(endpoint: &str, status: u16, latency_ms: u64) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            endpoint: endpoint.to_string(),
            outcome: "ok".to_string(),
            status: Some(status),
            latency_ms,
            error: None,
        }
    }

    pub fn failure(endpoint: &str, latency_ms: u64, status: Option<u16>, kind: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            endpoint: endpoint.to_string(),
            outcome: "failed".to_string(),
            status,
            latency_ms,
            error: Some(kind.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == "ok"
    }
}

// ---------------------------------------------------------------------------
// Log file handle
// ---------------------------------------------------------------------------

/// Append-only JSONL log at a fixed path.
#[derive(Debug, Clone)]
pub struct FetchLog {
    path: PathBuf,
}

impl FetchLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry. Failures are swallowed: logging never breaks a fetch.
    pub fn record(&self, entry: &FetchLogEntry) {
        let _ = self.append(entry);
    }

    fn append(&self, entry: &FetchLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read all entries. Malformed lines are skipped; a missing file is empty.
    pub fn read_all(&self) -> Vec<FetchLogEntry> {
        let Ok(file) = fs::File::open(&self.path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<FetchLogEntry>(&line).ok())
            .collect()
    }

    /// The last `limit` entries, oldest first.
    pub fn read_recent(&self, limit: usize) -> Vec<FetchLogEntry> {
        let mut entries = self.read_all();
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
        entries
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> FetchLog {
        let dir = std::env::temp_dir().join(format!("resonanze-log-{}", std::process::id()));
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        FetchLog::new(path)
    }

    #[test]
    fn record_and_read_back() {
        let log = temp_log("roundtrip.jsonl");
        log.record(&FetchLogEntry::success("http://b/api", 204, 12));
        log.record(&FetchLogEntry::failure("http://b/api", 30, Some(500), "status"));

        let entries = log.read_all();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_success());
        assert_eq!(entries[0].status, Some(204));
        assert_eq!(entries[1].status, Some(500));
        assert_eq!(entries[1].error.as_deref(), Some("status"));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let log = temp_log("malformed.jsonl");
        log.record(&FetchLogEntry::success("e", 200, 1));
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "not json").unwrap();
        log.record(&FetchLogEntry::success("e", 200, 2));

        assert_eq!(log.read_all().len(), 2);
    }

    #[test]
    fn read_recent_keeps_tail() {
        let log = temp_log("recent.jsonl");
        for ms in 0..5 {
            log.record(&FetchLogEntry::success("e", 200, ms));
        }
        let recent = log.read_recent(2);
        assert_eq!(recent.iter().map(|e| e.latency_ms).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(log.read_recent(50).len(), 5);
    }

    #[test]
    fn missing_file_reads_empty() {
        let log = FetchLog::new("/nonexistent/resonanze/fetch-log.jsonl");
        assert!(log.read_all().is_empty());
    }

    #[test]
    fn failure_entry_omits_absent_status() {
        let entry = FetchLogEntry::failure("e", 5, None, "network");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("status"));
        assert!(json.contains("\"error\":\"network\""));
    }
}
