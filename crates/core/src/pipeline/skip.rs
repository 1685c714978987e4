//! Skip accounting for a pipeline run.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::metrics;

/// Why a media item was left out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoMatchingProfile,
    NotMonitored,
    MissingFolderPath,
    MediaNotFound,
}

impl SkipReason {
    /// All reasons in reporting order.
    pub const ALL: [SkipReason; 4] = [
        SkipReason::NoMatchingProfile,
        SkipReason::NotMonitored,
        SkipReason::MissingFolderPath,
        SkipReason::MediaNotFound,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::NoMatchingProfile => "no_matching_profile",
            SkipReason::NotMonitored => "not_monitored",
            SkipReason::MissingFolderPath => "missing_folder_path",
            SkipReason::MediaNotFound => "media_not_found",
        }
    }

    /// Human readable form, e.g. "no matching profile".
    pub fn description(self) -> String {
        self.as_str().replace('_', " ")
    }

    fn index(self) -> usize {
        match self {
            SkipReason::NoMatchingProfile => 0,
            SkipReason::NotMonitored => 1,
            SkipReason::MissingFolderPath => 2,
            SkipReason::MediaNotFound => 3,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Titles skipped during one run, bucketed by reason.
///
/// Write-only while grouping, read when summarizing. Never drives control flow.
#[derive(Debug, Clone, Default)]
pub struct SkipLedger {
    buckets: [Vec<String>; 4],
}

impl SkipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reason: SkipReason, title: &str) {
        metrics::MEDIA_SKIPPED
            .with_label_values(&[reason.as_str()])
            .inc();
        self.buckets[reason.index()].push(title.to_string());
    }

    pub fn titles(&self, reason: SkipReason) -> &[String] {
        &self.buckets[reason.index()]
    }

    pub fn count(&self, reason: SkipReason) -> usize {
        self.buckets[reason.index()].len()
    }

    /// Total skipped titles across all buckets.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn summarize(&self, total_scanned: usize, download_count: usize) -> SkipSummary {
        SkipSummary {
            total_scanned,
            total_skipped: self.total(),
            download_count,
            by_reason: SkipReason::ALL
                .iter()
                .map(|&reason| (reason, self.count(reason)))
                .collect(),
        }
    }
}

/// Counts derived from a [`SkipLedger`] after grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipSummary {
    pub total_scanned: usize,
    pub total_skipped: usize,
    pub download_count: usize,
    pub by_reason: Vec<(SkipReason, usize)>,
}

impl SkipSummary {
    /// Per-bucket counts at debug, one aggregate line at info.
    pub fn log(&self) {
        for (reason, count) in &self.by_reason {
            debug!("Skipped {} titles - {}", count, reason.description());
        }
        info!(
            "Total {} media items checked. Skipped: {}, Download needed: {}",
            self.total_scanned, self.total_skipped, self.download_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_text() {
        assert_eq!(SkipReason::NoMatchingProfile.as_str(), "no_matching_profile");
        assert_eq!(
            SkipReason::MissingFolderPath.description(),
            "missing folder path"
        );
        assert_eq!(SkipReason::MediaNotFound.to_string(), "media_not_found");
    }

    #[test]
    fn test_ledger_buckets() {
        let mut ledger = SkipLedger::new();
        ledger.record(SkipReason::NotMonitored, "Alien");
        ledger.record(SkipReason::NotMonitored, "Aliens");
        ledger.record(SkipReason::MediaNotFound, "Alien 3");

        assert_eq!(ledger.titles(SkipReason::NotMonitored), ["Alien", "Aliens"]);
        assert_eq!(ledger.count(SkipReason::MediaNotFound), 1);
        assert_eq!(ledger.count(SkipReason::NoMatchingProfile), 0);
        assert_eq!(ledger.total(), 3);
    }

    #[test]
    fn test_summary() {
        let mut ledger = SkipLedger::new();
        ledger.record(SkipReason::NoMatchingProfile, "Cats");
        ledger.record(SkipReason::MissingFolderPath, "Dune");

        let summary = ledger.summarize(10, 7);
        assert_eq!(summary.total_scanned, 10);
        assert_eq!(summary.total_skipped, 2);
        assert_eq!(summary.download_count, 7);
        assert_eq!(
            summary.by_reason,
            vec![
                (SkipReason::NoMatchingProfile, 1),
                (SkipReason::NotMonitored, 0),
                (SkipReason::MissingFolderPath, 1),
                (SkipReason::MediaNotFound, 0),
            ]
        );
        summary.log();
    }
}
