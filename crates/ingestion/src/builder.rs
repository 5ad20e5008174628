//! Folds decoded rows into a lookup snapshot.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;
use zhvi_common::{RegionEntry, RegionKey, TimeSeriesRecord};

use crate::parser::RegionRow;

/// A complete region map, ready to be published to the store.
pub type Snapshot = HashMap<RegionKey, RegionEntry>;

/// What happened to a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDisposition {
    Inserted,
    /// The key was already present; the new row replaced it.
    Replaced,
    SkippedEmptyKey,
    SkippedPlaceholder,
    /// Padded key is not exactly five ASCII digits.
    SkippedInvalidKey,
    /// No date cell had a value.
    SkippedNoData,
}

/// Row counters for one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub rows_seen: u64,
    pub inserted: u64,
    pub replaced: u64,
    pub skipped_empty_key: u64,
    pub skipped_placeholder: u64,
    pub skipped_invalid_key: u64,
    pub skipped_no_data: u64,
    pub parse_errors: u64,
}

impl BuildStats {
    pub fn skipped(&self) -> u64 {
        self.skipped_empty_key
            + self.skipped_placeholder
            + self.skipped_invalid_key
            + self.skipped_no_data
    }
}

#[derive(Debug, Default)]
pub struct CacheBuilder {
    entries: Snapshot,
    stats: BuildStats,
}

impl CacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row. A later row for the same key overwrites the earlier one.
    pub fn push(&mut self, row: RegionRow) -> RowDisposition {
        self.stats.rows_seen += 1;
        let disposition = self.apply(row);
        match disposition {
            RowDisposition::Inserted => self.stats.inserted += 1,
            RowDisposition::Replaced => self.stats.replaced += 1,
            RowDisposition::SkippedEmptyKey => self.stats.skipped_empty_key += 1,
            RowDisposition::SkippedPlaceholder => self.stats.skipped_placeholder += 1,
            RowDisposition::SkippedInvalidKey => self.stats.skipped_invalid_key += 1,
            RowDisposition::SkippedNoData => self.stats.skipped_no_data += 1,
        }
        disposition
    }

    fn apply(&mut self, row: RegionRow) -> RowDisposition {
        let Some(padded) = row.region else {
            return RowDisposition::SkippedEmptyKey;
        };
        let Some(key) = RegionKey::from_padded(&padded) else {
            return RowDisposition::SkippedInvalidKey;
        };
        if key.is_placeholder() {
            return RowDisposition::SkippedPlaceholder;
        }

        let series: TimeSeriesRecord = row
            .points
            .into_iter()
            .filter_map(|(date, value)| value.map(|v| (date, v)))
            .collect();
        if series.is_empty() {
            return RowDisposition::SkippedNoData;
        }

        let entry = RegionEntry {
            metadata: row.metadata,
            series,
        };
        match self.entries.insert(key, entry) {
            None => RowDisposition::Inserted,
            Some(_) => {
                debug!(region = %padded, "Duplicate region row replaced earlier entry");
                RowDisposition::Replaced
            }
        }
    }

    pub fn record_parse_error(&mut self) {
        self.stats.parse_errors += 1;
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> (Snapshot, BuildStats) {
        (self.entries, self.stats)
    }
}
