//! Data models for standings snapshots.
//!
//! This module contains the records parsed out of snapshot tables, the
//! descriptors used while resolving remote files, and the consolidated
//! document that gets written to disk.

use chrono::{DateTime, Local};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Format of the `updated` field in the output document.
pub const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of a standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// Position in the table (1-indexed).
    pub rank: u32,
    /// Ranking points.
    pub points: u32,
    /// Team identifier, taken verbatim from the table.
    pub tag: String,
}

/// Kind of an entry in a remote directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything else the host reports.
    #[serde(other)]
    Other,
}

/// A single item returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl RemoteEntry {
    #[allow(dead_code)] // Test and fake-source helper
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    #[allow(dead_code)] // Test and fake-source helper
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }
}

/// A dated snapshot file matched during resolution.
///
/// Field order matters: the derived ordering compares `(year, month, day)`
/// and falls back to the file name, so `max()` picks the latest publication.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotFile {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub name: String,
}

impl fmt::Display for SnapshotFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:04}-{:02}-{:02})",
            self.name, self.year, self.month, self.day
        )
    }
}

/// Consolidated standings for every configured region.
///
/// Serializes as a flat object: `updated` first, then one array per region
/// key in configured order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rankings {
    pub updated: DateTime<Local>,
    pub regions: Vec<(String, Vec<RankingEntry>)>,
}

impl Rankings {
    pub fn new(updated: DateTime<Local>) -> Self {
        Self {
            updated,
            regions: Vec::new(),
        }
    }

    /// Append a region's entries. Keys keep insertion order.
    pub fn insert(&mut self, key: impl Into<String>, entries: Vec<RankingEntry>) {
        self.regions.push((key.into(), entries));
    }

    /// Entries for a region key, if the region was collected.
    #[allow(dead_code)] // Lookup helper for callers that don't iterate
    pub fn region(&self, key: &str) -> Option<&[RankingEntry]> {
        self.regions
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entries)| entries.as_slice())
    }

    /// Timestamp rendered the way it appears in the output.
    pub fn updated_string(&self) -> String {
        self.updated.format(UPDATED_FORMAT).to_string()
    }

    /// Total number of entries across all regions.
    pub fn total_entries(&self) -> usize {
        self.regions.iter().map(|(_, entries)| entries.len()).sum()
    }
}

impl Serialize for Rankings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.regions.len() + 1))?;
        map.serialize_entry("updated", &self.updated_string())?;
        for (key, entries) in &self.regions {
            map.serialize_entry(key, entries)?;
        }
        map.end()
    }
}
