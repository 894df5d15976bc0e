//! Discovery of the newest snapshot files.
//!
//! Snapshots live under `{standings_dir}/{year}/` and are named
//! `standings_{region}_{year}_{MM}_{DD}.md`. Resolution picks the largest
//! numeric year, then the latest `(month, day)` for each region.

use crate::error::{Result, SyncError};
use crate::models::{EntryKind, RemoteEntry, SnapshotFile};
use crate::remote::SnapshotSource;
use regex::Regex;
use tracing::{debug, warn};

/// Pick the largest purely numeric directory name.
///
/// Non-numeric directories are ignored with a warning. Files never count.
pub fn latest_year(entries: &[RemoteEntry]) -> Option<u16> {
    entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Dir)
        .filter_map(|entry| match parse_year(&entry.name) {
            Some(year) => Some(year),
            None => {
                warn!("Ignoring non-year directory: {}", entry.name);
                None
            }
        })
        .max()
}

fn parse_year(name: &str) -> Option<u16> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Resolve the latest year directory under `standings_dir`.
pub async fn resolve_latest_year<S: SnapshotSource>(
    source: &S,
    standings_dir: &str,
) -> Result<u16> {
    let entries = source.list_dir(standings_dir).await?;
    let year = latest_year(&entries).ok_or_else(|| {
        SyncError::NoData(format!("no year directories found under '{}'", standings_dir))
    })?;
    debug!("Latest year directory: {}", year);
    Ok(year)
}

/// Matches snapshot filenames for one region and year.
pub struct SnapshotPattern {
    year: u16,
    regex: Regex,
}

impl SnapshotPattern {
    pub fn new(region_name: &str, year: u16) -> Self {
        let pattern = format!(
            r"^standings_{}_{}_([0-9]{{2}})_([0-9]{{2}})\.md$",
            regex::escape(region_name),
            year
        );
        // Both interpolated parts are escaped or numeric, so the pattern is always valid.
        let regex = Regex::new(&pattern).expect("snapshot pattern is a valid regex");
        Self { year, regex }
    }

    /// Parse a filename into a snapshot descriptor if it matches.
    pub fn matches(&self, name: &str) -> Option<SnapshotFile> {
        let captures = self.regex.captures(name)?;
        let month: u8 = captures[1].parse().ok()?;
        let day: u8 = captures[2].parse().ok()?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(SnapshotFile {
            year: self.year,
            month,
            day,
            name: name.to_string(),
        })
    }
}

/// Select the newest snapshot for a region from a directory listing.
pub fn latest_snapshot(
    entries: &[RemoteEntry],
    region_name: &str,
    year: u16,
) -> Option<SnapshotFile> {
    let pattern = SnapshotPattern::new(region_name, year);
    entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .filter_map(|entry| pattern.matches(&entry.name))
        .max()
}

/// A resolved snapshot and where to download it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSnapshot {
    pub file: SnapshotFile,
    pub url: String,
}

/// Lists one year's directory and resolves snapshots from it.
///
/// The listing is fetched once and shared by every region of that year.
pub struct YearListing {
    year: u16,
    dir: String,
    entries: Vec<RemoteEntry>,
}

impl YearListing {
    /// List `{standings_dir}/{year}`. Failures here are fatal for the run.
    pub async fn fetch<S: SnapshotSource>(
        source: &S,
        standings_dir: &str,
        year: u16,
    ) -> Result<Self> {
        let dir = format!("{}/{}", standings_dir.trim_end_matches('/'), year);
        let entries = source.list_dir(&dir).await?;
        debug!("{} entries in {}", entries.len(), dir);
        Ok(Self { year, dir, entries })
    }

    /// Latest snapshot for a canonical region name, or `None` when the
    /// region has no matching file this year.
    pub fn resolve<S: SnapshotSource>(
        &self,
        source: &S,
        region_name: &str,
    ) -> Option<ResolvedSnapshot> {
        let file = latest_snapshot(&self.entries, region_name, self.year)?;
        let url = source.raw_url(&format!("{}/{}", self.dir, file.name));
        Some(ResolvedSnapshot { file, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::{FakeSource, RAW_BASE};
    use reqwest::StatusCode;

    fn files(names: &[&str]) -> Vec<RemoteEntry> {
        names.iter().map(|n| RemoteEntry::file(*n)).collect()
    }

    #[test]
    fn test_latest_year_picks_numeric_max() {
        let entries = vec![
            RemoteEntry::dir("2023"),
            RemoteEntry::dir("2025"),
            RemoteEntry::dir("2024"),
        ];
        assert_eq!(latest_year(&entries), Some(2025));
    }

    #[test]
    fn test_latest_year_ignores_noise() {
        let entries = vec![
            RemoteEntry::dir("2024"),
            RemoteEntry::dir("archive"),
            RemoteEntry::dir("2025-draft"),
            RemoteEntry::file("2030"),
        ];
        assert_eq!(latest_year(&entries), Some(2024));
    }

    #[test]
    fn test_latest_year_empty() {
        assert_eq!(latest_year(&[]), None);
        assert_eq!(latest_year(&files(&["README.md"])), None);
    }

    #[test]
    fn test_pattern_requires_exact_shape() {
        let pattern = SnapshotPattern::new("europe", 2024);
        let file = pattern.matches("standings_europe_2024_03_05.md").unwrap();
        assert_eq!((file.month, file.day), (3, 5));

        assert!(pattern.matches("standings_europe_2024_3_05.md").is_none());
        assert!(pattern.matches("standings_europe_2023_03_05.md").is_none());
        assert!(pattern.matches("standings_americas_2024_03_05.md").is_none());
        assert!(pattern.matches("standings_europe_2024_03_05.md.bak").is_none());
        assert!(pattern.matches("old_standings_europe_2024_03_05.md").is_none());
        assert!(pattern.matches("standings_europe_2024_13_01.md").is_none());
        assert!(pattern.matches("standings_europe_2024_00_10.md").is_none());
    }

    #[test]
    fn test_latest_snapshot_prefers_later_month() {
        let entries = files(&[
            "standings_europe_2024_03_05.md",
            "standings_europe_2024_11_02.md",
            "standings_europe_2024_09_30.md",
            "standings_asia_2024_12_01.md",
        ]);
        let latest = latest_snapshot(&entries, "europe", 2024).unwrap();
        assert_eq!(latest.name, "standings_europe_2024_11_02.md");
    }

    #[test]
    fn test_latest_snapshot_same_month_later_day() {
        let entries = files(&[
            "standings_global_2025_06_02.md",
            "standings_global_2025_06_16.md",
        ]);
        let latest = latest_snapshot(&entries, "global", 2025).unwrap();
        assert_eq!(latest.day, 16);
    }

    #[test]
    fn test_latest_snapshot_none_matching() {
        let entries = files(&["standings_europe_2024_03_05.md", "notes.md"]);
        assert!(latest_snapshot(&entries, "americas", 2024).is_none());
    }

    #[test]
    fn test_latest_snapshot_ignores_directories() {
        let entries = vec![RemoteEntry::dir("standings_europe_2024_12_31.md")];
        assert!(latest_snapshot(&entries, "europe", 2024).is_none());
    }

    #[tokio::test]
    async fn test_resolve_latest_year_from_source() {
        let source = FakeSource::default().with_dir(
            "live",
            vec![
                RemoteEntry::dir("2023"),
                RemoteEntry::dir("2024"),
                RemoteEntry::dir("2025"),
                RemoteEntry::file("README.md"),
            ],
        );
        assert_eq!(resolve_latest_year(&source, "live").await.unwrap(), 2025);
    }

    #[tokio::test]
    async fn test_resolve_latest_year_without_dirs_is_no_data() {
        let source = FakeSource::default().with_dir("live", files(&["README.md"]));
        let err = resolve_latest_year(&source, "live").await.unwrap_err();
        assert!(matches!(err, SyncError::NoData(_)));
    }

    #[tokio::test]
    async fn test_resolve_latest_year_transport_failure_propagates() {
        let source =
            FakeSource::default().with_failure("live", StatusCode::INTERNAL_SERVER_ERROR);
        let err = resolve_latest_year(&source, "live").await.unwrap_err();
        assert!(matches!(err, SyncError::RemoteAccess { .. }));
    }

    #[tokio::test]
    async fn test_year_listing_builds_raw_url() {
        let source = FakeSource::default().with_dir(
            "live/2024",
            files(&[
                "standings_europe_2024_03_05.md",
                "standings_europe_2024_11_02.md",
            ]),
        );
        let listing = YearListing::fetch(&source, "live", 2024).await.unwrap();
        let resolved = listing.resolve(&source, "europe").unwrap();
        assert_eq!(
            resolved.url,
            format!("{}/live/2024/standings_europe_2024_11_02.md", RAW_BASE)
        );
    }

    #[tokio::test]
    async fn test_year_listing_not_found_is_ok() {
        let source = FakeSource::default().with_dir("live/2024", Vec::new());
        let listing = YearListing::fetch(&source, "live", 2024).await.unwrap();
        assert!(listing.resolve(&source, "asia").is_none());
    }
}
