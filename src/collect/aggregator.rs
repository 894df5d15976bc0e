//! Per-region collection of standings.
//!
//! Discovery failures (listing the standings root or the year directory)
//! abort collection. A region without a snapshot, or whose snapshot cannot
//! be fetched, ends up with an empty entry list and the run continues.

use crate::config::{Config, RegionConfig};
use crate::error::Result;
use crate::models::{RankingEntry, Rankings, SnapshotFile};
use crate::parser;
use crate::remote::SnapshotSource;
use crate::resolve::{resolve_latest_year, ResolvedSnapshot, YearListing};
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// What happened to a single region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionOutcome {
    /// A snapshot was fetched and parsed.
    Loaded { file: SnapshotFile, entries: usize },
    /// No snapshot matched the region for the year.
    NotFound,
    /// A snapshot was resolved but could not be downloaded.
    FetchFailed { reason: String },
}

impl RegionOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, RegionOutcome::Loaded { .. })
    }
}

/// Outcome of one region, with the region it belongs to.
#[derive(Debug, Clone)]
pub struct RegionReport {
    pub region: RegionConfig,
    pub outcome: RegionOutcome,
}

/// Result of a full collection run.
#[derive(Debug, Clone)]
pub struct Collection {
    pub year: u16,
    pub rankings: Rankings,
    pub regions: Vec<RegionReport>,
}

impl Collection {
    /// Regions that produced no entries because they were unavailable.
    pub fn unavailable(&self) -> impl Iterator<Item = &RegionReport> {
        self.regions.iter().filter(|r| !r.outcome.is_available())
    }
}

/// A region and the snapshot it would be read from.
#[derive(Debug, Clone)]
pub struct RegionPlan {
    pub region: RegionConfig,
    pub snapshot: Option<ResolvedSnapshot>,
}

/// Collects the latest standings for every configured region.
pub struct Aggregator<'a, S> {
    source: &'a S,
    config: &'a Config,
    progress: ProgressBar,
}

impl<'a, S: SnapshotSource> Aggregator<'a, S> {
    pub fn new(source: &'a S, config: &'a Config) -> Self {
        Self {
            source,
            config,
            progress: ProgressBar::hidden(),
        }
    }

    /// Show a progress bar that advances once per region.
    pub fn with_progress(mut self, show: bool) -> Self {
        if show {
            let pb = ProgressBar::new(self.config.regions.len() as u64);
            let template = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";
            if let Ok(style) = ProgressStyle::with_template(template) {
                pb.set_style(style.progress_chars("#>-"));
            }
            self.progress = pb;
        }
        self
    }

    /// The configured year, or the latest one published.
    pub async fn resolve_year(&self) -> Result<u16> {
        match self.config.source.year {
            Some(year) => {
                info!("Using pinned year {}", year);
                Ok(year)
            }
            None => resolve_latest_year(self.source, &self.config.source.standings_dir).await,
        }
    }

    /// Resolve every region's snapshot without downloading anything.
    pub async fn plan(&self) -> Result<(u16, Vec<RegionPlan>)> {
        let year = self.resolve_year().await?;
        let listing =
            YearListing::fetch(self.source, &self.config.source.standings_dir, year).await?;

        let plans = self
            .config
            .regions
            .iter()
            .map(|region| RegionPlan {
                region: region.clone(),
                snapshot: listing.resolve(self.source, &region.name),
            })
            .collect();

        Ok((year, plans))
    }

    /// Collect standings, stamping the document with the current time.
    pub async fn collect(&self) -> Result<Collection> {
        self.collect_at(Local::now()).await
    }

    /// Collect standings, stamping the document with `updated`.
    pub async fn collect_at(&self, updated: DateTime<Local>) -> Result<Collection> {
        let (year, plans) = self.plan().await?;
        info!("Collecting {} regions for {}", plans.len(), year);

        let mut rankings = Rankings::new(updated);
        let mut regions = Vec::with_capacity(plans.len());

        for plan in plans {
            self.progress.set_message(plan.region.key.clone());
            let (entries, outcome) = self.collect_region(&plan, year).await;
            rankings.insert(plan.region.key.clone(), entries);
            regions.push(RegionReport {
                region: plan.region,
                outcome,
            });
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        Ok(Collection {
            year,
            rankings,
            regions,
        })
    }

    async fn collect_region(
        &self,
        plan: &RegionPlan,
        year: u16,
    ) -> (Vec<RankingEntry>, RegionOutcome) {
        let region = &plan.region;
        let Some(ref snapshot) = plan.snapshot else {
            warn!(
                "No file found for {} ({}) in {}",
                region.key, region.name, year
            );
            return (Vec::new(), RegionOutcome::NotFound);
        };

        debug!("{}: latest snapshot is {}", region.key, snapshot.file);
        match self.source.fetch_text(&snapshot.url).await {
            Ok(content) => {
                let entries = parser::parse_table(&content);
                info!(
                    "{}: {} entries from {}",
                    region.key,
                    entries.len(),
                    snapshot.file.name
                );
                let outcome = RegionOutcome::Loaded {
                    file: snapshot.file.clone(),
                    entries: entries.len(),
                };
                (entries, outcome)
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", region.key, e);
                (
                    Vec::new(),
                    RegionOutcome::FetchFailed {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }
}
