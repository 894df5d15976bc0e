//! Access to the repository that publishes standings snapshots.
//!
//! [`SnapshotSource`] is the seam between discovery logic and the network:
//! the GitHub client implements it for real runs, tests use an in-memory
//! fake.

pub mod github;

pub use github::GithubSource;

use crate::error::Result;
use crate::models::RemoteEntry;

/// A remote tree of standings files.
#[allow(async_fn_in_trait)] // Only used through generics on a single runtime
pub trait SnapshotSource {
    /// List the entries of a directory, relative to the repository root.
    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Absolute URL of a file's raw content.
    fn raw_url(&self, path: &str) -> String;

    /// Fetch the body at an absolute URL as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
