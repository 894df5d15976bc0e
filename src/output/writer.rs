//! JSON rendering of collected rankings.

use crate::error::{Result, SyncError};
use crate::models::Rankings;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Render rankings as indented JSON.
pub fn render_rankings(rankings: &Rankings) -> Result<String> {
    serde_json::to_string_pretty(rankings).map_err(Into::into)
}

/// Write rankings to `path`, replacing any existing file.
///
/// Missing parent directories are created.
pub fn write_rankings(rankings: &Rankings, path: &Path) -> Result<()> {
    let content = render_rankings(rankings)?;
    let io_err = |source| SyncError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut file = std::fs::File::create(path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.write_all(b"\n").map_err(io_err)?;

    debug!("Wrote {} bytes to {}", content.len() + 1, path.display());
    Ok(())
}
