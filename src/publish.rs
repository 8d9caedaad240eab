//! Top-level publish run.
//!
//! Prepares the output root, copies the site stylesheet, then hands the source
//! tree to [`walk::publish_tree`]. Everything here is fatal: a failure before or
//! during traversal ends the run, whereas per-entry failures are handled by the
//! walker according to the configured policy.

use crate::assets::{self, CopyError};
use crate::config::PublishConfig;
use crate::imaging::{ImageBackend, RustBackend};
use crate::walk::{self, PublishEvent, PublishStats, WalkError};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

// `Error` is implemented by hand: the `source` field of `OverlappingRoots` is a
// path, which `#[derive(thiserror::Error)]` would mistake for the error source.
#[derive(Debug)]
pub enum PublishError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    OverlappingRoots { source: PathBuf, output: PathBuf },
    Stylesheet(CopyError),
    Walk(WalkError),
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishError::Io { path, source } => write!(
                f,
                "cannot create output directory {}: {source}",
                path.display()
            ),
            PublishError::OverlappingRoots { source, output } => write!(
                f,
                "source {} lies inside output {}; publishing would overwrite it",
                source.display(),
                output.display()
            ),
            PublishError::Stylesheet(err) => write!(f, "cannot copy stylesheet: {err}"),
            PublishError::Walk(err) => std::fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::Io { source, .. } => Some(source),
            PublishError::OverlappingRoots { .. } => None,
            PublishError::Stylesheet(err) => Some(err),
            PublishError::Walk(err) => std::error::Error::source(err),
        }
    }
}

impl From<CopyError> for PublishError {
    fn from(err: CopyError) -> Self {
        PublishError::Stylesheet(err)
    }
}

impl From<WalkError> for PublishError {
    fn from(err: WalkError) -> Self {
        PublishError::Walk(err)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub stats: PublishStats,
    pub elapsed: Duration,
}

/// Publish `config.source` into `config.output` using the pure-Rust image
/// backend.
pub fn publish(
    config: &PublishConfig,
    on_event: impl FnMut(&PublishEvent),
) -> Result<PublishReport, PublishError> {
    publish_with_backend(config, &RustBackend::new(), on_event)
}

pub fn publish_with_backend(
    config: &PublishConfig,
    backend: &impl ImageBackend,
    on_event: impl FnMut(&PublishEvent),
) -> Result<PublishReport, PublishError> {
    let started = Instant::now();

    prepare_output(&config.output)?;
    check_roots(&config.source, &config.output)?;
    let stylesheet = config.stylesheet_path();
    let bytes = assets::copy_asset(&stylesheet, &config.output.join("main.css"))?;
    info!(path = %stylesheet.display(), bytes, "copied stylesheet");

    info!(
        source = %config.source.display(),
        output = %config.output.display(),
        "walking content"
    );
    let stats = walk::publish_tree(config, backend, on_event)?;

    let elapsed = started.elapsed();
    info!(
        markdown = stats.markdown,
        other = stats.other_files(),
        failed = stats.failed.len(),
        ?elapsed,
        "publish finished"
    );

    Ok(PublishReport { stats, elapsed })
}

fn prepare_output(output: &Path) -> Result<(), PublishError> {
    assets::create_output_dir(output).map_err(|source| PublishError::Io {
        path: output.to_path_buf(),
        source,
    })
}

/// Reject a source that is the output root or lies inside it, however either
/// path is spelled. A missing source is left for the walker to report.
fn check_roots(source: &Path, output: &Path) -> Result<(), PublishError> {
    let Ok(source) = source.canonicalize() else {
        return Ok(());
    };
    let output = output.canonicalize().map_err(|e| PublishError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;

    if source.starts_with(&output) {
        return Err(PublishError::OverlappingRoots { source, output });
    }
    Ok(())
}
