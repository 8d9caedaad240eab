//! Content tree walking and per-entry dispatch.
//!
//! The walker visits every entry below the source root in a deterministic
//! pre-order (siblings sorted by file name), so a directory is always mirrored
//! before anything inside it is written. Each entry is classified by its
//! lowercased extension and routed to one pipeline:
//!
//! | Entry | Pipeline | Output |
//! |---|---|---|
//! | directory | [`create_output_dir`] | mirrored directory |
//! | `*.md` | [`render::render_file`] | mirrored path, extension `.html` |
//! | `*.jpg`, `*.jpeg` | [`downscale_jpeg`] | mirrored path, shrunk JPEG |
//! | anything else | [`copy_asset`] | mirrored path, identical bytes |
//!
//! Results are tallied in [`PublishStats`] and reported to the caller as
//! [`PublishEvent`]s as they happen. A failing entry is either logged and
//! skipped or ends the walk, depending on [`OnError`].

use crate::assets::{CopyError, copy_asset, create_output_dir, write_page};
use crate::config::{OnError, PublishConfig};
use crate::imaging::{
    BackendError, Dimensions, DownscaleConfig, ImageBackend, JPEG_EXTENSIONS, downscale_jpeg,
};
use crate::render::{self, RenderError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Why a single entry could not be published.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Image(#[from] BackendError),
}

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("walk aborted: {0}")]
    Aborted(#[from] walkdir::Error),
    #[error("failed to publish {}: {source}", path.display())]
    Entry {
        path: PathBuf,
        #[source]
        source: EntryError,
    },
}

/// How an entry is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Markdown,
    Image,
    Asset,
}

impl EntryKind {
    /// Classify by lowercased extension. Directories win regardless of name.
    pub fn classify(extension: &str, is_dir: bool) -> Self {
        if is_dir {
            Self::Directory
        } else if extension == "md" {
            Self::Markdown
        } else if JPEG_EXTENSIONS.contains(&extension) {
            Self::Image
        } else {
            Self::Asset
        }
    }
}

/// One entry found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path as found by the walker (source root included).
    pub path: PathBuf,
    /// Path relative to the source root.
    pub relative: PathBuf,
    /// Lowercased extension, empty if there is none.
    pub extension: String,
    pub kind: EntryKind,
}

impl SourceEntry {
    pub fn new(root: &Path, path: &Path, is_dir: bool) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        if relative.as_os_str().is_empty() {
            return None;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let kind = EntryKind::classify(&extension, is_dir);

        Some(Self {
            path: path.to_path_buf(),
            relative: relative.to_path_buf(),
            extension,
            kind,
        })
    }

    fn from_dir_entry(root: &Path, entry: &DirEntry) -> Option<Self> {
        Self::new(root, entry.path(), entry.file_type().is_dir())
    }

    /// Mirrored location under `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        let mirrored = output_root.join(&self.relative);
        match self.kind {
            EntryKind::Markdown => mirrored.with_extension("html"),
            _ => mirrored,
        }
    }
}

/// Something that happened while publishing.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishEvent {
    DirectoryCreated {
        output: PathBuf,
    },
    PageRendered {
        source: PathBuf,
        output: PathBuf,
        title: String,
    },
    ImageResized {
        source: PathBuf,
        output: PathBuf,
        original: Dimensions,
        resized: Dimensions,
    },
    AssetCopied {
        source: PathBuf,
        output: PathBuf,
        bytes: u64,
    },
    EntryFailed {
        source: PathBuf,
        error: String,
    },
}

/// An entry skipped because it failed to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntry {
    pub path: PathBuf,
    pub error: String,
}

/// Tally of one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishStats {
    pub markdown: usize,
    pub images: usize,
    pub assets: usize,
    pub directories: usize,
    pub failed: Vec<FailedEntry>,
}

impl PublishStats {
    /// Non-markdown files published: copied assets plus resized images.
    pub fn other_files(&self) -> usize {
        self.assets + self.images
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn record(&mut self, event: &PublishEvent) {
        match event {
            PublishEvent::DirectoryCreated { .. } => self.directories += 1,
            PublishEvent::PageRendered { .. } => self.markdown += 1,
            PublishEvent::ImageResized { .. } => self.images += 1,
            PublishEvent::AssetCopied { .. } => self.assets += 1,
            PublishEvent::EntryFailed { source, error } => self.failed.push(FailedEntry {
                path: source.clone(),
                error: error.clone(),
            }),
        }
    }
}

/// Settings shared by every dispatched entry.
struct Dispatcher<'a, B> {
    output_root: &'a Path,
    template_path: PathBuf,
    downscale: DownscaleConfig,
    backend: &'a B,
}

impl<B: ImageBackend> Dispatcher<'_, B> {
    fn dispatch(&self, entry: &SourceEntry) -> Result<PublishEvent, EntryError> {
        let output = entry.output_path(self.output_root);

        if entry.kind == EntryKind::Directory {
            create_output_dir(&output)?;
            return Ok(PublishEvent::DirectoryCreated { output });
        }

        if let Some(parent) = output.parent() {
            create_output_dir(parent)?;
        }

        let source = entry.path.clone();
        let event = match entry.kind {
            EntryKind::Markdown => {
                let page = render::render_file(&entry.path, &self.template_path)?;
                write_page(&output, page.html.as_bytes())?;
                PublishEvent::PageRendered {
                    source,
                    output,
                    title: page.title,
                }
            }
            EntryKind::Image => {
                let result = downscale_jpeg(self.backend, &entry.path, &output, &self.downscale)?;
                PublishEvent::ImageResized {
                    source,
                    output,
                    original: result.original,
                    resized: result.resized,
                }
            }
            EntryKind::Asset | EntryKind::Directory => {
                let bytes = copy_asset(&entry.path, &output)?;
                PublishEvent::AssetCopied {
                    source,
                    output,
                    bytes,
                }
            }
        };

        Ok(event)
    }
}

fn is_output_root(entry: &DirEntry, output_root: Option<&Path>) -> bool {
    let Some(output_root) = output_root else {
        return false;
    };
    entry.file_type().is_dir()
        && entry
            .path()
            .canonicalize()
            .is_ok_and(|path| path == output_root)
}

/// Publish every entry under `config.source` into `config.output`.
///
/// `on_event` is called once per entry, in walk order. Traversal errors always
/// end the walk; per-entry errors follow `config.on_error`. The output root
/// is only recognised inside the source if it exists when the walk starts;
/// [`crate::publish::publish`] creates it first.
pub fn publish_tree(
    config: &PublishConfig,
    backend: &impl ImageBackend,
    mut on_event: impl FnMut(&PublishEvent),
) -> Result<PublishStats, WalkError> {
    let dispatcher = Dispatcher {
        output_root: &config.output,
        template_path: config.template_path(),
        downscale: config.downscale(),
        backend,
    };
    let mut stats = PublishStats::default();

    // An existing output root nested inside the source is skipped, matched by
    // its resolved path so any spelling of it is caught.
    let output_root = config.output.canonicalize().ok();
    let walker = WalkDir::new(&config.source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_output_root(e, output_root.as_deref()));

    for entry in walker {
        let entry = entry?;
        let Some(source) = SourceEntry::from_dir_entry(&config.source, &entry) else {
            continue;
        };
        debug!(path = %source.path.display(), kind = ?source.kind, "dispatching");

        let event = match dispatcher.dispatch(&source) {
            Ok(event) => event,
            Err(error) if config.on_error == OnError::Skip => {
                warn!(path = %source.path.display(), %error, "skipping entry");
                PublishEvent::EntryFailed {
                    source: source.path,
                    error: error.to_string(),
                }
            }
            Err(error) => {
                return Err(WalkError::Entry {
                    path: source.path,
                    source: error,
                });
            }
        };

        stats.record(&event);
        on_event(&event);
    }

    Ok(stats)
}
