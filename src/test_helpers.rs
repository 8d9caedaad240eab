//! Shared test utilities for the klaus test suite.
//!
//! Provides a throwaway site layout (`content/`, `templates/`, `published/`)
//! and synthetic JPEG generation, so pipeline tests can run against a real
//! filesystem without any checked-in fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = setup_site();
//! write_file(site.content(), "hello.md", "---\ntitle: Hi\n---\n# Greeting\n");
//! create_test_jpeg(&site.content().join("pic.jpg"), 4000, 2000);
//!
//! let stats = publish_tree(&site.config(), &RustBackend::new(), |_| {}).unwrap();
//! assert_eq!(stats.markdown, 1);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::PublishConfig;
use image::{ExtendedColorType, ImageEncoder, RgbImage, codecs::jpeg::JpegEncoder};

/// Page template used by every fixture site.
pub const TEST_TEMPLATE: &str =
    "<html><head><title>{TITLE}</title></head><body>{BODY}</body></html>";

pub const TEST_STYLESHEET: &str = "body { margin: 0 auto; max-width: 40em; }\n";

// =========================================================================
// Fixture setup
// =========================================================================

/// A site rooted in a temp directory. Dropping it removes everything.
pub struct TestSite {
    tmp: TempDir,
    content: PathBuf,
}

impl TestSite {
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn content(&self) -> &Path {
        &self.content
    }

    pub fn published(&self) -> PathBuf {
        self.root().join("published")
    }

    /// Config pointing at this site with absolute paths and stock settings.
    pub fn config(&self) -> PublishConfig {
        PublishConfig {
            source: self.content.clone(),
            output: self.published(),
            templates: self.root().join("templates"),
            ..PublishConfig::default()
        }
    }
}

/// Create an empty `content/` plus the page template and stylesheet.
pub fn setup_site() -> TestSite {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    fs::create_dir(&content).unwrap();
    write_file(tmp.path(), "templates/main.html", TEST_TEMPLATE);
    write_file(tmp.path(), "templates/main.css", TEST_STYLESHEET);
    TestSite { tmp, content }
}

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

// =========================================================================
// Images
// =========================================================================

/// Write a gradient JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = fs::File::create(path).unwrap();
    JpegEncoder::new_with_quality(std::io::BufWriter::new(file), 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}
