//! CLI output formatting for a publish run.
//!
//! # Output Format
//!
//! ```text
//! Ich bin Klaus v0.2.0
//! Processing file: content/hello.md
//! Processing file: content/a/b/c.md
//! Publish complete. Published 2 markdown files and 3 other files. Time: 12.48ms
//! ```
//!
//! Entries that failed under the skip policy are listed on stderr after the
//! summary:
//!
//! ```text
//! 1 entry failed:
//!     content/bad.md: markdown files must start with a preamble ...
//! ```
//!
//! # Architecture
//!
//! Each line has a `format_*` function for testability and a `print_*`
//! wrapper that writes it out. Format functions are pure: no I/O, no side
//! effects.

use crate::walk::{FailedEntry, PublishEvent, PublishStats};
use std::time::Duration;

pub fn format_banner(version: &str) -> String {
    format!("Ich bin Klaus v{version}")
}

/// Progress line for a single event, if it gets one.
///
/// Only rendered pages are announced; images, assets and directories are
/// counted silently, and failures are reported through logging and
/// [`format_failures`].
pub fn format_event(event: &PublishEvent) -> Option<String> {
    match event {
        PublishEvent::PageRendered { source, .. } => {
            Some(format!("Processing file: {}", source.display()))
        }
        _ => None,
    }
}

pub fn format_summary(stats: &PublishStats, elapsed: Duration) -> String {
    format!(
        "Publish complete. Published {} markdown files and {} other files. Time: {:?}",
        stats.markdown,
        stats.other_files(),
        elapsed
    )
}

pub fn format_failures(failed: &[FailedEntry]) -> Vec<String> {
    if failed.is_empty() {
        return Vec::new();
    }

    let noun = if failed.len() == 1 { "entry" } else { "entries" };
    let mut lines = vec![format!("{} {} failed:", failed.len(), noun)];
    lines.extend(
        failed
            .iter()
            .map(|f| format!("    {}: {}", f.path.display(), f.error)),
    );
    lines
}

pub fn print_banner(version: &str) {
    println!("{}", format_banner(version));
}

pub fn print_event(event: &PublishEvent) {
    if let Some(line) = format_event(event) {
        println!("{line}");
    }
}

pub fn print_summary(stats: &PublishStats, elapsed: Duration) {
    println!("{}", format_summary(stats, elapsed));
}

pub fn print_failures(failed: &[FailedEntry]) {
    for line in format_failures(failed) {
        eprintln!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use std::path::PathBuf;

    #[test]
    fn banner_includes_version() {
        assert_eq!(format_banner("0.2.0"), "Ich bin Klaus v0.2.0");
    }

    #[test]
    fn page_event_is_announced() {
        let event = PublishEvent::PageRendered {
            source: PathBuf::from("content/hello.md"),
            output: PathBuf::from("published/hello.html"),
            title: "Hi".into(),
        };
        assert_eq!(
            format_event(&event).as_deref(),
            Some("Processing file: content/hello.md")
        );
    }

    #[test]
    fn other_events_are_silent() {
        let events = [
            PublishEvent::DirectoryCreated {
                output: PathBuf::from("published/a"),
            },
            PublishEvent::AssetCopied {
                source: PathBuf::from("content/x.bin"),
                output: PathBuf::from("published/x.bin"),
                bytes: 3,
            },
            PublishEvent::ImageResized {
                source: PathBuf::from("content/p.jpg"),
                output: PathBuf::from("published/p.jpg"),
                original: Dimensions::from((4000, 2000)),
                resized: Dimensions::from((1000, 500)),
            },
            PublishEvent::EntryFailed {
                source: PathBuf::from("content/bad.md"),
                error: "boom".into(),
            },
        ];
        for event in &events {
            assert_eq!(format_event(event), None, "{event:?}");
        }
    }

    #[test]
    fn summary_counts_images_as_other_files() {
        let stats = PublishStats {
            markdown: 2,
            images: 1,
            assets: 2,
            directories: 4,
            failed: Vec::new(),
        };
        assert_eq!(
            format_summary(&stats, Duration::from_millis(1500)),
            "Publish complete. Published 2 markdown files and 3 other files. Time: 1.5s"
        );
    }

    #[test]
    fn summary_with_nothing_published() {
        let line = format_summary(&PublishStats::default(), Duration::from_micros(250));
        assert_eq!(
            line,
            "Publish complete. Published 0 markdown files and 0 other files. Time: 250µs"
        );
    }

    #[test]
    fn failures_empty() {
        assert!(format_failures(&[]).is_empty());
    }

    #[test]
    fn failures_listed_with_count() {
        let failed = vec![
            FailedEntry {
                path: PathBuf::from("content/bad.md"),
                error: "missing preamble".into(),
            },
            FailedEntry {
                path: PathBuf::from("content/broken.jpg"),
                error: "decode".into(),
            },
        ];
        assert_eq!(
            format_failures(&failed),
            vec![
                "2 entries failed:",
                "    content/bad.md: missing preamble",
                "    content/broken.jpg: decode",
            ]
        );
    }

    #[test]
    fn single_failure_uses_singular() {
        let failed = vec![FailedEntry {
            path: PathBuf::from("a.md"),
            error: "x".into(),
        }];
        assert_eq!(format_failures(&failed)[0], "1 entry failed:");
    }
}
