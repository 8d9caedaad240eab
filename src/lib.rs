//! # Klaus
//!
//! A tiny static site publisher. Point it at a directory and it mirrors the
//! whole tree into an output directory, transforming two kinds of file on the
//! way:
//!
//! - **Markdown** (`.md`) with a YAML preamble is rendered to HTML and wrapped
//!   in a page template (`templates/main.html`, placeholders `{TITLE}` and
//!   `{BODY}`). The output keeps the path, with the extension `.html`.
//! - **JPEG** (`.jpg`, `.jpeg`) is shrunk to fit a square bounding box
//!   (1000px by default), keeping its aspect ratio.
//!
//! Everything else is copied byte for byte, and `templates/main.css` lands at
//! the output root.
//!
//! ```text
//! content/                      published/
//! ├── hello.md          →       ├── hello.html
//! ├── photos/pic.jpg    →       ├── photos/pic.jpg
//! └── data/file.bin     →       ├── data/file.bin
//!                               └── main.css
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`publish`] | Run entry point: prepares the output root, copies the stylesheet, walks |
//! | [`walk`] | Pre-order traversal, classification and per-entry dispatch |
//! | [`render`] | Preamble parsing, markdown to HTML, template substitution |
//! | [`imaging`] | Bounded-box JPEG downscaling behind a swappable backend |
//! | [`assets`] | Byte-for-byte copies, output directories and page writes |
//! | [`config`] | `klaus.toml` loading, merging onto defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Failure Handling
//!
//! A broken entry (a page without a preamble, a corrupt JPEG) does not stop
//! the run by default: it is logged, recorded in
//! [`walk::PublishStats::failed`], and the walk moves on. Set
//! `on_error = "abort"` to stop at the first one instead. Problems with the
//! run itself (unreadable source, missing stylesheet, unwritable output) are
//! always fatal.

pub mod assets;
pub mod config;
pub mod imaging;
pub mod output;
pub mod publish;
pub mod render;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
