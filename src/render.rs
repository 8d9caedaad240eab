//! Markdown page rendering.
//!
//! Every markdown document starts with a YAML preamble fenced by `---` lines,
//! followed by the body:
//!
//! ```text
//! ---
//! title: Hello
//! ---
//! # Greeting
//!
//! Body text in **markdown**.
//! ```
//!
//! Rendering a page runs four steps:
//!
//! 1. **Normalize** — `\r\n` and lone `\r` become `\n`.
//! 2. **Split** — the opening `---` must be the first line; the closing
//!    delimiter is the next line consisting solely of `---`. Everything in
//!    between is the preamble, everything after is the body.
//! 3. **Parse** — the trimmed preamble is read as YAML. Only `title` is used;
//!    other keys are ignored.
//! 4. **Convert & substitute** — the body becomes HTML via `pulldown-cmark`
//!    (every heading gets a slug `id`), then `{TITLE}` and `{BODY}` in the page
//!    template are replaced in a single pass.
//!
//! Raw HTML in the body is passed through untouched; content is trusted.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use serde_yaml::Value;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "markdown files must start with a preamble between --- and --- lines that contains a title"
    )]
    MissingPreamble,
    #[error("malformed preamble: {0}")]
    MalformedPreamble(String),
}

pub const TITLE_PLACEHOLDER: &str = "{TITLE}";
pub const BODY_PLACEHOLDER: &str = "{BODY}";

const DELIMITER: &str = "---";

// ============================================================================
// Preamble
// ============================================================================

/// Metadata parsed from a document preamble.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Page title; empty when the preamble has none.
    pub title: String,
}

impl DocumentMetadata {
    /// Parse an already-trimmed preamble.
    ///
    /// Scalar titles (strings, numbers, booleans) are accepted as text. A
    /// preamble that is not a mapping, or a title that is a list or mapping,
    /// is rejected.
    pub fn from_preamble(preamble: &str) -> Result<Self, RenderError> {
        if preamble.is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(preamble)
            .map_err(|e| RenderError::MalformedPreamble(e.to_string()))?;

        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(RenderError::MalformedPreamble(
                    "expected key: value pairs".into(),
                ));
            }
        };

        let title = match mapping.get("title") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(_) => {
                return Err(RenderError::MalformedPreamble(
                    "title must be a plain value".into(),
                ));
            }
        };

        Ok(Self { title })
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Split a newline-normalized document into `(preamble, body)`.
///
/// The preamble is returned trimmed of surrounding whitespace.
pub fn split_preamble(document: &str) -> Result<(&str, &str), RenderError> {
    if !document.starts_with(DELIMITER) {
        return Err(RenderError::MissingPreamble);
    }

    let mut lines = document.split_inclusive('\n');
    let opening = lines.next().unwrap_or_default();
    if !is_delimiter(opening) {
        return Err(RenderError::MalformedPreamble(
            "the opening --- must be on a line of its own".into(),
        ));
    }

    let mut offset = opening.len();
    for line in lines {
        if is_delimiter(line) {
            let preamble = document[opening.len()..offset]
                .trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
            let body = &document[offset + line.len()..];
            return Ok((preamble, body));
        }
        offset += line.len();
    }

    Err(RenderError::MalformedPreamble(
        "no closing --- line after the preamble".into(),
    ))
}

// ============================================================================
// Markdown
// ============================================================================

/// Markdown extensions enabled on top of CommonMark.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Turn heading text into a URL fragment.
///
/// Alphanumerics are lowercased and kept; every run of anything else becomes
/// a single `-`, never at either end.
///
/// ```
/// # use klaus::render::slugify;
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Getting   Started  "), "getting-started");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Hands out heading ids, suffixing repeats with `-1`, `-2`, ...
///
/// Every id handed out or reserved is remembered, so a suffixed id never
/// collides with a heading whose own slug happens to look suffixed.
#[derive(Default)]
struct HeadingIds {
    used: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl HeadingIds {
    fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    fn next(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base.push_str("section");
        }
        if self.used.insert(base.clone()) {
            return base;
        }

        let suffix = self.next_suffix.entry(base.clone()).or_insert(1);
        loop {
            let candidate = format!("{base}-{suffix}");
            *suffix += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Plain text of the heading whose contents start at `events[0]`.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Give every heading without an explicit `{#id}` a slug id.
///
/// Explicit ids are collected first, so an automatic id never takes one that
/// appears later in the document.
fn assign_heading_ids<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut events: Vec<Event<'a>> = events.collect();
    let mut ids = HeadingIds::default();

    for event in &events {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            ids.reserve(id);
        }
    }

    for start in 0..events.len() {
        if !matches!(events[start], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }

        let slug = ids.next(&heading_text(&events[start + 1..]));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
            *id = Some(CowStr::from(slug));
        }
    }

    events
}

/// Convert a markdown body to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options());
    let events = assign_heading_ids(parser);

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());
    html
}

// ============================================================================
// Template
// ============================================================================

/// A page template with `{TITLE}` and `{BODY}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, RenderError> {
        Ok(Self::new(read_text(path)?))
    }

    /// Substitute every placeholder in one left-to-right pass.
    ///
    /// Inserted text is never rescanned, so a title containing `{BODY}` is
    /// emitted literally.
    pub fn apply(&self, title: &str, body: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + title.len() + body.len());
        let mut rest = self.source.as_str();

        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if let Some(after) = tail.strip_prefix(TITLE_PLACEHOLDER) {
                out.push_str(title);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(BODY_PLACEHOLDER) {
                out.push_str(body);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);

        out
    }
}

// ============================================================================
// Pages
// ============================================================================

/// A fully rendered HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub html: String,
}

/// Render a markdown document into `template`.
pub fn render_page(document: &str, template: &Template) -> Result<RenderedPage, RenderError> {
    let normalized = normalize_newlines(document);
    let (preamble, body) = split_preamble(&normalized)?;
    let metadata = DocumentMetadata::from_preamble(preamble)?;

    let body_html = markdown_to_html(body);
    let html = template.apply(&metadata.title, &body_html);

    Ok(RenderedPage {
        title: metadata.title,
        html,
    })
}

/// Read a file as text. Bytes that are not valid UTF-8 become U+FFFD.
fn read_text(path: &Path) -> Result<String, RenderError> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read `source` and the template at `template_path`, then render.
///
/// The template is read fresh for every document.
pub fn render_file(source: &Path, template_path: &Path) -> Result<RenderedPage, RenderError> {
    let document = read_text(source)?;
    let template = Template::load(template_path)?;
    render_page(&document, &template)
}
