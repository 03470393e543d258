//! Markup extraction: visible text of an `.html` page.
//!
//! The page is parsed with `scraper` (html5ever), so entities are decoded and
//! malformed markup is repaired the way a browser would. `script` and `style`
//! subtrees are dropped whole. Block elements start on a new line and table
//! cells are separated by tabs, which the normaliser later turns into single
//! spaces.

use crate::error::FileError;
use crate::pipeline::display_name;
use scraper::{ElementRef, Html};
use std::path::Path;

/// Elements whose content is never visible text.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start and end a line.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "details", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "tfoot", "thead", "title", "tr", "ul",
];

/// Read `path` as UTF-8 (invalid sequences replaced) and return its text.
pub fn extract_html(path: &Path) -> Result<String, FileError> {
    let bytes = std::fs::read(path).map_err(|e| FileError::CorruptOrUnreadable {
        file: display_name(path),
        detail: e.to_string(),
    })?;
    Ok(html_to_text(&String::from_utf8_lossy(&bytes)))
}

/// Visible text of an HTML document.
pub fn html_to_text(source: &str) -> String {
    let document = Html::parse_document(source);
    let mut out = String::with_capacity(source.len() / 2);
    walk(document.root_element(), &mut out);
    out.replace('\u{00A0}', " ")
}

fn walk(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED.contains(&name) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }
    let block = BLOCKS.contains(&name);
    if block {
        end_line(out);
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            walk(child_element, out);
        }
    }

    match name {
        "td" | "th" => out.push('\t'),
        _ if block => end_line(out),
        _ => {}
    }
}

/// Start a new line unless already at the start of one.
fn end_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
