//! Text normalisation: deterministic cleanup of extracted document text.
//!
//! Extracted text carries artefacts of its source: byte-order marks pasted
//! into the middle of a paragraph, Windows line endings, runs of empty
//! paragraphs, tab-aligned columns, leftover entities. The rules below remove
//! them without touching the wording, so the downstream embedding step sees
//! one clean paragraph per line.
//!
//! ## Rule Order
//!
//! Invisible characters go first so they cannot hide a blank line. Line
//! endings are normalised before any rule that looks at `\n`, and spaces are
//! collapsed before lines are trimmed. Entities are decoded last, then the
//! whitespace rules run again over whatever decoding produced.
//!
//! Tag-like text is never removed here: the markup extractor has already
//! dropped every real tag, so a `<br>` that reaches this module is prose
//! (usually an escaped `&lt;br&gt;` on an FAQ page) and is kept as written.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Apply every normalisation rule to raw extracted text.
///
/// Rules (applied in order):
/// 1. Strip byte-order marks and zero-width spaces anywhere in the text
/// 2. Normalise line endings (CRLF / CR → LF)
/// 3. Collapse 3+ consecutive line breaks down to 2
/// 4. Tabs → single space
/// 5. Collapse runs of spaces down to 1
/// 6. Trim every line and the whole text
/// 7. Decode leftover HTML entities
///
/// Decoding can produce spaces, line breaks, tabs or invisible characters
/// again (`&nbsp;&nbsp;`, `&#13;`, `&#9;`, `&#8203;`), so rules 1-6 run a
/// second time when rule 7 changed anything.
pub fn clean_text(input: &str) -> String {
    let s = apply_whitespace_rules(input);
    let decoded = decode_entities(&s);
    if decoded == s {
        return s;
    }
    apply_whitespace_rules(&decoded)
}

/// Rules 1-6.
fn apply_whitespace_rules(input: &str) -> String {
    let s = remove_invisible_chars(input);
    let s = normalise_line_endings(&s);
    let s = collapse_blank_lines(&s);
    let s = tabs_to_spaces(&s);
    let s = collapse_spaces(&s);
    trim_lines(&s)
}

// ── Rule 1: Strip BOM and zero-width spaces ──────────────────────────────────

/// UTF-8 BOM bytes mis-decoded as Latin-1.
const MOJIBAKE_BOM: &str = "\u{00EF}\u{00BB}\u{00BF}";

fn remove_invisible_chars(input: &str) -> String {
    input
        .replace(MOJIBAKE_BOM, "")
        .replace(['\u{FEFF}', '\u{200B}'], "")
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Collapse excessive blank lines ───────────────────────────────────
//
// A whitespace-only line counts as blank: it becomes empty once rule 6 runs.

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[^\S\n]*\n){2,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

// ── Rule 4: Tabs to spaces ───────────────────────────────────────────────────

fn tabs_to_spaces(input: &str) -> String {
    input.replace('\t', " ")
}

// ── Rule 5: Collapse runs of spaces ──────────────────────────────────────────

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

fn collapse_spaces(input: &str) -> String {
    RE_SPACES.replace_all(input, " ").into_owned()
}

// ── Rule 6: Trim lines and text ──────────────────────────────────────────────

fn trim_lines(input: &str) -> String {
    input
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

// ── Rule 7: Decode leftover entities ─────────────────────────────────────────
//
// One pass over the text, so `&amp;lt;` becomes `&lt;` and not `<`.
// References to control characters other than tab, LF and CR stay literal.

static RE_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:(nbsp|amp|lt|gt|quot|apos)|#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6}));").unwrap()
});

fn decode_entities(input: &str) -> String {
    RE_ENTITY
        .replace_all(input, |caps: &Captures<'_>| {
            if let Some(name) = caps.get(1) {
                return match name.as_str() {
                    "nbsp" => " ",
                    "amp" => "&",
                    "lt" => "<",
                    "gt" => ">",
                    "quot" => "\"",
                    _ => "'",
                }
                .to_string();
            }
            let code = match (caps.get(2), caps.get(3)) {
                (Some(dec), _) => dec.as_str().parse::<u32>().ok(),
                (None, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok(),
                _ => None,
            };
            match code.and_then(char::from_u32) {
                Some('\u{00A0}') => " ".to_string(),
                Some(c) if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => {
                    caps[0].to_string()
                }
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────
