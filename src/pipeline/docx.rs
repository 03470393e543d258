//! ModernDoc extraction: paragraph and table text from a `.docx` container.
//!
//! Output is one line per non-empty paragraph, in document order. Table cells
//! are walked where the table sits in the body, so a FAQ laid out as a
//! two-column question/answer table reads the same as one written in prose.

use crate::error::FileError;
use crate::pipeline::display_name;
use docx_rs::{
    DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use std::path::Path;
use tracing::debug;

/// Read `path` and return its raw text.
///
/// A container that is not a zip, or a zip without a parseable
/// `word/document.xml`, fails with `CorruptOrUnreadable`. A valid document
/// without text returns an empty string.
pub fn extract_docx(path: &Path) -> Result<String, FileError> {
    let bytes = std::fs::read(path).map_err(|e| FileError::CorruptOrUnreadable {
        file: display_name(path),
        detail: e.to_string(),
    })?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| FileError::CorruptOrUnreadable {
        file: display_name(path),
        detail: format!("not a readable .docx: {e}"),
    })?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => push_paragraph(&mut lines, para),
            DocumentChild::Table(table) => push_table(&mut lines, table),
            _ => {}
        }
    }
    debug!("{}: {} text lines", display_name(path), lines.len());
    Ok(lines.join("\n"))
}

fn push_paragraph(lines: &mut Vec<String>, para: &Paragraph) {
    let text = paragraph_text(para);
    if !text.trim().is_empty() {
        lines.push(text);
    }
}

fn push_table(lines: &mut Vec<String>, table: &Table) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(para) => push_paragraph(lines, para),
                    TableCellContent::Table(inner) => push_table(lines, inner),
                    _ => {}
                }
            }
        }
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&mut text, &para.children);
    text
}

fn push_children(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(text, run),
            ParagraphChild::Insert(insert) => {
                for ins in &insert.children {
                    if let InsertChild::Run(run) = ins {
                        push_run(text, run);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(text, &link.children),
            // Tracked deletions are not part of the current text.
            ParagraphChild::Delete(_) => {}
            _ => {}
        }
    }
}

fn push_run(text: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}
