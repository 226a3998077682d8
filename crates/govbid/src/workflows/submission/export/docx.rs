//! House styling for the submission exports, layered on `docx-rs`.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts, Table, TableCell, TableRow,
};

pub(crate) const FONT: &str = "Calibri";
pub(crate) const BRAND_GREEN: &str = "10B981";
pub(crate) const SLATE: &str = "64748B";
pub(crate) const ALERT_RED: &str = "EF4444";

// US Letter, in twentieths of a point.
const PAGE_WIDTH: u32 = 12_240;
const PAGE_HEIGHT: u32 = 15_840;

#[derive(Debug, thiserror::Error)]
#[error("failed to pack document: {0}")]
pub struct RenderError(String);

/// Empty document using the house font at `base_size_pt`.
pub(crate) fn document(base_size_pt: usize) -> Docx {
    Docx::new()
        .page_size(PAGE_WIDTH, PAGE_HEIGHT)
        .default_fonts(RunFonts::new().ascii(FONT).hi_ansi(FONT))
        .default_size(base_size_pt * 2)
}

/// Text run with characters Word cannot store removed.
pub(crate) fn text(raw: &str) -> Run {
    let printable: String = raw
        .chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect();
    Run::new().add_text(printable)
}

pub(crate) fn sized(raw: &str, size_pt: usize) -> Run {
    text(raw).size(size_pt * 2)
}

pub(crate) fn paragraph(raw: &str) -> Paragraph {
    Paragraph::new().add_run(text(raw))
}

pub(crate) fn centered(run: Run) -> Paragraph {
    Paragraph::new().add_run(run).align(AlignmentType::Center)
}

pub(crate) fn heading(raw: &str, level: u8) -> Paragraph {
    let size_pt = match level {
        0 | 1 => 16,
        2 => 13,
        _ => 12,
    };
    Paragraph::new().add_run(sized(raw, size_pt).bold().color(BRAND_GREEN))
}

pub(crate) fn bullet(raw: &str) -> Paragraph {
    paragraph(&format!("\u{2022} {raw}"))
}

pub(crate) fn numbered(index: usize, raw: &str) -> Paragraph {
    paragraph(&format!("{index}. {raw}"))
}

pub(crate) fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

/// Grid table; rows shorter than the widest row (or the header) are padded with empty cells.
pub(crate) fn grid(header: Option<&[&str]>, rows: &[Vec<String>]) -> Option<Table> {
    let columns = header
        .map(|cells| cells.len())
        .or_else(|| rows.iter().map(Vec::len).max())
        .unwrap_or(0);
    if columns == 0 {
        return None;
    }

    let mut table_rows = Vec::with_capacity(rows.len() + 1);
    if let Some(cells) = header {
        table_rows.push(row(cells.iter().copied(), columns, true));
    }
    for cells in rows {
        table_rows.push(row(cells.iter().map(String::as_str), columns, false));
    }
    Some(Table::new(table_rows))
}

fn row<'a>(cells: impl Iterator<Item = &'a str>, columns: usize, bold: bool) -> TableRow {
    let mut padded: Vec<&str> = cells.take(columns).collect();
    padded.resize(columns, "");

    TableRow::new(
        padded
            .into_iter()
            .map(|value| {
                let run = if bold { text(value).bold() } else { text(value) };
                TableCell::new().add_paragraph(Paragraph::new().add_run(run))
            })
            .collect(),
    )
}

/// Serializes the document into DOCX bytes.
pub(crate) fn pack(docx: Docx) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|err| RenderError(err.to_string()))?;
    Ok(buffer.into_inner())
}
