//! Line-scanning extraction of the stat tables embedded in raw markup.
//!
//! Box score pages ship several of their stat tables inside HTML comments,
//! where a structured document query cannot reach them. The extractor works
//! on raw lines instead: it looks for the recurring `table_container`
//! marker, then accumulates everything up to the matching `</table>`, which
//! captures commented-out tables exactly like visible ones.

use scraper::{Html, Selector};

use crate::error::ScrapeError;

/// Token bracketing the start of an embedded stat table.
pub const TABLE_START_MARKER: &str = "table_container";
/// Token closing an embedded stat table.
pub const TABLE_END_MARKER: &str = "</table>";

const BLOB_DELIMITER: char = '|';

/// Raw lines of one embedded table, in source order.
///
/// The marker line itself has already been discarded; what remains is the
/// table markup proper.
#[derive(Debug, Clone)]
pub struct TableBlock {
    lines: Vec<String>,
}

impl TableBlock {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[cfg(test)]
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

/// Carve every embedded stat table out of raw markup.
///
/// Explicit scan per start marker: accumulate trimmed, non-blank lines until
/// a line containing the end marker closes the block. A start marker whose
/// scan runs past the end of input is a malformed page, not an empty result.
pub fn extract_table_blocks(markup: &str) -> Result<Vec<TableBlock>, ScrapeError> {
    let lines: Vec<&str> = markup.lines().collect();
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(TABLE_START_MARKER))
        .map(|(ix, _)| ix)
        .collect();

    let mut blocks = Vec::with_capacity(starts.len());
    for start in starts {
        let mut buffer: Vec<String> = Vec::new();
        let mut ix = start;
        loop {
            let Some(line) = lines.get(ix) else {
                return Err(ScrapeError::MalformedPage(format!(
                    "table starting on line {} has no closing {}",
                    start + 1,
                    TABLE_END_MARKER
                )));
            };
            if line.contains(TABLE_END_MARKER) {
                break;
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                buffer.push(trimmed.to_string());
            }
            ix += 1;
        }
        // The first accumulated line is the marker line, not data.
        if !buffer.is_empty() {
            buffer.remove(0);
        }
        blocks.push(TableBlock { lines: buffer });
    }

    Ok(blocks)
}

/// Header row plus body rows parsed from table markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub header: Vec<String>,
    /// Body rows tagged with their source index. Row drops keep the tag, so
    /// the serialized index column shows gaps where rows were removed.
    pub rows: Vec<(usize, Vec<String>)>,
}

/// Parse a table block's lines as a row/column grid.
pub fn parse_grid(block: &TableBlock) -> Result<Grid, ScrapeError> {
    parse_grid_html(&block.lines().join("\n"))
}

/// Parse a table fragment as a row/column grid using its first row as the
/// header.
pub fn parse_grid_html(fragment: &str) -> Result<Grid, ScrapeError> {
    let html = Html::parse_fragment(fragment);
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for row in html.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if cells.is_empty() {
            continue;
        }
        match header {
            None => header = Some(cells),
            Some(_) => {
                let ix = rows.len();
                rows.push((ix, cells));
            }
        }
    }

    let header = header
        .ok_or_else(|| ScrapeError::MalformedPage("table block has no rows".to_string()))?;
    Ok(Grid { header, rows })
}

impl Grid {
    /// Drop the trailing column (the batting tables carry a free-text
    /// details column that is not part of the record).
    pub fn drop_last_column(&mut self) {
        self.header.pop();
        let width = self.header.len();
        for (_, row) in &mut self.rows {
            row.truncate(width);
        }
    }

    /// Drop the leading column.
    pub fn drop_first_column(&mut self) {
        if !self.header.is_empty() {
            self.header.remove(0);
        }
        for (_, row) in &mut self.rows {
            if !row.is_empty() {
                row.remove(0);
            }
        }
    }

    /// Drop rows whose cells are all empty (sub-header separator rows).
    /// Surviving rows keep their original index.
    pub fn drop_empty_rows(&mut self) {
        self.rows
            .retain(|(_, row)| row.iter().any(|cell| !cell.is_empty()));
    }

    /// Drop the named columns wherever they appear in the header.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let drop_ixs: Vec<usize> = self
            .header
            .iter()
            .enumerate()
            .filter(|(_, h)| names.contains(&h.as_str()))
            .map(|(ix, _)| ix)
            .collect();

        for &ix in drop_ixs.iter().rev() {
            self.header.remove(ix);
            for (_, row) in &mut self.rows {
                if ix < row.len() {
                    row.remove(ix);
                }
            }
        }
    }

    /// Keep only the first `n` rows.
    pub fn truncate_rows(&mut self, n: usize) {
        self.rows.truncate(n);
    }

    /// Serialize to the pipe-delimited blob stored in the record.
    ///
    /// The pipe never occurs in cell content on these pages; each row is
    /// prefixed with its source index, the header with an empty index cell.
    pub fn to_delimited(&self) -> String {
        let mut out = String::new();
        out.push(BLOB_DELIMITER);
        out.push_str(&self.header.join("|"));
        out.push('\n');
        for (ix, row) in &self.rows {
            out.push_str(&format!("{}|{}\n", ix, row.join("|")));
        }
        out
    }
}
