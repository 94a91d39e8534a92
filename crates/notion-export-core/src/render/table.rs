//! Pipe-table rendering

use crate::gateway::types::{first_plain_text, TableRowPayload};
use crate::gateway::{Block, BlockKind};

/// `| cell0 | cell1 | ... |` using the first run of each cell
pub fn render_row(row: &TableRowPayload) -> String {
    let cells: Vec<&str> = row.cells.iter().map(|c| first_plain_text(c)).collect();
    format!("| {} |\n", cells.join(" | "))
}

/// `| ---` once per column plus one, closed with `|`
pub fn header_separator(columns: usize) -> String {
    let mut line = "| ---".repeat(columns + 1);
    line.push_str("|\n");
    line
}

/// Render fetched table rows in order
///
/// With `has_header`, the separator goes right after the first row, sized
/// from that row's cell count. Children that are not rows are skipped.
pub fn render_rows(rows: &[Block], has_header: bool) -> String {
    let mut out = String::new();
    let rows = rows.iter().filter_map(|b| match &b.kind {
        BlockKind::TableRow(row) => Some(row),
        _ => None,
    });

    for (i, row) in rows.enumerate() {
        out.push_str(&render_row(row));
        if i == 0 && has_header {
            out.push_str(&header_separator(row.cells.len()));
        }
    }
    out
}
