//! Fixed-width layout table of a struct's members (offset, size, type, identifier,
//! description). Embedded in generated code as documentation only.

use crate::ast::Member;
use std::fmt;

pub const HEADERS: [&str; 5] = ["Offset", "Size", "Type", "Identifier", "Description"];

/// Columns rendered right-aligned; the rest are left-aligned.
const RIGHT_ALIGNED: [bool; 5] = [true, true, false, false, false];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTable {
    widths: [usize; 5],
    rows: Vec<[String; 5]>,
}

impl LayoutTable {
    pub fn new(members: &[Member]) -> Self {
        let rows: Vec<[String; 5]> = members
            .iter()
            .map(|m| {
                [
                    m.offset.to_string(),
                    m.size_cell(),
                    m.type_cell(),
                    m.identifier.clone(),
                    m.description.clone(),
                ]
            })
            .collect();
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        LayoutTable { widths, rows }
    }

    pub fn column_widths(&self) -> [usize; 5] {
        self.widths
    }

    /// Width of the padded header line; the rule line under it has this many dashes.
    pub fn header_width(&self) -> usize {
        self.widths.iter().sum::<usize>() + self.widths.len() - 1
    }

    /// Header, rule and one line per member. Trailing padding is trimmed.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.render_row(&HEADERS.map(String::from), false));
        lines.push("-".repeat(self.header_width()));
        for row in &self.rows {
            lines.push(self.render_row(row, true));
        }
        lines
    }

    fn render_row(&self, cells: &[String; 5], align: bool) -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let pad = self.widths[i].saturating_sub(cell.chars().count());
            if align && RIGHT_ALIGNED[i] {
                line.push_str(&" ".repeat(pad));
                line.push_str(cell);
            } else {
                line.push_str(cell);
                line.push_str(&" ".repeat(pad));
            }
        }
        line.trim_end().to_string()
    }
}

impl fmt::Display for LayoutTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
