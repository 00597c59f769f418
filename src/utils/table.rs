//! Table rendering utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: usize,
}

impl Table {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
            max_width: 60,
        }
    }

    /// Cells wider than this are cut with an ellipsis.
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = width.max(4);
        self
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.width().min(self.max_width));
            }
        }
        widths
    }

    fn fit(&self, cell: &str, width: usize) -> String {
        if cell.width() <= width {
            let pad = width - cell.width();
            return format!("{cell}{}", " ".repeat(pad));
        }
        let mut out = String::new();
        for ch in cell.chars() {
            if out.width() + 1 >= width {
                break;
            }
            out.push(ch);
        }
        out.push('…');
        let pad = width.saturating_sub(out.width());
        format!("{out}{}", " ".repeat(pad))
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        // Header
        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| self.fit(h, *w))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total));
        out.push('\n');

        // Rows
        for row in &self.rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| self.fit(row.get(i).map(String::as_str).unwrap_or(""), *w))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_columns() {
        let mut t = Table::new(&["id", "name"]);
        t.add_row(vec!["1".into(), "alice".into()]);
        t.add_row(vec!["10".into(), "bob".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id  name");
        assert_eq!(lines[2], "1   alice");
        assert_eq!(lines[3], "10  bob");
    }

    #[test]
    fn long_cells_are_truncated() {
        let mut t = Table::new(&["msg"]).with_max_width(6);
        t.add_row(vec!["abcdefghij".into()]);
        let out = t.render();
        assert!(out.contains('…'));
        assert!(!out.contains("abcdefghij"));
    }
}
