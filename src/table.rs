// src/table.rs

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// An ordered tabular collection of records: a header row plus string data
/// rows, one cell per column. Every column operation in the pipeline is a
/// plain mapping/filter pass over this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column names, order significant.
    pub columns: Vec<String>,
    /// Data rows; each row has exactly `columns.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append one row; the row must match the header width.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "row has {} cells but table has {} columns",
                row.len(),
                self.columns.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    /// Rename a column in place.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self
            .column_index(from)
            .with_context(|| format!("no column named {:?}", from))?;
        self.columns[idx] = to.to_string();
        Ok(())
    }

    /// Apply `f` to every cell of the named column.
    pub fn map_column<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        let idx = self
            .column_index(name)
            .with_context(|| format!("no column named {:?}", name))?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        Ok(())
    }

    /// Append a column filled with a constant value.
    pub fn push_const_column(&mut self, name: &str, value: &str) {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.to_string());
        }
    }

    /// Drop duplicate rows, keeping the first occurrence. Row order is
    /// otherwise preserved.
    pub fn dedup_rows(&mut self) {
        let mut seen = HashSet::new();
        self.rows.retain(|row| seen.insert(row.clone()));
    }

    /// Write the table as CSV with a header row and no index column,
    /// truncating any existing file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        wtr.write_record(&self.columns)
            .context("writing CSV header")?;
        for row in &self.rows {
            wtr.write_record(row)
                .with_context(|| format!("writing CSV row to {}", path.display()))?;
        }
        wtr.flush()
            .with_context(|| format!("flushing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> Table {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        t.push_row(vec!["1".into(), "x".into()]).unwrap();
        t.push_row(vec!["2".into(), "y".into()]).unwrap();
        t.push_row(vec!["1".into(), "x".into()]).unwrap();
        t
    }

    #[test]
    fn push_row_rejects_ragged_rows() {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        assert!(t.push_row(vec!["only".into()]).is_err());
    }

    #[test]
    fn dedup_keeps_first_occurrence_and_order() {
        let mut t = sample();
        t.dedup_rows();
        assert_eq!(t.rows, vec![vec!["1", "x"], vec!["2", "y"]]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let mut once = sample();
        once.dedup_rows();
        let mut twice = once.clone();
        twice.dedup_rows();
        assert_eq!(once, twice);
    }

    #[test]
    fn rename_and_map_column() -> Result<()> {
        let mut t = sample();
        t.rename("a", "A")?;
        t.map_column("A", |c| format!("{}0", c))?;
        assert_eq!(t.columns, vec!["A", "b"]);
        assert_eq!(t.rows[0][0], "10");
        Ok(())
    }

    #[test]
    fn write_csv_has_header_and_no_index() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("t.csv");
        let mut t = sample();
        t.dedup_rows();
        t.write_csv(&path)?;
        let text = fs::read_to_string(&path)?;
        assert_eq!(text, "a,b\n1,x\n2,y\n");
        Ok(())
    }
}
