// src/reshape/codelists.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::table::Table;

/// Items-table column for the dimension a row belongs to.
static DIMENSION_COLUMN: &str = "DimensionName_ENG";

/// Source columns mapped into the canonical code-list shape, in output
/// order.
static ITEM_COLUMNS: &[(&str, &str)] = &[
    ("Description_ENG", "Label"),
    ("Code", "Notation"),
    ("Hierarchy", "Parent Notation"),
    ("SortOrder", "Sort Priority"),
];

/// Optional description column, included when the items table carries it.
static ITEM_DESCRIPTION: (&str, &str) = ("Notes_ENG", "Description");

static FLOAT_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+\.0$").expect("notation regex should be valid"));

/// Strip the trailing `.0` from a floating-point-looking integer notation;
/// anything else passes through unchanged.
pub fn normalize_notation(raw: &str) -> String {
    if FLOAT_INTEGER.is_match(raw) {
        raw[..raw.len() - 2].to_string()
    } else {
        raw.to_string()
    }
}

/// One derived code list.
#[derive(Debug)]
pub struct CodeList {
    pub dimension: String,
    pub table: Table,
}

impl CodeList {
    /// File-name slug for this dimension: lowercased, spaces to dashes.
    pub fn slug(&self) -> String {
        self.dimension.to_ascii_lowercase().replace(' ', "-")
    }
}

/// Partition the "Items" table into one code list per target dimension.
/// Each list holds exactly the item rows whose dimension name matches,
/// renamed to the canonical shape, with numeric-looking notations and sort
/// priorities normalized. A dimension with no items yields an empty list
/// (headers only) and a warning.
pub fn derive(items: &Table, dimensions: &[&str]) -> Result<Vec<CodeList>> {
    let dim_idx = items
        .column_index(DIMENSION_COLUMN)
        .with_context(|| format!("items table has no {:?} column", DIMENSION_COLUMN))?;

    let mut indices = Vec::with_capacity(ITEM_COLUMNS.len() + 1);
    let mut columns = Vec::with_capacity(ITEM_COLUMNS.len() + 1);
    for (source, target) in ITEM_COLUMNS {
        let idx = items
            .column_index(source)
            .with_context(|| format!("items table has no {:?} column", source))?;
        indices.push(idx);
        columns.push(target.to_string());
    }
    if let Some(idx) = items.column_index(ITEM_DESCRIPTION.0) {
        indices.push(idx);
        columns.push(ITEM_DESCRIPTION.1.to_string());
    }

    let mut lists = Vec::with_capacity(dimensions.len());
    for &dimension in dimensions {
        let mut table = Table::new(columns.clone());
        for row in items.rows.iter().filter(|r| r[dim_idx] == dimension) {
            let mut cells = Vec::with_capacity(indices.len());
            for (pos, &idx) in indices.iter().enumerate() {
                let raw = &row[idx];
                let cell = match columns[pos].as_str() {
                    "Notation" | "Parent Notation" | "Sort Priority" => normalize_notation(raw),
                    _ => raw.clone(),
                };
                cells.push(cell);
            }
            table.push_row(cells)?;
        }
        if table.is_empty() {
            warn!(%dimension, "no items for dimension; emitting empty code list");
        }
        lists.push(CodeList {
            dimension: dimension.to_string(),
            table,
        });
    }
    Ok(lists)
}
