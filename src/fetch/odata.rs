// src/fetch/odata.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::CachedClient;
use crate::table::Table;

/// One page of an OData JSON response: rows in `value`, continuation link in
/// `odata.nextLink`.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default, rename = "odata.nextLink")]
    pub next_link: Option<String>,
    #[serde(default)]
    pub value: Vec<serde_json::Map<String, Value>>,
}

pub fn parse_page(body: &[u8]) -> Result<Page> {
    serde_json::from_slice(body).context("parsing OData page")
}

/// Render a scalar JSON value as a cell. Integral floats lose the trailing
/// `.0`; nulls render empty.
pub fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i.to_string();
            }
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < 9.0e15 {
                    return format!("{}", f as i64);
                }
            }
            n.to_string()
        }
        other => other.to_string(),
    }
}

/// Download an OData feed into a [`Table`], following `odata.nextLink`
/// pages until exhausted. Columns are the union of keys across all pages;
/// a row missing a key gets an empty cell.
pub async fn fetch_table(http: &CachedClient, url: &str) -> Result<Table> {
    let mut pages = Vec::new();
    let mut next = Some(url.to_string());
    while let Some(page_url) = next {
        let body = http.get_bytes(&page_url).await?;
        let page = parse_page(&body).with_context(|| format!("decoding {}", page_url))?;
        debug!(url = %page_url, rows = page.value.len(), "fetched OData page");
        next = page.next_link.clone();
        pages.push(page);
    }
    table_from_pages(&pages)
}

/// Flatten parsed pages into one table.
pub fn table_from_pages(pages: &[Page]) -> Result<Table> {
    let mut columns: Vec<String> = Vec::new();
    for page in pages {
        for record in &page.value {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut table = Table::new(columns);
    for page in pages {
        for record in &page.value {
            let row = table
                .columns
                .iter()
                .map(|c| record.get(c).map(scalar_to_string).unwrap_or_default())
                .collect();
            table.rows.push(row);
        }
    }
    Ok(table)
}
