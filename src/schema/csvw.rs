// src/schema/csvw.rs

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::types::{expand, ComponentKind, OBSERVATION_SCHEMA};

/// Build the CSVW table-schema document for the observation CSV.
pub fn build_schema(csv_name: &str, base: &str) -> Value {
    let columns: Vec<Value> = OBSERVATION_SCHEMA
        .iter()
        .map(|spec| {
            let mut col = json!({
                "titles": spec.title,
                "name": spec.name,
                "datatype": spec.datatype,
                "required": spec.required,
                "propertyUrl": expand(spec.property_url, base),
            });
            if let Some(value_url) = spec.value_url {
                col["valueUrl"] = json!(expand(value_url, base));
            }
            col
        })
        .collect();

    let primary_key: Vec<&str> = OBSERVATION_SCHEMA
        .iter()
        .filter(|s| s.kind == ComponentKind::Dimension)
        .map(|s| s.name)
        .collect();
    let about_url = format!(
        "{}data/observation/{}",
        base,
        primary_key
            .iter()
            .map(|n| format!("{{{}}}", n))
            .collect::<Vec<_>>()
            .join("/")
    );

    json!({
        "@context": ["http://www.w3.org/ns/csvw", {"@language": "en"}],
        "url": csv_name,
        "tableSchema": {
            "columns": columns,
            "primaryKey": primary_key,
            "aboutUrl": about_url,
        }
    })
}

/// Write the schema document describing `csv_path` to `schema_path`.
pub fn create(csv_path: &Path, schema_path: &Path, base: &str) -> Result<()> {
    let csv_name = csv_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("no usable file name in {}", csv_path.display()))?;
    let doc = build_schema(csv_name, base);
    let json = serde_json::to_string_pretty(&doc).context("serializing CSVW schema")?;
    fs::write(schema_path, json + "\n")
        .with_context(|| format!("writing {}", schema_path.display()))
}
