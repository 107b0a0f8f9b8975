// src/schema/write.rs

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::path::Path;

use super::types::{expand, OBSERVATION_SCHEMA};
use crate::reshape::codelists::CodeList;

/// Write the fixed column registry as `columns.csv`.
pub fn write_columns(path: &Path, base: &str) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record([
        "title",
        "name",
        "component_attachment",
        "property_template",
        "value_template",
        "datatype",
    ])?;
    for spec in OBSERVATION_SCHEMA {
        let property = expand(spec.property_url, base);
        let value = spec.value_url.map(|v| expand(v, base)).unwrap_or_default();
        wtr.write_record([
            spec.title,
            spec.name,
            spec.kind.attachment(),
            property.as_str(),
            value.as_str(),
            spec.datatype,
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Write the component registry as `components.csv`.
pub fn write_components(path: &Path, base: &str) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(["component", "label", "kind", "codelist"])?;
    for spec in OBSERVATION_SCHEMA {
        let component = expand(spec.property_url, base);
        let codelist = spec.codelist.map(|c| expand(c, base)).unwrap_or_default();
        wtr.write_record([
            component.as_str(),
            spec.title,
            spec.kind.as_str(),
            codelist.as_str(),
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Write `codelists-metadata.json`, one table-group entry per emitted
/// code-list CSV.
pub fn write_codelists_metadata(path: &Path, lists: &[CodeList], base: &str) -> Result<()> {
    let tables: Vec<serde_json::Value> = lists
        .iter()
        .map(|list| {
            let slug = list.slug();
            let columns: Vec<serde_json::Value> = list
                .table
                .columns
                .iter()
                .map(|title| {
                    let name = title.to_ascii_lowercase().replace(' ', "_");
                    let datatype = if title == "Sort Priority" { "integer" } else { "string" };
                    let required = title == "Label" || title == "Notation";
                    json!({
                        "titles": title,
                        "name": name,
                        "datatype": datatype,
                        "required": required,
                    })
                })
                .collect();
            json!({
                "url": format!("codelists/{}.csv", slug),
                "dc:title": list.dimension,
                "tableSchema": {
                    "columns": columns,
                    "aboutUrl": format!("{}def/concept/{}/{{notation}}", base, slug),
                    "primaryKey": ["notation"],
                }
            })
        })
        .collect();

    let doc = json!({
        "@context": ["http://www.w3.org/ns/csvw", {"@language": "en"}],
        "tables": tables,
    });
    let json = serde_json::to_string_pretty(&doc).context("serializing codelists metadata")?;
    fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape::codelists;
    use crate::table::Table;
    use tempfile::tempdir;

    const BASE: &str = "https://ons-opendata.github.io/ref_housing/";

    #[test]
    fn columns_csv_lists_every_observation_column() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("columns.csv");
        write_columns(&path, BASE)?;
        let text = fs::read_to_string(&path)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + OBSERVATION_SCHEMA.len());
        assert!(lines[0].starts_with("title,name,component_attachment"));
        assert!(text.contains("qb:dimension"));
        assert!(text.contains("qb:measure"));
        assert!(text.contains("qb:attribute"));
        Ok(())
    }

    #[test]
    fn components_csv_expands_the_base_url() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("components.csv");
        write_components(&path, BASE)?;
        let text = fs::read_to_string(&path)?;
        assert!(text.contains(&format!("{}def/dimension/chargeable-homes", BASE)));
        assert!(!text.contains("{base}"));
        Ok(())
    }

    #[test]
    fn codelists_metadata_describes_each_list() -> Result<()> {
        let mut items = Table::new(
            ["DimensionName_ENG", "Code", "Description_ENG", "Hierarchy", "SortOrder"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        items
            .push_row(
                ["Chargeable homes", "1.0", "Total", "", "1.0"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            )
            .unwrap();
        let lists = codelists::derive(&items, &["Chargeable homes"])?;

        let dir = tempdir()?;
        let path = dir.path().join("codelists-metadata.json");
        write_codelists_metadata(&path, &lists, BASE)?;
        let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let tables = doc["tables"].as_array().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0]["url"], "codelists/chargeable-homes.csv");
        assert_eq!(
            tables[0]["tableSchema"]["aboutUrl"],
            format!("{}def/concept/chargeable-homes/{{notation}}", BASE)
        );
        Ok(())
    }
}
