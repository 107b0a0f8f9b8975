// src/metadata/mod.rs

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::fs;
use std::path::Path;

/// Statistics-authority theme for housing, planning and local services.
pub static THEME_HOUSING_PLANNING_LOCAL_SERVICES: &str =
    "http://gss-data.org.uk/def/concept/statistics-authority-themes/housing-planning-local-services";

/// Descriptive metadata for the dataset, serialized as a TriG named graph.
#[derive(Debug, Clone)]
pub struct DatasetMetadata {
    pub graph_uri: String,
    pub dataset_uri: String,
    pub title: String,
    pub comment: String,
    pub publisher_uri: String,
    pub creator_uri: String,
    /// `mailto:` URI.
    pub contact_point: String,
    pub family: String,
    pub theme_uri: String,
    pub license_uri: String,
    pub issued: Option<NaiveDate>,
    pub modified: DateTime<Utc>,
}

impl DatasetMetadata {
    /// Serialize as TriG. Literals are escaped; timestamps are typed.
    pub fn to_trig(&self) -> String {
        let mut out = String::new();
        out.push_str("@prefix dcat: <http://www.w3.org/ns/dcat#> .\n");
        out.push_str("@prefix dct: <http://purl.org/dc/terms/> .\n");
        out.push_str("@prefix gdp: <http://gss-data.org.uk/def/gdp#> .\n");
        out.push_str("@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n");
        out.push_str("@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n");
        out.push('\n');
        out.push_str(&format!("<{}> {{\n", self.graph_uri));
        out.push_str(&format!("    <{}> a dcat:Dataset ;\n", self.dataset_uri));
        out.push_str(&format!(
            "        rdfs:label \"{}\"@en ;\n",
            escape_literal(&self.title)
        ));
        if !self.comment.is_empty() {
            out.push_str(&format!(
                "        rdfs:comment \"{}\"@en ;\n",
                escape_literal(&self.comment)
            ));
        }
        out.push_str(&format!(
            "        dct:publisher <{}> ;\n",
            self.publisher_uri
        ));
        out.push_str(&format!("        dct:creator <{}> ;\n", self.creator_uri));
        out.push_str(&format!(
            "        dcat:contactPoint <{}> ;\n",
            self.contact_point
        ));
        out.push_str(&format!("        gdp:family gdp:{} ;\n", self.family));
        out.push_str(&format!("        dcat:theme <{}> ;\n", self.theme_uri));
        out.push_str(&format!("        dct:license <{}> ;\n", self.license_uri));
        if let Some(issued) = self.issued {
            out.push_str(&format!(
                "        dct:issued \"{}\"^^xsd:date ;\n",
                issued.format("%Y-%m-%d")
            ));
        }
        out.push_str(&format!(
            "        dct:modified \"{}\"^^xsd:dateTime .\n",
            self.modified.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push_str("}\n");
        out
    }
}

fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Write the dataset-metadata document.
pub fn write_trig(meta: &DatasetMetadata, path: &Path) -> Result<()> {
    fs::write(path, meta.to_trig()).with_context(|| format!("writing {}", path.display()))
}
