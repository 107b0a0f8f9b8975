// src/schema/types.rs

/// Kind of data-cube component a column maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Dimension,
    Measure,
    Attribute,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Dimension => "Dimension",
            ComponentKind::Measure => "Measure",
            ComponentKind::Attribute => "Attribute",
        }
    }

    /// Attachment keyword used in the column registry CSV.
    pub fn attachment(&self) -> &'static str {
        match self {
            ComponentKind::Dimension => "qb:dimension",
            ComponentKind::Measure => "qb:measure",
            ComponentKind::Attribute => "qb:attribute",
        }
    }
}

/// One observation column and its fixed semantic mapping.
///
/// `property_url` and `value_url` may carry `{name}`-style CSVW URI-template
/// variables; the literal `{base}` is replaced with the reference-data base
/// URL at generation time.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// CSV header title, e.g. "Chargeable homes".
    pub title: &'static str,
    /// CSVW column name and template variable, e.g. "chargeable_homes".
    pub name: &'static str,
    pub kind: ComponentKind,
    pub datatype: &'static str,
    pub required: bool,
    pub property_url: &'static str,
    pub value_url: Option<&'static str>,
    /// Codelist URI for dimensions backed by one.
    pub codelist: Option<&'static str>,
}

/// The fixed column-to-semantic registry for the observation CSV.
pub static OBSERVATION_SCHEMA: &[ColumnSpec] = &[
    ColumnSpec {
        title: "Geography",
        name: "geography",
        kind: ComponentKind::Dimension,
        datatype: "string",
        required: true,
        property_url: "http://purl.org/linked-data/sdmx/2009/dimension#refArea",
        value_url: Some("http://statistics.data.gov.uk/id/statistical-geography/{geography}"),
        codelist: None,
    },
    ColumnSpec {
        title: "Value",
        name: "value",
        kind: ComponentKind::Measure,
        datatype: "number",
        required: true,
        property_url: "{base}def/measure/count",
        value_url: None,
        codelist: None,
    },
    ColumnSpec {
        title: "Chargeable homes",
        name: "chargeable_homes",
        kind: ComponentKind::Dimension,
        datatype: "string",
        required: true,
        property_url: "{base}def/dimension/chargeable-homes",
        value_url: Some("{base}def/concept/chargeable-homes/{chargeable_homes}"),
        codelist: Some("{base}def/codelist/chargeable-homes"),
    },
    ColumnSpec {
        title: "Period",
        name: "period",
        kind: ComponentKind::Dimension,
        datatype: "string",
        required: true,
        property_url: "http://purl.org/linked-data/sdmx/2009/dimension#refPeriod",
        value_url: Some("http://reference.data.gov.uk/id/{period}"),
        codelist: None,
    },
    ColumnSpec {
        title: "Measure Type",
        name: "measure_type",
        kind: ComponentKind::Dimension,
        datatype: "string",
        required: true,
        property_url: "http://purl.org/linked-data/cube#measureType",
        value_url: Some("{base}def/measure/{measure_type}"),
        codelist: None,
    },
    ColumnSpec {
        title: "Unit",
        name: "unit",
        kind: ComponentKind::Attribute,
        datatype: "string",
        required: true,
        property_url: "http://purl.org/linked-data/sdmx/2009/attribute#unitMeasure",
        value_url: Some("{base}def/concept/measurement-units/{unit}"),
        codelist: None,
    },
];

/// Expand the `{base}` marker in a URI template against the reference-data
/// base URL.
pub fn expand(template: &str, base: &str) -> String {
    template.replace("{base}", base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_the_observation_columns() {
        let titles: Vec<&str> = OBSERVATION_SCHEMA.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            vec!["Geography", "Value", "Chargeable homes", "Period", "Measure Type", "Unit"]
        );
        assert!(OBSERVATION_SCHEMA.iter().all(|c| c.required));
    }

    #[test]
    fn base_expansion() {
        assert_eq!(
            expand("{base}def/measure/count", "https://example.test/ref/"),
            "https://example.test/ref/def/measure/count"
        );
        assert_eq!(expand("http://fixed", "https://example.test/"), "http://fixed");
    }
}
