// src/reshape/mod.rs

pub mod codelists;

use anyhow::{Context, Result};
use tracing::debug;

use crate::table::Table;

/// Fixed mapping from source column names to canonical observation columns.
/// Anything not listed here is dropped.
static OBSERVATION_COLUMNS: &[(&str, &str)] = &[
    ("Authority_AltCode1", "Geography"),
    ("Data", "Value"),
    ("Row_Code", "Chargeable homes"),
    ("Year_Code", "Period"),
];

/// Upstream ships one malformed chargeable-homes code; relabel it rather
/// than propagate it. Scoped to exactly the codes listed here.
static CATEGORY_RELABELS: &[(&str, &str)] = &[("A-", "Adash")];

static MEASURE_TYPE: &str = "Count";
static UNIT: &str = "vacancies";

/// Reshape the raw "Dataset" table into the canonical observation shape:
/// rename the mapped columns, drop everything unmapped, transform period
/// and category codes, append the constant measure-type/unit columns, and
/// drop duplicate rows.
pub fn observations(raw: &Table) -> Result<Table> {
    let mut indices = Vec::with_capacity(OBSERVATION_COLUMNS.len());
    for (source, _) in OBSERVATION_COLUMNS {
        let idx = raw
            .column_index(source)
            .with_context(|| format!("dataset table has no {:?} column", source))?;
        indices.push(idx);
    }
    let dropped = raw.columns.len() - indices.len();
    if dropped > 0 {
        debug!(dropped, "dropping unmapped source columns");
    }

    let mut columns: Vec<String> = OBSERVATION_COLUMNS
        .iter()
        .map(|(_, target)| target.to_string())
        .collect();
    columns.push("Measure Type".to_string());
    columns.push("Unit".to_string());

    let mut out = Table::new(columns);
    for row in &raw.rows {
        out.push_row(vec![
            row[indices[0]].clone(),
            row[indices[1]].clone(),
            relabel_category(&row[indices[2]]),
            period_interval(&row[indices[3]]),
            MEASURE_TYPE.to_string(),
            UNIT.to_string(),
        ])?;
    }
    out.dedup_rows();
    Ok(out)
}

/// `2017…` → `gregorian-interval/2017-03-31T00:00:00/P1Y`. The first four
/// characters of the period code are the year the interval ends in.
pub fn period_interval(code: &str) -> String {
    let year: String = code.chars().take(4).collect();
    format!("gregorian-interval/{}-03-31T00:00:00/P1Y", year)
}

fn relabel_category(code: &str) -> String {
    for (from, to) in CATEGORY_RELABELS {
        if code == *from {
            return to.to_string();
        }
    }
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,statscraper::reshape=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn raw_dataset() -> Table {
        let mut t = Table::new(
            ["Authority_AltCode1", "Data", "Row_Code", "Year_Code", "Authority_Code"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        t.push_row(
            ["W06000001", "42", "1", "2017", "512"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        t.push_row(
            ["W06000002", "7", "A-", "201718", "514"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        t
    }

    #[test]
    fn period_codes_use_first_four_characters() {
        assert_eq!(
            period_interval("2017"),
            "gregorian-interval/2017-03-31T00:00:00/P1Y"
        );
        assert_eq!(
            period_interval("2017abc"),
            "gregorian-interval/2017-03-31T00:00:00/P1Y"
        );
        assert_eq!(
            period_interval("201718"),
            "gregorian-interval/2017-03-31T00:00:00/P1Y"
        );
    }

    #[test]
    fn reshapes_mock_dataset_end_to_end() -> Result<()> {
        init_test_logging();
        let obs = observations(&raw_dataset())?;
        assert_eq!(
            obs.columns,
            vec![
                "Geography",
                "Value",
                "Chargeable homes",
                "Period",
                "Measure Type",
                "Unit"
            ]
        );
        assert_eq!(obs.len(), 2);
        assert_eq!(
            obs.rows[0],
            vec![
                "W06000001",
                "42",
                "1",
                "gregorian-interval/2017-03-31T00:00:00/P1Y",
                "Count",
                "vacancies"
            ]
        );
        // the malformed upstream code is relabeled
        assert_eq!(obs.rows[1][2], "Adash");
        // no row has an empty mandated cell
        for row in &obs.rows {
            for cell in row {
                assert!(!cell.is_empty());
            }
        }
        Ok(())
    }

    #[test]
    fn unmapped_columns_never_pass_through() -> Result<()> {
        let obs = observations(&raw_dataset())?;
        assert!(obs.column_index("Authority_Code").is_none());
        Ok(())
    }

    #[test]
    fn duplicate_rows_collapse_and_reshape_is_idempotent() -> Result<()> {
        let mut raw = raw_dataset();
        let dup = raw.rows[0].clone();
        raw.push_row(dup)?;
        let once = observations(&raw)?;
        assert_eq!(once.len(), 2);
        let twice = observations(&raw)?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn missing_mapped_column_is_an_error() {
        let t = Table::new(vec!["Data".to_string()]);
        assert!(observations(&t).is_err());
    }
}
