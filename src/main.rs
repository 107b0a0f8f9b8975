use anyhow::Result;
use chrono::Utc;
use statscraper::{
    fetch::{CachedClient, Scraper},
    metadata::{self, DatasetMetadata},
    reshape::{self, codelists},
    schema,
};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Catalogue page for the dataset this run packages.
static CATALOGUE_URL: &str = "https://statswales.gov.wales/Catalogue/Local-Government/Finance/Council-Tax/Dwellings/chargeableemptyandsecondhomesbylocalauthority";

/// Canonical reference-data base URL the sidecar templates resolve against.
static REFERENCE_BASE: &str = "https://ons-opendata.github.io/ref_housing/";

/// Dimensions to derive code lists for from the "Items" table.
static TARGET_DIMENSIONS: &[&str] = &["Chargeable homes"];

static GOV_WELSH_GOVERNMENT: &str =
    "https://www.gov.uk/government/organisations/welsh-government";
static OGL_V3: &str = "http://www.nationalarchives.gov.uk/doc/open-government-licence/version/3/";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let out_dir = Path::new("out");
    let reference_dir = Path::new("reference");
    let codelists_dir = reference_dir.join("codelists");
    fs::create_dir_all(out_dir)?;
    if reference_dir.exists() {
        // reference output is rebuilt from scratch each run
        fs::remove_dir_all(reference_dir)?;
    }
    fs::create_dir_all(&codelists_dir)?;

    let http = CachedClient::new(".cache")?;

    // ─── 3) collect the catalogue entry ──────────────────────────────
    let scraper = Scraper::collect(&http, CATALOGUE_URL).await?;

    // ─── 4) fetch + reshape + write observations ─────────────────────
    let raw = scraper.distribution("Dataset")?.as_table(&http).await?;
    info!(rows = raw.len(), cols = raw.columns.len(), "fetched dataset table");
    let observations = reshape::observations(&raw)?;
    info!(rows = observations.len(), "reshaped observations");
    let observations_csv = out_dir.join("observations.csv");
    observations.write_csv(&observations_csv)?;

    // ─── 5) derive + write code lists ────────────────────────────────
    let items = scraper.distribution("Items")?.as_table(&http).await?;
    info!(rows = items.len(), "fetched items table");
    let lists = codelists::derive(&items, TARGET_DIMENSIONS)?;
    for list in &lists {
        let path = codelists_dir.join(format!("{}.csv", list.slug()));
        list.table.write_csv(&path)?;
        info!(dimension = %list.dimension, rows = list.table.len(), "wrote code list");
    }
    schema::write_columns(&reference_dir.join("columns.csv"), REFERENCE_BASE)?;
    schema::write_components(&reference_dir.join("components.csv"), REFERENCE_BASE)?;
    schema::write_codelists_metadata(
        &reference_dir.join("codelists-metadata.json"),
        &lists,
        REFERENCE_BASE,
    )?;

    // ─── 6) schema sidecar for the observation CSV ───────────────────
    schema::create(
        &observations_csv,
        &out_dir.join("observations.csv-schema.json"),
        REFERENCE_BASE,
    )?;

    // ─── 7) upstream metadata notes, surfaced in logs only ───────────
    match scraper.distribution("Metadata") {
        Ok(dist) => match dist.as_table(&http).await {
            Ok(notes) => info!(rows = notes.len(), "upstream metadata notes"),
            Err(e) => warn!(error = %e, "metadata distribution unavailable"),
        },
        Err(e) => warn!(error = %e, "no metadata distribution"),
    }

    // ─── 8) dataset metadata document ────────────────────────────────
    let meta = DatasetMetadata {
        graph_uri: "http://gss-data.org.uk/graph/housing/chargeable-empty-and-second-homes"
            .to_string(),
        dataset_uri: "http://gss-data.org.uk/data/housing/chargeable-empty-and-second-homes"
            .to_string(),
        title: scraper.dataset.title.clone(),
        comment: scraper.dataset.comment.clone(),
        publisher_uri: GOV_WELSH_GOVERNMENT.to_string(),
        // creator mirrors the publisher
        creator_uri: GOV_WELSH_GOVERNMENT.to_string(),
        contact_point: "mailto:stats.housing@gov.wales".to_string(),
        family: "housing".to_string(),
        theme_uri: metadata::THEME_HOUSING_PLANNING_LOCAL_SERVICES.to_string(),
        license_uri: OGL_V3.to_string(),
        issued: None,
        modified: Utc::now(),
    };
    metadata::write_trig(&meta, &out_dir.join("dataset.trig"))?;

    info!("all done");
    Ok(())
}
