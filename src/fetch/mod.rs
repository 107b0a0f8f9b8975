// src/fetch/mod.rs

pub mod cache;
pub mod odata;

pub use cache::HttpCache;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// OData service root for the open data endpoint.
static ODATA_BASE: &str = "http://open.statswales.gov.wales";

/// Dataset id used when the catalogue page yields no dataset link.
static FALLBACK_DATASET_ID: &str = "lgfs0001";

/// Responses are reused from disk for this long.
const CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// An HTTP client that routes every GET through the on-disk response cache.
pub struct CachedClient {
    client: Client,
    cache: HttpCache,
}

impl CachedClient {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            cache: HttpCache::new(cache_dir, CACHE_TTL)?,
        })
    }

    /// GET `url`, serving from the cache when a fresh entry exists.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(body) = self.cache.get(url) {
            debug!(%url, "cache hit");
            return Ok(body);
        }
        debug!(%url, "cache miss");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("non-success status from {}", url))?;
        let body = resp
            .bytes()
            .await
            .with_context(|| format!("reading body from {}", url))?;
        self.cache.put(url, &body)?;
        Ok(body.to_vec())
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let bytes = self.get_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// One named downloadable artifact of the dataset.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub title: String,
    pub download_url: String,
    pub media_type: String,
}

impl Distribution {
    /// Download this distribution and parse its OData payload into a table.
    pub async fn as_table(&self, http: &CachedClient) -> Result<crate::table::Table> {
        odata::fetch_table(http, &self.download_url)
            .await
            .with_context(|| format!("fetching distribution {:?}", self.title))
    }
}

/// Descriptive fields scraped from the catalogue landing page (or
/// defaulted). The pipeline enriches these before the metadata document is
/// written.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub title: String,
    pub comment: String,
}

/// One catalogue dataset page, resolved to its distributions.
pub struct Scraper {
    pub dataset: DatasetInfo,
    pub distributions: Vec<Distribution>,
}

impl Scraper {
    /// Fetch the catalogue page and resolve the dataset's distributions.
    /// When the page carries no dataset link, the distributions are
    /// synthesized from the fixed OData endpoints.
    pub async fn collect(http: &CachedClient, catalogue_url: &str) -> Result<Self> {
        let html = http
            .get_text(catalogue_url)
            .await
            .with_context(|| format!("fetching catalogue page {}", catalogue_url))?;
        let doc = Html::parse_document(&html);

        let dataset = scrape_dataset_info(&doc);
        let dataset_id = match scrape_dataset_id(&doc, catalogue_url) {
            Some(id) => id,
            None => {
                warn!(
                    fallback = FALLBACK_DATASET_ID,
                    "no dataset link on catalogue page"
                );
                FALLBACK_DATASET_ID.to_string()
            }
        };
        let distributions = distributions_for(&dataset_id);
        info!(
            id = %dataset_id,
            title = %dataset.title,
            count = distributions.len(),
            "collected catalogue entry"
        );
        Ok(Self {
            dataset,
            distributions,
        })
    }

    /// Look up a distribution by exact title.
    pub fn distribution(&self, title: &str) -> Result<&Distribution> {
        match self.distributions.iter().find(|d| d.title == title) {
            Some(d) => Ok(d),
            None => bail!("no distribution titled {:?}", title),
        }
    }
}

fn scrape_dataset_info(doc: &Html) -> DatasetInfo {
    let title_sel = Selector::parse("title").expect("CSS selector for title should be valid");
    let desc_sel = Selector::parse(r#"meta[name="description"]"#)
        .expect("CSS selector for description should be valid");

    let title = doc
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Chargeable, empty and second homes by local authority".to_string());
    let comment = doc
        .select(&desc_sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    DatasetInfo { title, comment }
}

/// Find the first anchor into the OData endpoint and pull the dataset id
/// off its `/dataset/<id>` path tail.
fn scrape_dataset_id(doc: &Html, catalogue_url: &str) -> Option<String> {
    let sel = Selector::parse(r#"a[href*="open.statswales.gov.wales"]"#)
        .expect("CSS selector for dataset links should be valid");
    let base = Url::parse(catalogue_url).ok()?;
    for el in doc.select(&sel) {
        let href = match el.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        let full = match base.join(href) {
            Ok(u) => u,
            Err(_) => continue,
        };
        let path = full.path().to_ascii_lowercase();
        if let Some(idx) = path.rfind("/dataset/") {
            let id = path[idx + "/dataset/".len()..].trim_matches('/').to_string();
            if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
                debug!(url = %full, id = %id, "found dataset link");
                return Some(id);
            }
        }
    }
    None
}

/// The three named distributions, derived from the dataset id.
fn distributions_for(dataset_id: &str) -> Vec<Distribution> {
    let id = dataset_id.to_ascii_lowercase();
    vec![
        Distribution {
            title: "Dataset".to_string(),
            download_url: format!("{}/en-gb/dataset/{}", ODATA_BASE, id),
            media_type: "application/json".to_string(),
        },
        Distribution {
            title: "Items".to_string(),
            download_url: format!(
                "{}/en-gb/discover/itemsbydataset?$filter=Dataset%20eq%20%27{}%27",
                ODATA_BASE, id
            ),
            media_type: "application/json".to_string(),
        },
        Distribution {
            title: "Metadata".to_string(),
            download_url: format!(
                "{}/en-gb/discover/metadata?$filter=Dataset%20eq%20%27{}%27",
                ODATA_BASE, id
            ),
            media_type: "application/json".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
        <head>
          <title>Chargeable empty and second homes, by local authority</title>
          <meta name="description" content="Dwellings liable for council tax.">
        </head>
        <body>
          <a href="http://open.statswales.gov.wales/en-gb/dataset/LGFS0001">API</a>
        </body>
      </html>"#;

    #[test]
    fn scrapes_title_description_and_dataset_id() {
        let doc = Html::parse_document(PAGE);
        let info = scrape_dataset_info(&doc);
        assert_eq!(
            info.title,
            "Chargeable empty and second homes, by local authority"
        );
        assert_eq!(info.comment, "Dwellings liable for council tax.");
        let id = scrape_dataset_id(&doc, "https://statswales.gov.wales/Catalogue/x");
        assert_eq!(id.as_deref(), Some("lgfs0001"));
    }

    #[test]
    fn page_without_dataset_link_yields_none() {
        let doc = Html::parse_document("<html><body><a href=\"/other\">x</a></body></html>");
        assert!(scrape_dataset_id(&doc, "https://statswales.gov.wales/Catalogue/x").is_none());
    }

    #[test]
    fn distributions_carry_the_three_titles() {
        let dists = distributions_for("LGFS0001");
        let titles: Vec<&str> = dists.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Dataset", "Items", "Metadata"]);
        assert_eq!(
            dists[0].download_url,
            "http://open.statswales.gov.wales/en-gb/dataset/lgfs0001"
        );
        assert!(dists[1].download_url.contains("itemsbydataset"));
        assert!(dists.iter().all(|d| d.media_type == "application/json"));
    }
}
