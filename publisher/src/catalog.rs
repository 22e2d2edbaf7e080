//! Scrapes the catalog: the list page first, then every entity's detail page.

use dexpush_types::{Catalog, Entity};
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::PublisherConfig;
use crate::errors::FetchError;
use crate::utils::site_page_url;

/// Compiled selectors describing where entities live in the site's markup.
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    entry: Selector,
    link: Selector,
    detail: Selector,
}

impl CatalogSelectors {
    pub fn new(entry: &str, link: &str, detail: &str) -> Result<Self, FetchError> {
        Ok(Self {
            entry: compile(entry)?,
            link: compile(link)?,
            detail: compile(detail)?,
        })
    }

    pub fn from_config(config: &PublisherConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.entry_selector,
            &config.link_selector,
            &config.detail_selector,
        )
    }
}

fn compile(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector).map_err(|err| FetchError::Selector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

pub struct CatalogFetcher {
    client: Client,
    site_url: Url,
    list_path: String,
    selectors: CatalogSelectors,
}

impl CatalogFetcher {
    pub fn new(client: Client, config: &PublisherConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            site_url: config.site_url.clone(),
            list_path: config.list_path.clone(),
            selectors: CatalogSelectors::from_config(config)?,
        })
    }

    /// Downloads the list page and every detail page.
    ///
    /// The first failing detail page aborts the whole fetch; no partial
    /// catalog is ever returned.
    #[instrument(skip(self), fields(site = %self.site_url))]
    pub async fn fetch_catalog(&self) -> Result<Catalog, FetchError> {
        let list_url = site_page_url(&self.site_url, &self.list_path)?;
        let list_page = self.get_page(&list_url).await?;

        let mut catalog = parse_catalog_page(&list_page, &self.selectors);
        info!(entities = catalog.len(), "catalog list parsed");

        for entity in catalog.iter_mut() {
            let url = site_page_url(&self.site_url, &entity.detail_path)?;
            let page = self.get_page(&url).await?;
            entity.detail_html = extract_detail_html(&page, &self.selectors);
            debug!(
                name = %entity.name,
                bytes = entity.detail_html.len(),
                "detail page fetched"
            );
        }

        info!(entities = catalog.len(), "catalog fetched");
        Ok(catalog)
    }

    async fn get_page(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %url, status = status.as_u16(), "status code error");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

/// Extracts one entity per info block, in document order.
///
/// Blocks without a named link are skipped.
pub fn parse_catalog_page(html: &str, selectors: &CatalogSelectors) -> Catalog {
    let document = Html::parse_document(html);
    let mut catalog = Catalog::new();

    for block in document.select(&selectors.entry) {
        let Some(link) = block.select(&selectors.link).next() else {
            warn!("info block without a link, skipping");
            continue;
        };

        let name = link.text().collect::<String>().trim().to_string();
        let path = link.value().attr("href").unwrap_or_default().trim();
        if name.is_empty() || path.is_empty() {
            warn!(name = %name, path = %path, "incomplete info block, skipping");
            continue;
        }

        catalog.push(Entity::new(name, path));
    }

    catalog
}

/// Inner markup of the detail page's main content, or an empty string if the
/// page has none.
pub fn extract_detail_html(html: &str, selectors: &CatalogSelectors) -> String {
    let document = Html::parse_document(html);
    document
        .select(&selectors.detail)
        .next()
        .map(|main| main.inner_html())
        .unwrap_or_default()
}
