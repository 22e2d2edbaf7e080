use std::time::Duration;

use clap::Args;
use url::Url;

pub const DEFAULT_SITE_URL: &str = "https://pokemondb.net";
pub const DEFAULT_LIST_PATH: &str = "/pokedex/national";
pub const DEFAULT_ENTRY_SELECTOR: &str = ".infocard .infocard-lg-data.text-muted";
pub const DEFAULT_LINK_SELECTOR: &str = "a";
pub const DEFAULT_DETAIL_SELECTOR: &str = "#main";
pub const DEFAULT_PUSH_API_URL: &str = "https://api.cloud.coveo.com";

/// Settings shared by every binary that scrapes the catalog and pushes it.
#[derive(Debug, Clone, Args)]
pub struct PublisherConfig {
    /// Base URL of the site the catalog is scraped from. Page paths are
    /// appended to it, so a path prefix such as `/mirror` is kept.
    #[arg(long, env = "CATALOG_SITE_URL", default_value = DEFAULT_SITE_URL)]
    pub site_url: Url,
    /// Path of the page listing every entity.
    #[arg(long, env = "CATALOG_LIST_PATH", default_value = DEFAULT_LIST_PATH)]
    pub list_path: String,
    /// CSS selector matching one info block per entity on the list page.
    #[arg(long, env = "CATALOG_ENTRY_SELECTOR", default_value = DEFAULT_ENTRY_SELECTOR)]
    pub entry_selector: String,
    /// CSS selector for the detail link inside an info block.
    #[arg(long, env = "CATALOG_LINK_SELECTOR", default_value = DEFAULT_LINK_SELECTOR)]
    pub link_selector: String,
    /// CSS selector for the main content of a detail page.
    #[arg(long, env = "CATALOG_DETAIL_SELECTOR", default_value = DEFAULT_DETAIL_SELECTOR)]
    pub detail_selector: String,
    /// Base URL of the push API.
    #[arg(long, env = "PUSH_API_URL", default_value = DEFAULT_PUSH_API_URL)]
    pub push_api_url: Url,
    /// Organization that owns the push source.
    #[arg(long, env = "PUSH_ORGANIZATION_ID")]
    pub organization_id: String,
    /// Push source receiving the documents.
    #[arg(long, env = "PUSH_SOURCE_ID")]
    pub source_id: String,
    /// Pause after every direct push (e.g. "5ms"). Zero disables it.
    #[arg(long, env = "PUSH_DELAY", default_value = "5ms", value_parser = humantime::parse_duration)]
    pub push_delay: Duration,
    /// Timeout applied to every outbound request. Unset means no timeout.
    #[arg(long, env = "REQUEST_TIMEOUT", value_parser = humantime::parse_duration)]
    pub request_timeout: Option<Duration>,
}

impl PublisherConfig {
    /// Configuration with the stock catalog layout, for the given push target.
    pub fn new(site_url: Url, push_api_url: Url, organization_id: &str, source_id: &str) -> Self {
        Self {
            site_url,
            list_path: DEFAULT_LIST_PATH.to_string(),
            entry_selector: DEFAULT_ENTRY_SELECTOR.to_string(),
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            detail_selector: DEFAULT_DETAIL_SELECTOR.to_string(),
            push_api_url,
            organization_id: organization_id.to_string(),
            source_id: source_id.to_string(),
            push_delay: Duration::from_millis(5),
            request_timeout: None,
        }
    }
}

/// Push API endpoints derived from the base URL and the organization/source ids.
#[derive(Debug, Clone)]
pub struct PushEndpoints {
    pub documents: Url,
    pub files: Url,
    pub batch: Url,
}

impl PushEndpoints {
    pub fn new(config: &PublisherConfig) -> Result<Self, url::ParseError> {
        let trimmed = config.push_api_url.as_str().trim_end_matches('/');
        let organization = format!("{}/push/v1/organizations/{}", trimmed, config.organization_id);
        let source = format!("{}/sources/{}", organization, config.source_id);

        Ok(Self {
            documents: Url::parse(&format!("{}/documents", source))?,
            files: Url::parse(&format!("{}/files", organization))?,
            batch: Url::parse(&format!("{}/documents/batch", source))?,
        })
    }
}
