use anyhow::{Context, Result};
use reqwest::Client;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use crate::config::PublisherConfig;

pub fn init_tracing(verbosity: u8) -> Result<()> {
    let default_directive = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let subscriber = fmt().with_env_filter(filter).with_target(true).finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!("tracing subscriber already initialized");
    }

    Ok(())
}

/// Builds the pooled HTTP client used for both scraping and pushing.
pub fn build_http_client(config: &PublisherConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!("dexpush/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build HTTP client")
}

/// Appends a site-relative path to the catalog site, keeping any path prefix
/// the site URL carries. Paths that already name a scheme are used as-is.
pub fn site_page_url(site_url: &Url, path: &str) -> Result<Url, url::ParseError> {
    if path.contains("://") {
        return Url::parse(path);
    }

    let base = site_url.as_str().trim_end_matches('/');
    Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))
}

/// Path plus query of a URL, e.g. `/pokedex/bulbasaur`.
pub fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_and_absolute_paths() {
        let site = Url::parse("https://pokemondb.net").unwrap();
        assert_eq!(
            site_page_url(&site, "/pokedex/bulbasaur").unwrap().as_str(),
            "https://pokemondb.net/pokedex/bulbasaur"
        );
        assert_eq!(
            site_page_url(&site, "pokedex/ivysaur").unwrap().as_str(),
            "https://pokemondb.net/pokedex/ivysaur"
        );
        assert_eq!(
            site_page_url(&site, "https://mirror.example/pokedex/mew")
                .unwrap()
                .as_str(),
            "https://mirror.example/pokedex/mew"
        );
    }

    #[test]
    fn keeps_site_path_prefix() {
        let site = Url::parse("https://mirror.example/pokedb/").unwrap();
        assert_eq!(
            site_page_url(&site, "/pokedex/national").unwrap().as_str(),
            "https://mirror.example/pokedb/pokedex/national"
        );

        let site = Url::parse("https://mirror.example/pokedb").unwrap();
        assert_eq!(
            site_page_url(&site, "/pokedex/mew").unwrap().as_str(),
            "https://mirror.example/pokedb/pokedex/mew"
        );
    }

    #[test]
    fn request_uri_keeps_query() {
        let url = Url::parse("https://pokemondb.net/pokedex/mr-mime?form=galar").unwrap();
        assert_eq!(request_uri(&url), "/pokedex/mr-mime?form=galar");

        let url = Url::parse("https://pokemondb.net/pokedex/mew").unwrap();
        assert_eq!(request_uri(&url), "/pokedex/mew");
    }
}
