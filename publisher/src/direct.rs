//! Pushes the catalog one document at a time.

use dexpush_types::{Catalog, DocumentBody, Entity};
use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use crate::errors::PushError;
use crate::push::{EMPTY_JSON_OBJECT, PushClient, send_expecting, with_auth_headers};
use crate::utils::site_page_url;

const FAILURE_HEADER: &str = "The following documents couldn't be pushed :";

/// Outcome of a direct publish: how many entities were tried and which failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectReport {
    pub attempted: usize,
    pub failed: Vec<Entity>,
}

impl DirectReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// `{}` when every push succeeded, otherwise a header line followed by one
    /// `{"data":"<name>"}` line per failed entity.
    pub fn render(&self) -> String {
        if self.failed.is_empty() {
            return EMPTY_JSON_OBJECT.to_string();
        }

        let mut out = String::from(FAILURE_HEADER);
        out.push('\n');
        for entity in &self.failed {
            let line = serde_json::to_string(&DocumentBody::new(entity.name.as_str()))
                .unwrap_or_else(|_| format!("{{\"data\":{:?}}}", entity.name));
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl PushClient {
    /// PUTs every entity's detail markup as its own document.
    ///
    /// Failures are collected and never stop the loop. The configured push
    /// delay follows every attempt.
    #[instrument(skip(self, catalog, access_token), fields(entities = catalog.len()))]
    pub async fn publish_direct(&self, catalog: &Catalog, access_token: &str) -> DirectReport {
        let mut report = DirectReport::default();

        for entity in catalog {
            report.attempted += 1;
            if let Err(err) = self.push_document(entity, access_token).await {
                warn!(name = %entity.name, error = %err, "document push failed");
                report.failed.push(entity.clone());
            }

            if !self.push_delay.is_zero() {
                tokio::time::sleep(self.push_delay).await;
            }
        }

        info!(
            attempted = report.attempted,
            failed = report.failed.len(),
            "direct publish finished"
        );
        report
    }

    /// Pushes one entity, identified by its absolute detail URL.
    pub async fn push_document(
        &self,
        entity: &Entity,
        access_token: &str,
    ) -> Result<(), PushError> {
        let document_id = site_page_url(&self.site_url, &entity.detail_path)?;
        let body = serde_json::to_vec(&DocumentBody::new(entity.detail_html.as_str()))?;

        let url = &self.endpoints.documents;
        let request = self
            .client
            .put(url.clone())
            .query(&[("documentId", document_id.as_str())])
            .body(body);

        send_expecting(
            with_auth_headers(request, access_token),
            url,
            StatusCode::ACCEPTED,
        )
        .await?;
        Ok(())
    }
}
