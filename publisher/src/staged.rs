//! Bulk publishing: allocate a staging file, upload every document in one
//! payload, then ask the push service to index that file.

use dexpush_types::{BulkPayload, Catalog, HTML_FILE_EXTENSION, StagingTarget, UpsertDocument};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::{PushError, StagedPublishError};
use crate::push::{EMPTY_JSON_OBJECT, PushClient, send_expecting, with_auth_headers};
use crate::utils::{site_page_url, request_uri};

impl PushClient {
    /// Runs the four staged steps in order, stopping at the first failure.
    #[instrument(skip(self, catalog, access_token), fields(entities = catalog.len()))]
    pub async fn publish_staged(
        &self,
        catalog: &Catalog,
        access_token: &str,
    ) -> Result<(), StagedPublishError> {
        let result = self.run_staged(catalog, access_token).await;
        match &result {
            Ok(()) => info!(documents = catalog.len(), "staged publish finished"),
            Err(err) => {
                let cause = std::error::Error::source(err)
                    .map(|source| source.to_string())
                    .unwrap_or_default();
                error!(step = err.step(), error = %err, cause = %cause, "staged publish failed");
            }
        }
        result
    }

    async fn run_staged(
        &self,
        catalog: &Catalog,
        access_token: &str,
    ) -> Result<(), StagedPublishError> {
        let target = self
            .allocate_staging(access_token)
            .await
            .map_err(StagedPublishError::Allocation)?;

        let payload =
            build_bulk_payload(catalog, &self.site_url).map_err(StagedPublishError::Payload)?;

        self.upload_payload(&target, &payload)
            .await
            .map_err(StagedPublishError::Upload)?;

        self.commit_batch(access_token, &target.file_id)
            .await
            .map_err(StagedPublishError::Commit)?;

        Ok(())
    }

    /// Asks the push service for a temporary upload target.
    pub async fn allocate_staging(&self, access_token: &str) -> Result<StagingTarget, PushError> {
        let url = &self.endpoints.files;
        let request = self.client.post(url.clone()).body(EMPTY_JSON_OBJECT);

        let response = send_expecting(
            with_auth_headers(request, access_token),
            url,
            StatusCode::CREATED,
        )
        .await?;

        let target: StagingTarget = response.json().await.map_err(|source| PushError::Decode {
            url: url.to_string(),
            source,
        })?;
        debug!(file_id = %target.file_id, "staging target allocated");
        Ok(target)
    }

    /// Uploads the payload with exactly the headers the storage service asked for.
    pub async fn upload_payload(
        &self,
        target: &StagingTarget,
        payload: &BulkPayload,
    ) -> Result<(), PushError> {
        let url = Url::parse(&target.upload_uri)?;
        let headers = required_headers(target)?;
        let body = serde_json::to_vec(payload)?;

        debug!(
            documents = payload.add_or_update.len(),
            bytes = body.len(),
            "uploading bulk payload"
        );

        let request = self.client.put(url.clone()).headers(headers).body(body);
        send_expecting(request, &url, StatusCode::OK).await?;
        Ok(())
    }

    /// Tells the push service to index the uploaded file.
    pub async fn commit_batch(&self, access_token: &str, file_id: &str) -> Result<(), PushError> {
        let url = &self.endpoints.batch;
        let request = self
            .client
            .put(url.clone())
            .query(&[("fileId", file_id)])
            .body(EMPTY_JSON_OBJECT);

        send_expecting(
            with_auth_headers(request, access_token),
            url,
            StatusCode::ACCEPTED,
        )
        .await?;
        Ok(())
    }
}

/// One upsert per entity, keyed by the request URI of its detail page. The
/// delete list is always empty.
pub fn build_bulk_payload(
    catalog: &Catalog,
    site_url: &Url,
) -> Result<BulkPayload, url::ParseError> {
    let add_or_update = catalog
        .iter()
        .map(|entity| -> Result<UpsertDocument, url::ParseError> {
            let url = site_page_url(site_url, &entity.detail_path)?;
            Ok(UpsertDocument {
                document_id: request_uri(&url),
                data: entity.detail_html.clone(),
                file_extension: HTML_FILE_EXTENSION.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BulkPayload {
        add_or_update,
        delete: Vec::new(),
    })
}

fn required_headers(target: &StagingTarget) -> Result<HeaderMap, PushError> {
    let mut headers = HeaderMap::with_capacity(target.required_headers.len());
    for (name, value) in &target.required_headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| PushError::Header {
                name: name.clone(),
                message: err.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|err| PushError::Header {
            name: name.clone(),
            message: err.to_string(),
        })?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}
