//! Error types for fetching the catalog and pushing it.
//!
//! The `Display` of the user-facing variants is the fixed message returned to
//! callers. The underlying cause is kept in the `#[source]` chain for logs.

use reqwest::StatusCode;
use thiserror::Error;

pub const ERROR_CATALOG_RETRIEVAL: &str = "Failed to retrieve catalog";
pub const ERROR_NO_ACCESS_TOKEN: &str = "No access_token parameter were given";
pub const ERROR_CREATING_STAGING: &str = "Couldn't create the s3 container";
pub const ERROR_CREATING_PAYLOAD: &str = "Couldn't create the s3 payload";
pub const ERROR_PUSHING_TO_STAGING: &str = "Couldn't push to s3 bucket";
pub const ERROR_PUSHING_TO_INDEX: &str = "Couldn't push to index";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("invalid catalog url: {0}")]
    Url(#[from] url::ParseError),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("status code error: {status} from {url}")]
    Status { url: String, status: StatusCode },
}

impl FetchError {
    /// Message shown to callers regardless of the cause.
    pub fn public_message(&self) -> &'static str {
        ERROR_CATALOG_RETRIEVAL
    }
}

/// Failure of a single call to the push service or the staging storage.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid header `{name}`: {message}")]
    Header { name: String, message: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error: {status} with body {body}")]
    UnexpectedStatus {
        url: String,
        status: StatusCode,
        body: String,
    },
}

#[derive(Debug, Error)]
pub enum StagedPublishError {
    #[error("Couldn't create the s3 container")]
    Allocation(#[source] PushError),

    #[error("Couldn't create the s3 payload")]
    Payload(#[source] url::ParseError),

    #[error("Couldn't push to s3 bucket")]
    Upload(#[source] PushError),

    #[error("Couldn't push to index")]
    Commit(#[source] PushError),
}

impl StagedPublishError {
    /// Name of the step that failed, for log fields.
    pub fn step(&self) -> &'static str {
        match self {
            Self::Allocation(_) => "allocate",
            Self::Payload(_) => "payload",
            Self::Upload(_) => "upload",
            Self::Commit(_) => "commit",
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Allocation(_) => ERROR_CREATING_STAGING,
            Self::Payload(_) => ERROR_CREATING_PAYLOAD,
            Self::Upload(_) => ERROR_PUSHING_TO_STAGING,
            Self::Commit(_) => ERROR_PUSHING_TO_INDEX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_messages_match_display() {
        let err = StagedPublishError::Commit(PushError::UnexpectedStatus {
            url: "http://push/batch".into(),
            status: StatusCode::BAD_REQUEST,
            body: "nope".into(),
        });
        assert_eq!(err.to_string(), err.public_message());
        assert_eq!(err.step(), "commit");

        let err = StagedPublishError::Payload(url::ParseError::EmptyHost);
        assert_eq!(err.to_string(), ERROR_CREATING_PAYLOAD);
    }
}
