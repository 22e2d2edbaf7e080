pub mod catalog;
pub mod cli;
pub mod config;
pub mod direct;
pub mod errors;
pub mod push;
pub mod staged;
pub mod utils;

pub use catalog::{CatalogFetcher, CatalogSelectors};
pub use cli::run;
pub use config::{PublisherConfig, PushEndpoints};
pub use direct::DirectReport;
pub use errors::{FetchError, PushError, StagedPublishError};
pub use push::PushClient;
pub use staged::build_bulk_payload;
