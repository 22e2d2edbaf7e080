//! In-process stand-in for the catalog site, the push API and the staging
//! storage. Every handler records what it received so tests can assert on
//! call counts and payloads.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
};
use dexpush_publisher::PublisherConfig;
use serde_json::json;
use tokio::net::TcpListener;
use url::Url;

pub const ORGANIZATION: &str = "org";
pub const SOURCE: &str = "src";
pub const FILE_ID: &str = "file-1";

#[derive(Debug, Clone)]
pub struct Behaviour {
    pub list_status: StatusCode,
    pub failing_detail: Option<String>,
    pub failing_pushes: Vec<String>,
    pub allocate_status: StatusCode,
    pub upload_status: StatusCode,
    pub commit_status: StatusCode,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            list_status: StatusCode::OK,
            failing_detail: None,
            failing_pushes: Vec::new(),
            allocate_status: StatusCode::CREATED,
            upload_status: StatusCode::OK,
            commit_status: StatusCode::ACCEPTED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PushedDocument {
    pub document_id: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct Hits {
    pub list: usize,
    pub details: Vec<String>,
    pub pushes: Vec<PushedDocument>,
    pub allocations: usize,
    pub uploads: Vec<Upload>,
    pub commits: Vec<String>,
}

impl Hits {
    pub fn total(&self) -> usize {
        self.list
            + self.details.len()
            + self.pushes.len()
            + self.allocations
            + self.uploads.len()
            + self.commits.len()
    }
}

struct UpstreamState {
    base: String,
    names: Vec<String>,
    behaviour: Behaviour,
    hits: Mutex<Hits>,
}

pub struct FakeUpstream {
    pub base_url: Url,
    state: Arc<UpstreamState>,
}

impl FakeUpstream {
    pub async fn start(names: &[&str], behaviour: Behaviour) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().expect("local addr");
        let base = format!("http://{}", addr);

        let state = Arc::new(UpstreamState {
            base: base.clone(),
            names: names.iter().map(|n| n.to_string()).collect(),
            behaviour,
            hits: Mutex::new(Hits::default()),
        });

        let organization = format!("/push/v1/organizations/{}", ORGANIZATION);
        let documents = format!("{}/sources/{}/documents", organization, SOURCE);
        let app = Router::new()
            .route("/pokedex/national", get(list_page))
            .route("/pokedex/{slug}", get(detail_page))
            .route(&documents, put(push_document))
            .route(&format!("{}/batch", documents), put(commit_batch))
            .route(&format!("{}/files", organization), post(allocate))
            .route("/upload/{file_id}", put(upload))
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: Url::parse(&base).expect("base url"),
            state,
        }
    }

    pub fn config(&self) -> PublisherConfig {
        let mut config = PublisherConfig::new(
            self.base_url.clone(),
            self.base_url.clone(),
            ORGANIZATION,
            SOURCE,
        );
        config.push_delay = Duration::ZERO;
        config
    }

    pub fn hits(&self) -> Hits {
        self.state.hits.lock().expect("hits lock").clone()
    }
}

pub fn slug(name: &str) -> String {
    name.to_lowercase()
}

pub fn detail_markup(name: &str) -> String {
    format!("<h1>{}</h1>", name)
}

fn info_card(name: &str) -> String {
    format!(
        r#"<div class="infocard "><span class="infocard-lg-img"><a href="/pokedex/{slug}"><img alt="{name}"></a></span><span class="infocard-lg-data text-muted"><small>#0000</small><br><a class="ent-name" href="/pokedex/{slug}">{name}</a></span></div>"#,
        slug = slug(name),
        name = name,
    )
}

async fn list_page(State(state): State<Arc<UpstreamState>>) -> Response {
    state.hits.lock().expect("hits lock").list += 1;

    if state.behaviour.list_status != StatusCode::OK {
        return state.behaviour.list_status.into_response();
    }

    let cards: String = state.names.iter().map(|name| info_card(name)).collect();
    Html(format!(
        "<html><body><div class=\"infocard-list\">{}</div></body></html>",
        cards
    ))
    .into_response()
}

async fn detail_page(
    State(state): State<Arc<UpstreamState>>,
    Path(requested): Path<String>,
) -> Response {
    state
        .hits
        .lock()
        .expect("hits lock")
        .details
        .push(requested.clone());

    if state.behaviour.failing_detail.as_deref() == Some(requested.as_str()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.names.iter().find(|name| slug(name) == requested) {
        Some(name) => Html(format!(
            "<html><body><nav>menu</nav><main id=\"main\">{}</main></body></html>",
            detail_markup(name)
        ))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn push_document(
    State(state): State<Arc<UpstreamState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let document_id = params.get("documentId").cloned().unwrap_or_default();
    let failing = state
        .behaviour
        .failing_pushes
        .iter()
        .any(|slug| document_id.ends_with(&format!("/{}", slug)));

    state
        .hits
        .lock()
        .expect("hits lock")
        .pushes
        .push(PushedDocument {
            document_id,
            authorization: header(&headers, "authorization"),
            body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
        });

    if failing {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::ACCEPTED
    }
}

async fn allocate(State(state): State<Arc<UpstreamState>>) -> Response {
    state.hits.lock().expect("hits lock").allocations += 1;

    if state.behaviour.allocate_status != StatusCode::CREATED {
        return (state.behaviour.allocate_status, "quota exceeded").into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "uploadUri": format!("{}/upload/{}", state.base, FILE_ID),
            "fileId": FILE_ID,
            "requiredHeaders": {
                "content-type": "application/octet-stream",
                "x-amz-server-side-encryption": "AES256",
            },
        })),
    )
        .into_response()
}

async fn upload(
    State(state): State<Arc<UpstreamState>>,
    Path(_file_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    state
        .hits
        .lock()
        .expect("hits lock")
        .uploads
        .push(Upload { headers, body });
    state.behaviour.upload_status
}

async fn commit_batch(
    State(state): State<Arc<UpstreamState>>,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    state
        .hits
        .lock()
        .expect("hits lock")
        .commits
        .push(params.get("fileId").cloned().unwrap_or_default());
    state.behaviour.commit_status
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}
