use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// File extension the push service uses to pick a converter for uploaded documents.
pub const HTML_FILE_EXTENSION: &str = ".html";

// One scraped record. `detail_html` is filled in after the detail page is fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub detail_path: String,
    #[serde(default)]
    pub detail_html: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, detail_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail_path: detail_path.into(),
            detail_html: String::new(),
        }
    }
}

/// Ordered list of scraped entities, in the order they appear on the list page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "data")]
    pub entities: Vec<Entity>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }
}

impl From<Vec<Entity>> for Catalog {
    fn from(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

/// Single-field document body, used for direct pushes and the failure dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBody {
    pub data: String,
}

impl DocumentBody {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Temporary upload handle issued by the push service for a bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingTarget {
    pub upload_uri: String,
    pub file_id: String,
    #[serde(default)]
    pub required_headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPayload {
    pub add_or_update: Vec<UpsertDocument>,
    pub delete: Vec<DeleteDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDocument {
    pub document_id: String,
    pub data: String,
    pub file_extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDocument {
    pub document_id: String,
    pub delete_children: bool,
}
