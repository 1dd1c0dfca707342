//! Typed payloads of each endpoint. Wrapped in `Response<T>`, which carries
//! the error side and the original payload.

use crate::entities::{
    Catalog, CatalogHeader, CatalogItem, Form, Organization, Task, TaskHeader, TaskList,
    TaskWithComments,
};
use serde::Deserialize;

/// Result of `/auth`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    /// User's access token
    pub access_token: String,
}

/// Result of `/forms`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormsResponse {
    pub forms: Option<Vec<Form>>,
}

/// Result of `/forms/{id}`
pub type FormResponse = Form;

/// Result of `/catalogs/{id}` and catalog creation
pub type CatalogResponse = Catalog;

/// Result of task creation, lookup and commenting
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskResponse {
    pub task: Option<TaskWithComments>,
}

/// Result of `/contacts`, grouped by organization
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactsResponse {
    pub organizations: Option<Vec<Organization>>,
}

/// Result of `/forms/{id}/register`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormRegisterResponse {
    pub tasks: Option<Vec<Task>>,
    /// Verbatim body when CSV output was requested
    #[serde(skip)]
    pub csv: Option<String>,
}

/// Result of `/files/upload`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    /// Identifier used to attach the file to tasks
    pub guid: Option<String>,
    pub md5_hash: Option<String>,
}

/// Result of `/lists`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListsResponse {
    pub lists: Option<Vec<TaskList>>,
}

/// Result of `/lists/{id}/tasks`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Option<Vec<TaskHeader>>,
    /// True when the list holds more tasks than were returned
    pub has_more: Option<bool>,
}

/// A downloaded file
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResponse {
    pub filename: String,
    pub raw_file: Vec<u8>,
}

/// Result of a catalog sync
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SyncCatalogResponse {
    /// Whether the changes were applied
    pub apply: Option<bool>,
    pub added: Option<Vec<CatalogItem>>,
    pub deleted: Option<Vec<CatalogItem>>,
    pub updated: Option<Vec<CatalogItem>>,
    pub catalog_headers: Option<Vec<CatalogHeader>>,
}
