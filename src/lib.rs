//! # pyrus - client for the Pyrus task-management REST API
//!
//! A blocking Rust client that turns typed method calls into authenticated
//! HTTP requests and decodes the nested JSON responses into forms, tasks,
//! catalogs, contacts and lists.
//!
//! ## Features
//!
//! - Login / secret key exchange for an access token, obtained lazily
//! - Transparent re-authentication when the token expires (once per call)
//! - Typed responses that keep the original payload for diagnostics
//! - File upload (multipart, up to 250 MiB) and download
//! - Task registry export as CSV
//!
//! ## Basic Usage
//!
//! ```no_run
//! use pyrus::PyrusClient;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PyrusClient::new("bot@example.com", "secret-key")?;
//!
//!     // The token is requested on the first call
//!     let forms = client.get_forms()?.into_result()?;
//!     for form in forms.forms.unwrap_or_default() {
//!         println!("{:?}: {:?}", form.id, form.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Handling API errors
//!
//! Logical errors, including failed authentication, are not `Err`: every
//! call returns a [`Response`] which is either the typed payload or the
//! error payload sent by the server.
//!
//! ```no_run
//! use pyrus::{PyrusClient, Response};
//!
//! let client = PyrusClient::new("bot@example.com", "secret-key")?;
//! match client.get_task(11613)? {
//!     Response::Success { data, .. } => println!("{:?}", data.task),
//!     Response::Error(error) => eprintln!("{:?}: {:?}", error.error_code, error.error),
//! }
//! # Ok::<(), pyrus::PyrusError>(())
//! ```
//!
//! ## Creating a task
//!
//! ```no_run
//! use pyrus::{CreateTaskRequest, FieldUpdate, PyrusClient};
//!
//! let client = PyrusClient::new("bot@example.com", "secret-key")?;
//! let request = CreateTaskRequest::from_form(321, vec![FieldUpdate::by_id(1, "Paper")])
//!     .with_responsible("manager@example.com");
//! let task = client.create_task(&request)?.into_result()?;
//! # Ok::<(), pyrus::PyrusError>(())
//! ```

pub mod client;
pub mod credentials;
pub mod entities;
pub mod error;
pub mod files;
pub mod requests;
pub mod response;
pub mod responses;
pub mod rest;
pub mod time;

// Re-export main types for convenience
pub use client::Config;
pub use credentials::Credentials;
pub use entities::{
    Catalog, CatalogHeader, CatalogItem, FieldKind, Form, FormField, Organization, Person, Task,
    TaskHeader, TaskList, TaskWithComments,
};
pub use error::{PyrusError, Result};
pub use files::MAX_FILE_SIZE_IN_BYTES;
pub use requests::{
    ApprovalChoice, ChannelType, CreateCatalogRequest, CreateTaskRequest, FieldUpdate,
    FormRegisterFilter, FormRegisterRequest, PersonRef, ResponseFormat, SyncCatalogRequest,
    TaskAction, TaskCommentRequest,
};
pub use response::{ErrorBody, RawResponse, Response};
pub use responses::{
    AuthResponse, ContactsResponse, DownloadResponse, FormRegisterResponse, FormsResponse,
    ListsResponse, SyncCatalogResponse, TaskListResponse, TaskResponse, UploadResponse,
};
pub use rest::{HttpMethod, Outcome, PyrusClient, RequestEnvelope};
pub use time::{Date, Time};

// Re-export serde_json for convenience
pub use serde_json::json;
