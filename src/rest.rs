use crate::client::{create_rest_client, Config};
use crate::credentials::Credentials;
use crate::entities::{Catalog, Form};
use crate::error::Result;
use crate::files::{check_upload_size, upload_form};
use crate::requests::{
    AuthRequest, CreateCatalogRequest, CreateTaskRequest, FormRegisterRequest, SyncCatalogRequest,
    TaskCommentRequest,
};
use crate::response::{ErrorBody, RawResponse, Response};
use crate::responses::{
    AuthResponse, ContactsResponse, DownloadResponse, FormRegisterResponse, FormsResponse,
    ListsResponse, SyncCatalogResponse, TaskListResponse, TaskResponse, UploadResponse,
};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Default number of tasks requested from a task list
pub const DEFAULT_ITEM_COUNT: u32 = 200;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
        }
    }
}

/// Everything needed to issue one API call, built once per call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub url: String,
    pub method: HttpMethod,
    /// JSON body
    pub body: Option<Value>,
    /// File sent as multipart form data instead of a JSON body
    pub file_path: Option<PathBuf>,
}

impl RequestEnvelope {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        RequestEnvelope {
            url: url.into(),
            method,
            body: None,
            file_path: None,
        }
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// Terminal result of the request executor
#[derive(Debug)]
pub enum Outcome {
    /// The call went through, with whatever status the server returned
    Completed(RawResponse),
    /// Authentication failed; the auth error replaces the call's result
    AuthFailed(ErrorBody),
}

/// States of a single call. At most one re-authentication happens per call.
#[derive(Debug)]
enum State {
    NoToken,
    Executing { retried: bool },
    Retrying,
    Done(RawResponse),
    Failed(ErrorBody),
}

/// Blocking client for the Pyrus API
pub struct PyrusClient {
    /// HTTP client
    pub client: Client,
    /// Configuration
    pub config: Config,
    credentials: Mutex<Credentials>,
}

impl PyrusClient {
    /// Create a client for the given login and secret key with default configuration
    pub fn new(login: impl Into<String>, security_key: impl Into<String>) -> Result<Self> {
        Ok(Self::with_config(Config::default())?.with_credentials(Credentials::new(login, security_key)))
    }

    /// Create a client with custom configuration and no credentials
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(PyrusClient {
            client: create_rest_client(&config)?,
            config,
            credentials: Mutex::new(Credentials::default()),
        })
    }

    /// Replace the credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        *self
            .credentials
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = credentials;
        self
    }

    /// Use an access token obtained earlier
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.credentials
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .access_token = Some(access_token.into());
        self
    }

    fn credentials(&self) -> MutexGuard<'_, Credentials> {
        self.credentials.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current access token, if any
    pub fn access_token(&self) -> Option<String> {
        self.credentials().access_token.clone()
    }

    fn has_token(&self) -> bool {
        self.credentials().has_token()
    }

    /// Exchange login and secret key for an access token.
    ///
    /// Supplied values replace the stored ones first. The stored token is
    /// replaced on success and cleared on failure.
    pub fn auth(
        &self,
        login: Option<&str>,
        security_key: Option<&str>,
    ) -> Result<Response<AuthResponse>> {
        {
            let mut creds = self.credentials();
            if let Some(login) = login {
                creds.login = Some(login.to_string());
            }
            if let Some(key) = security_key {
                creds.security_key = Some(key.to_string());
            }
        }
        self.authenticate()
    }

    fn authenticate(&self) -> Result<Response<AuthResponse>> {
        let body = {
            let creds = self.credentials();
            AuthRequest {
                login: creds.login.clone(),
                security_key: creds.security_key.clone(),
            }
        };

        let url = self.config.api_url("/auth");
        let start = Instant::now();
        let http_response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&body)?)
            .send()?;
        let status = http_response.status();
        let raw = RawResponse {
            status: status.as_u16(),
            headers: http_response.headers().clone(),
            body: http_response.bytes()?.to_vec(),
        };
        debug!(url = %url, status = raw.status, elapsed = ?start.elapsed(), "auth request");

        // A reply that is not JSON is kept as text in the error payload
        let value: Value = serde_json::from_slice(&raw.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&raw.body).into_owned()));
        let token = if status.is_success() {
            value
                .get("access_token")
                .and_then(Value::as_str)
                .map(str::to_string)
        } else {
            None
        };

        let mut creds = self.credentials();
        match token {
            Some(access_token) => {
                creds.access_token = Some(access_token.clone());
                debug!(login = ?creds.login, "obtained access token");
                Ok(Response::Success {
                    data: AuthResponse { access_token },
                    original: value,
                })
            }
            None => {
                creds.access_token = None;
                let error = if status.is_success() {
                    ErrorBody::from_value(value)
                } else {
                    ErrorBody::from_status(raw.status, value)
                };
                warn!(status = raw.status, error = %error.describe(), "authentication failed");
                Ok(Response::Error(error))
            }
        }
    }

    /// Run one call through the authentication state machine.
    ///
    /// A missing token triggers authentication first. A 401 triggers one
    /// re-authentication and exactly one more attempt, whose result is final.
    pub fn execute(&self, envelope: &RequestEnvelope) -> Result<Outcome> {
        let mut state = if self.has_token() {
            State::Executing { retried: false }
        } else {
            State::NoToken
        };

        loop {
            state = match state {
                State::NoToken => match self.authenticate()? {
                    Response::Success { .. } => State::Executing { retried: false },
                    Response::Error(error) => State::Failed(error),
                },
                State::Executing { retried } => {
                    let raw = self.send(envelope)?;
                    if raw.status == 401 && !retried {
                        State::Retrying
                    } else {
                        State::Done(raw)
                    }
                }
                State::Retrying => {
                    warn!(url = %envelope.url, "access token rejected, re-authenticating");
                    match self.authenticate()? {
                        Response::Success { .. } => State::Executing { retried: true },
                        Response::Error(error) => State::Failed(error),
                    }
                }
                State::Done(raw) => return Ok(Outcome::Completed(raw)),
                State::Failed(error) => return Ok(Outcome::AuthFailed(error)),
            };
        }
    }

    /// Issue a single HTTP call with the current token
    fn send(&self, envelope: &RequestEnvelope) -> Result<RawResponse> {
        let token = self.access_token().unwrap_or_default();

        let mut request = self
            .client
            .request(envelope.method.into(), &envelope.url)
            .header(AUTHORIZATION, format!("Bearer {}", token));

        // Multipart requests get their Content-Type, with boundary, from the transport
        if let Some(ref path) = envelope.file_path {
            request = request.multipart(upload_form(path)?);
        } else {
            request = request.header(CONTENT_TYPE, "application/json");
            if let Some(ref body) = envelope.body {
                request = request.body(serde_json::to_vec(body)?);
            }
        }

        let start = Instant::now();
        let http_response = request.send()?;
        let status = http_response.status().as_u16();
        let headers = http_response.headers().clone();
        let body = http_response.bytes()?.to_vec();

        debug!(
            method = ?envelope.method,
            url = %envelope.url,
            status,
            elapsed = ?start.elapsed(),
            "api request"
        );

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Execute a call and decode the JSON body into `T`
    pub fn perform<T: DeserializeOwned>(&self, envelope: RequestEnvelope) -> Result<Response<T>> {
        match self.execute(&envelope)? {
            Outcome::AuthFailed(error) => Ok(Response::Error(error)),
            Outcome::Completed(raw) => raw.into_json(),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Response<T>> {
        self.perform(RequestEnvelope::new(HttpMethod::Get, self.config.api_url(path)))
    }

    fn send_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<Response<T>> {
        self.perform(RequestEnvelope::new(method, self.config.api_url(path)).with_body(body)?)
    }

    /// Get all available form templates
    pub fn get_forms(&self) -> Result<Response<FormsResponse>> {
        self.get("/forms")
    }

    /// Get a form template
    pub fn get_form(&self, form_id: i64) -> Result<Response<Form>> {
        self.get(&format!("/forms/{}", form_id))
    }

    /// Get the tasks based on a form template.
    ///
    /// Without a request the registry is fetched with GET. When the request
    /// asks for CSV, the body is returned verbatim in `csv`.
    pub fn get_registry(
        &self,
        form_id: i64,
        request: Option<&FormRegisterRequest>,
    ) -> Result<Response<FormRegisterResponse>> {
        let url = self.config.api_url(&format!("/forms/{}/register", form_id));
        let envelope = match request {
            Some(request) => RequestEnvelope::new(HttpMethod::Post, url).with_body(request)?,
            None => RequestEnvelope::new(HttpMethod::Get, url),
        };

        if !request.map_or(false, FormRegisterRequest::is_csv) {
            return self.perform(envelope);
        }

        match self.execute(&envelope)? {
            Outcome::AuthFailed(error) => Ok(Response::Error(error)),
            Outcome::Completed(raw) => Ok(raw.into_csv()),
        }
    }

    /// Get the contacts available to the user, grouped by organization
    pub fn get_contacts(&self) -> Result<Response<ContactsResponse>> {
        self.get("/contacts")
    }

    /// Get a catalog with all its items
    pub fn get_catalog(&self, catalog_id: i64) -> Result<Response<Catalog>> {
        self.get(&format!("/catalogs/{}", catalog_id))
    }

    /// Create a catalog; the created catalog is returned with all items
    pub fn create_catalog(&self, request: &CreateCatalogRequest) -> Result<Response<Catalog>> {
        request.validate()?;
        self.send_body(HttpMethod::Put, "/catalogs", request)
    }

    /// Replace catalog headers and items; unlisted items are deleted
    pub fn sync_catalog(
        &self,
        catalog_id: i64,
        request: &SyncCatalogRequest,
    ) -> Result<Response<SyncCatalogResponse>> {
        request.validate()?;
        self.send_body(HttpMethod::Post, &format!("/catalogs/{}", catalog_id), request)
    }

    /// Get a task with its comments
    pub fn get_task(&self, task_id: i64) -> Result<Response<TaskResponse>> {
        self.get(&format!("/tasks/{}", task_id))
    }

    /// Comment a task; the task is returned with all comments
    pub fn comment_task(
        &self,
        task_id: i64,
        request: &TaskCommentRequest,
    ) -> Result<Response<TaskResponse>> {
        request.validate()?;
        self.send_body(HttpMethod::Post, &format!("/tasks/{}/comments", task_id), request)
    }

    /// Create a task
    pub fn create_task(&self, request: &CreateTaskRequest) -> Result<Response<TaskResponse>> {
        request.validate()?;
        self.send_body(HttpMethod::Post, "/tasks", request)
    }

    /// Upload a file for later attachment to tasks.
    ///
    /// Files over the size limit are rejected before any network call.
    pub fn upload_file(&self, file_path: impl AsRef<Path>) -> Result<Response<UploadResponse>> {
        let path = file_path.as_ref();
        check_upload_size(std::fs::metadata(path)?.len())?;

        let envelope =
            RequestEnvelope::new(HttpMethod::Post, self.config.api_url("/files/upload")).with_file(path);
        self.perform(envelope)
    }

    /// Get all lists available to the user
    pub fn get_lists(&self) -> Result<Response<ListsResponse>> {
        self.get("/lists")
    }

    /// Get the tasks of a list
    pub fn get_task_list(
        &self,
        list_id: i64,
        item_count: u32,
        include_archived: bool,
    ) -> Result<Response<TaskListResponse>> {
        let mut url = Url::parse(&self.config.api_url(&format!("/lists/{}/tasks", list_id)))?;
        url.query_pairs_mut()
            .append_pair("item_count", &item_count.to_string());
        if include_archived {
            url.query_pairs_mut().append_pair("include_archived", "y");
        }

        self.perform(RequestEnvelope::new(HttpMethod::Get, url.as_str()))
    }

    /// Download a file by id
    pub fn download_file(&self, file_id: i64) -> Result<Response<DownloadResponse>> {
        let envelope =
            RequestEnvelope::new(HttpMethod::Get, self.config.file_url(file_id));

        match self.execute(&envelope)? {
            Outcome::AuthFailed(error) => Ok(Response::Error(error)),
            Outcome::Completed(raw) => Ok(raw.into_download()),
        }
    }
}

impl Clone for PyrusClient {
    fn clone(&self) -> Self {
        PyrusClient {
            client: self.client.clone(),
            config: self.config.clone(),
            credentials: Mutex::new(self.credentials().clone()),
        }
    }
}

impl std::fmt::Debug for PyrusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyrusClient")
            .field("config", &self.config)
            .field("credentials", &*self.credentials())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = PyrusClient::new("bot@example.com", "key").unwrap();
        assert_eq!(client.config.host, "api.pyrus.com");
        assert!(client.access_token().is_none());
    }

    #[test]
    fn test_client_with_access_token() {
        let client = PyrusClient::new("bot@example.com", "key")
            .unwrap()
            .with_access_token("token123");
        assert_eq!(client.access_token().as_deref(), Some("token123"));

        let clone = client.clone();
        assert_eq!(clone.access_token().as_deref(), Some("token123"));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = PyrusClient::new("bot@example.com", "key")
            .unwrap()
            .with_access_token("token123");
        assert!(!format!("{:?}", client).contains("token123"));
    }

    #[test]
    fn test_envelope_body() {
        let envelope = RequestEnvelope::new(HttpMethod::Post, "https://api.pyrus.com/v4/tasks")
            .with_body(&json!({"text": "hi"}))
            .unwrap();
        assert_eq!(envelope.body, Some(json!({"text": "hi"})));
        assert!(envelope.file_path.is_none());
    }

    #[test]
    fn test_invalid_proxy_is_an_error() {
        let config = Config::default().with_proxy("not a url");
        assert!(PyrusClient::with_config(config).is_err());
    }
}
