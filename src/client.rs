use crate::error::Result;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::Proxy;
use std::time::Duration;

/// Default API host
pub const DEFAULT_HOST: &str = "api.pyrus.com";
/// Default API version prefix
pub const DEFAULT_BASE_PATH: &str = "/v4";
/// Download endpoint, the file id is appended
pub const DEFAULT_FILES_URL: &str = "https://files.pyrus.com/services/attachment?Id=";

/// Create the HTTP client for API requests from the given configuration
pub fn create_rest_client(config: &Config) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout);

    if let Some(ref proxy) = config.proxy {
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    Ok(builder.build()?)
}

/// Configuration for the Pyrus API client
#[derive(Debug, Clone)]
pub struct Config {
    /// URL scheme (http or https)
    pub scheme: String,
    /// API host
    pub host: String,
    /// Version prefix prepended to every endpoint path
    pub base_path: String,
    /// Download URL prefix, completed with the file id
    pub files_url: String,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Optional proxy URL
    pub proxy: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scheme: "https".to_string(),
            host: DEFAULT_HOST.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            files_url: DEFAULT_FILES_URL.to_string(),
            user_agent: format!("Pyrus API rust client v {}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            timeout: Duration::from_secs(300), // 5 minutes
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Create a new configuration with the given scheme and host
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Config {
            scheme: scheme.into(),
            host: host.into(),
            ..Config::default()
        }
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_files_url(mut self, files_url: impl Into<String>) -> Self {
        self.files_url = files_url.into();
        self
    }

    /// Route all requests through the given proxy
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.base_path)
    }

    /// Full URL of an endpoint path such as `/forms/1`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Full URL for downloading a file
    pub fn file_url(&self, file_id: i64) -> String {
        format!("{}{}", self.files_url, file_id)
    }
}
