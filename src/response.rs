use crate::error::{PyrusError, Result};
use crate::files::filename_from_content_disposition;
use crate::responses::{DownloadResponse, FormRegisterResponse};
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error code reported when a download is rejected with 401
pub const AUTHORIZATION_ERROR: &str = "authorization_error";
/// Error code reported when a download is rejected with 403 or 404
pub const ACCESS_DENIED_FILE: &str = "access_denied_file";
/// Error code reported for any other failed download
pub const SERVER_ERROR: &str = "ServerError";

/// Error payload returned by the API instead of the requested shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine readable error code
    #[serde(default)]
    pub error_code: Option<String>,

    /// Human readable string describing the error
    #[serde(default)]
    pub error: Option<String>,

    /// The undecoded payload
    #[serde(skip)]
    pub original: Value,
}

impl ErrorBody {
    /// Build an error body from a decoded payload, probing for the error keys
    pub fn from_value(original: Value) -> Self {
        let field = |key: &str| original.get(key).and_then(value_to_string);
        ErrorBody {
            error_code: field("error_code"),
            error: field("error"),
            original,
        }
    }

    /// Build an error body that carries only a code
    pub fn from_code(code: &str) -> Self {
        let original = serde_json::json!({ "error_code": code });
        ErrorBody {
            error_code: Some(code.to_string()),
            error: None,
            original,
        }
    }

    /// Build an error body for a failed status. A payload without the error
    /// keys gets a message naming the status.
    pub fn from_status(status: u16, original: Value) -> Self {
        let mut body = ErrorBody::from_value(original);
        if body.error_code.is_none() && body.error.is_none() {
            body.error = Some(format!("HTTP status {}", status));
        }
        body
    }

    /// Short "code: message" description used in error messages
    pub fn describe(&self) -> String {
        match (&self.error_code, &self.error) {
            (Some(code), Some(error)) => format!("{}: {}", code, error),
            (Some(code), None) => code.clone(),
            (None, Some(error)) => error.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Returns true when a decoded payload carries the API error keys.
pub fn is_error_shape(value: &Value) -> bool {
    ["error_code", "error"]
        .iter()
        .any(|key| value.get(key).map_or(false, |v| !v.is_null()))
}

/// Outcome of an API call: either the typed payload or the error payload.
/// Both sides keep the original payload for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Response<T> {
    Success { data: T, original: Value },
    Error(ErrorBody),
}

impl<T> Response<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// Typed payload, if the call succeeded
    pub fn data(&self) -> Option<&T> {
        match self {
            Response::Success { data, .. } => Some(data),
            Response::Error(_) => None,
        }
    }

    /// Error payload, if the call failed logically
    pub fn error(&self) -> Option<&ErrorBody> {
        match self {
            Response::Success { .. } => None,
            Response::Error(body) => Some(body),
        }
    }

    /// The undecoded payload, whichever side this is
    pub fn original(&self) -> &Value {
        match self {
            Response::Success { original, .. } => original,
            Response::Error(body) => &body.original,
        }
    }

    /// Convert into a plain `Result`, turning the error payload into `PyrusError::Api`
    pub fn into_result(self) -> Result<T> {
        match self {
            Response::Success { data, .. } => Ok(data),
            Response::Error(body) => Err(PyrusError::from_error_body(body)),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Response<U> {
        match self {
            Response::Success { data, original } => Response::Success {
                data: f(data),
                original,
            },
            Response::Error(body) => Response::Error(body),
        }
    }
}

impl<T: DeserializeOwned> Response<T> {
    /// Map a decoded payload into the declared response type
    pub fn from_value(original: Value) -> Result<Self> {
        if is_error_shape(&original) {
            return Ok(Response::Error(ErrorBody::from_value(original)));
        }
        let data = T::deserialize(&original)?;
        Ok(Response::Success { data, original })
    }
}

/// A completed HTTP exchange, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decode the body as generic JSON.
    /// A body that is not JSON is an HTTP error on error statuses.
    pub fn json_value(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).map_err(|e| {
            if self.status >= 400 {
                PyrusError::http(
                    self.status,
                    String::from_utf8_lossy(&self.body).to_string(),
                    Some(Box::new(e)),
                )
            } else {
                PyrusError::Json(e)
            }
        })
    }

    /// Decode the body as JSON and map it into `T`.
    /// Statuses of 400 and above are always errors.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<Response<T>> {
        let value = self.json_value()?;
        if self.status >= 400 {
            return Ok(Response::Error(ErrorBody::from_status(self.status, value)));
        }
        Response::from_value(value)
    }

    /// Return the body verbatim as CSV text, bypassing JSON decoding.
    /// A JSON body on a failed status is the error payload instead.
    pub fn into_csv(self) -> Response<FormRegisterResponse> {
        if self.status >= 400 {
            if let Ok(value) = serde_json::from_slice::<Value>(&self.body) {
                return Response::Error(ErrorBody::from_status(self.status, value));
            }
        }
        let text = String::from_utf8_lossy(&self.body).to_string();
        Response::Success {
            data: FormRegisterResponse {
                tasks: None,
                csv: Some(text.clone()),
            },
            original: Value::String(text),
        }
    }

    /// Pair the raw bytes with the filename from `Content-Disposition`.
    /// Non-200 statuses map to the download error codes.
    pub fn into_download(self) -> Response<DownloadResponse> {
        match self.status {
            200 => {
                let filename = self
                    .headers
                    .get(CONTENT_DISPOSITION)
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).to_string())
                    .and_then(|header| filename_from_content_disposition(&header))
                    .unwrap_or_default();
                Response::Success {
                    data: DownloadResponse {
                        filename,
                        raw_file: self.body,
                    },
                    original: Value::Null,
                }
            }
            401 => Response::Error(ErrorBody::from_code(AUTHORIZATION_ERROR)),
            403 | 404 => Response::Error(ErrorBody::from_code(ACCESS_DENIED_FILE)),
            _ => Response::Error(ErrorBody::from_code(SERVER_ERROR)),
        }
    }
}
