//! File transfer helpers: the upload size precondition, the multipart body
//! for `/files/upload` and filename extraction for downloads.

use crate::error::{PyrusError, Result};
use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::blocking::multipart::Form;
use std::path::Path;
use std::sync::LazyLock;

/// Largest file accepted by `/files/upload` (250 MiB)
pub const MAX_FILE_SIZE_IN_BYTES: u64 = 250 * 1024 * 1024;

/// Multipart part name expected by the upload endpoint
pub const UPLOAD_PART_NAME: &str = "file";

/// Bare `filename=` parameter, for headers that do not split into parameters
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"filename=(.+)").expect("filename regex is valid"));

/// Fail fast when a file is over the upload limit
pub fn check_upload_size(size: u64) -> Result<()> {
    if size > MAX_FILE_SIZE_IN_BYTES {
        return Err(PyrusError::FileTooLarge {
            size,
            limit: MAX_FILE_SIZE_IN_BYTES,
        });
    }
    Ok(())
}

/// Build the multipart body for an upload.
///
/// The file handle is owned by the returned form and closed when the
/// request carrying it is dropped.
pub fn upload_form(path: &Path) -> Result<Form> {
    let size = std::fs::metadata(path)?.len();
    check_upload_size(size)?;
    Ok(Form::new().file(UPLOAD_PART_NAME, path)?)
}

/// Extract the filename from a `Content-Disposition` header value.
///
/// `filename*` (RFC 5987) wins over `filename`. When the header cannot be
/// parsed into parameters, a plain `filename=` match is used instead.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    parse_disposition(header).or_else(|| {
        let caps = FILENAME_RE.captures(header)?;
        Some(unquote(caps.get(1)?.as_str().trim()))
    })
}

fn parse_disposition(header: &str) -> Option<String> {
    let mut plain = None;

    for param in split_params(header).into_iter().skip(1) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                if let Some(decoded) = decode_ext_value(value) {
                    return Some(decoded);
                }
            }
            "filename" => plain = Some(unquote(value)),
            _ => {}
        }
    }

    plain.filter(|name| !name.is_empty())
}

/// Split on `;` outside of quoted strings
fn split_params(header: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut escaped = false;

    for c in header.chars() {
        match c {
            _ if escaped => {
                current.push(c);
                escaped = false;
            }
            '\\' if quoted => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                current.push(c);
                quoted = !quoted;
            }
            ';' if !quoted => params.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    params.push(current);
    params
}

fn unquote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => value.to_string(),
    }
}

/// Decode `charset'language'percent-encoded`
fn decode_ext_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;

    let decoded = percent_decode_str(encoded);
    if charset.eq_ignore_ascii_case("utf-8") {
        decoded.decode_utf8().ok().map(|s| s.into_owned())
    } else {
        Some(decoded.decode_utf8_lossy().into_owned())
    }
}
