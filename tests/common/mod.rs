#![allow(dead_code)]

use mockito::{Matcher, Mock, Server};
use pyrus::{Config, Credentials, PyrusClient};
use serde_json::json;

pub const LOGIN: &str = "bot@example.com";
pub const SECURITY_KEY: &str = "secret-key";

/// Client pointed at the mock server, with credentials but no token
pub fn client_for(server: &Server) -> PyrusClient {
    let config = Config::new("http", server.host_with_port())
        .with_files_url(format!("{}/services/attachment?Id=", server.url()));
    PyrusClient::with_config(config)
        .expect("client")
        .with_credentials(Credentials::new(LOGIN, SECURITY_KEY))
}

/// `/auth` answering with the given token, expected `hits` times
pub fn mock_auth(server: &mut Server, token: &str, hits: usize) -> Mock {
    server
        .mock("POST", "/v4/auth")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "login": LOGIN,
            "security_key": SECURITY_KEY
        })))
        .with_status(200)
        .with_body(json!({ "access_token": token }).to_string())
        .expect(hits)
        .create()
}

/// `/auth` rejecting the credentials, expected `hits` times
pub fn mock_auth_failure(server: &mut Server, hits: usize) -> Mock {
    server
        .mock("POST", "/v4/auth")
        .with_status(401)
        .with_body(
            json!({
                "error_code": "invalid_credentials",
                "error": "Invalid login or security key"
            })
            .to_string(),
        )
        .expect(hits)
        .create()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
