mod common;

use common::{bearer, client_for, mock_auth, mock_auth_failure};
use mockito::{Matcher, Server};
use pyrus::{PyrusError, Response};
use serde_json::json;

#[test]
fn test_first_call_authenticates_lazily() {
    let mut server = Server::new();
    let auth = mock_auth(&mut server, "fresh", 1);
    let forms = server
        .mock("GET", "/v4/forms")
        .match_header("authorization", bearer("fresh").as_str())
        .match_header("user-agent", Matcher::Regex("^Pyrus API rust client".to_string()))
        .with_status(200)
        .with_body(json!({"forms": [{"id": 1, "name": "Invoices"}]}).to_string())
        .expect(1)
        .create();

    let client = client_for(&server);
    let response = client.get_forms().expect("get_forms");

    auth.assert();
    forms.assert();
    let data = response.data().expect("success");
    assert_eq!(data.forms.as_ref().unwrap()[0].name.as_deref(), Some("Invoices"));
    assert_eq!(client.access_token().as_deref(), Some("fresh"));
}

#[test]
fn test_existing_token_skips_auth() {
    let mut server = Server::new();
    let auth = mock_auth(&mut server, "unused", 0);
    let contacts = server
        .mock("GET", "/v4/contacts")
        .match_header("authorization", bearer("saved").as_str())
        .with_status(200)
        .with_body(json!({"organizations": []}).to_string())
        .expect(1)
        .create();

    let client = client_for(&server).with_access_token("saved");
    let response = client.get_contacts().expect("get_contacts");

    auth.assert();
    contacts.assert();
    assert_eq!(response.data().unwrap().organizations, Some(vec![]));
}

#[test]
fn test_explicit_auth_then_call_needs_no_more_auth() {
    let mut server = Server::new();
    let auth = mock_auth(&mut server, "fresh", 1);
    let lists = server
        .mock("GET", "/v4/lists")
        .match_header("authorization", bearer("fresh").as_str())
        .with_status(200)
        .with_body(json!({"lists": [{"id": 3, "name": "Backlog"}]}).to_string())
        .expect(2)
        .create();

    let client = client_for(&server);
    let auth_response = client.auth(None, None).expect("auth");
    assert!(auth_response.is_success());
    assert_eq!(auth_response.data().unwrap().access_token, "fresh");

    client.get_lists().expect("first call");
    client.get_lists().expect("second call");

    auth.assert();
    lists.assert();
}

#[test]
fn test_auth_replaces_login_and_key() {
    let mut server = Server::new();
    let auth = server
        .mock("POST", "/v4/auth")
        .match_body(Matcher::Json(json!({"login": "other@example.com", "security_key": "k2"})))
        .with_status(200)
        .with_body(json!({"access_token": "t2"}).to_string())
        .expect(1)
        .create();

    let client = client_for(&server);
    let response = client
        .auth(Some("other@example.com"), Some("k2"))
        .expect("auth");

    auth.assert();
    assert!(response.is_success());
    assert_eq!(client.access_token().as_deref(), Some("t2"));
}

#[test]
fn test_expired_token_retries_once() {
    let mut server = Server::new();
    let auth = mock_auth(&mut server, "fresh", 1);
    let stale = server
        .mock("GET", "/v4/tasks/5")
        .match_header("authorization", bearer("stale").as_str())
        .with_status(401)
        .with_body(json!({"error_code": "expired_token"}).to_string())
        .expect(1)
        .create();
    let fresh = server
        .mock("GET", "/v4/tasks/5")
        .match_header("authorization", bearer("fresh").as_str())
        .with_status(200)
        .with_body(json!({"task": {"id": 5, "text": "Renew lease"}}).to_string())
        .expect(1)
        .create();

    let client = client_for(&server).with_access_token("stale");
    let response = client.get_task(5).expect("get_task");

    auth.assert();
    stale.assert();
    fresh.assert();
    let task = response.into_result().unwrap().task.unwrap();
    assert_eq!(task.task.text.as_deref(), Some("Renew lease"));
    assert_eq!(client.access_token().as_deref(), Some("fresh"));
}

#[test]
fn test_second_unauthorized_is_surfaced() {
    let mut server = Server::new();
    let auth = mock_auth(&mut server, "fresh", 1);
    let lists = server
        .mock("GET", "/v4/lists")
        .with_status(401)
        .with_body(
            json!({"error_code": "token_not_specified", "error": "Token is not valid"}).to_string(),
        )
        .expect(2)
        .create();

    let client = client_for(&server).with_access_token("stale");
    let response = client.get_lists().expect("get_lists");

    auth.assert();
    lists.assert();
    let error = response.error().expect("error response");
    assert_eq!(error.error_code.as_deref(), Some("token_not_specified"));
    assert_eq!(error.error.as_deref(), Some("Token is not valid"));
}

#[test]
fn test_failed_auth_short_circuits_call() {
    let mut server = Server::new();
    let auth = mock_auth_failure(&mut server, 1);
    let forms = server.mock("GET", "/v4/forms").expect(0).create();

    let client = client_for(&server);
    let response = client.get_forms().expect("get_forms");

    auth.assert();
    forms.assert();
    match response {
        Response::Error(error) => {
            assert_eq!(error.error_code.as_deref(), Some("invalid_credentials"));
            assert_eq!(error.original["error"], "Invalid login or security key");
        }
        other => panic!("expected auth error, got {:?}", other),
    }
    assert!(client.access_token().is_none());
}

#[test]
fn test_failed_reauth_clears_token() {
    let mut server = Server::new();
    let auth = mock_auth_failure(&mut server, 1);
    let catalog = server
        .mock("GET", "/v4/catalogs/9")
        .with_status(401)
        .with_body("{}")
        .expect(1)
        .create();

    let client = client_for(&server).with_access_token("stale");
    let response = client.get_catalog(9).expect("get_catalog");

    auth.assert();
    catalog.assert();
    let err = response.into_result().unwrap_err();
    assert!(err.has_error_code("invalid_credentials"));
    assert!(client.access_token().is_none());
}

#[test]
fn test_auth_success_without_token_fails() {
    let mut server = Server::new();
    let auth = server
        .mock("POST", "/v4/auth")
        .with_status(200)
        .with_body(json!({"token_type": "bearer"}).to_string())
        .expect(1)
        .create();

    let client = client_for(&server);
    let response = client.auth(None, None).expect("auth");

    auth.assert();
    assert!(!response.is_success());
    assert_eq!(response.original()["token_type"], "bearer");
    assert!(client.access_token().is_none());
}

#[test]
fn test_other_errors_are_not_retried() {
    let mut server = Server::new();
    let auth = mock_auth(&mut server, "unused", 0);
    let task = server
        .mock("GET", "/v4/tasks/8")
        .with_status(403)
        .with_body(json!({"error_code": "access_denied_task", "error": "Access denied"}).to_string())
        .expect(1)
        .create();

    let client = client_for(&server).with_access_token("saved");
    let response = client.get_task(8).expect("get_task");

    auth.assert();
    task.assert();
    let error = response.error().unwrap();
    assert_eq!(error.error_code.as_deref(), Some("access_denied_task"));
}

#[test]
fn test_non_json_server_error() {
    let mut server = Server::new();
    let forms = server
        .mock("GET", "/v4/forms")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .expect(1)
        .create();

    let client = client_for(&server).with_access_token("saved");
    let result = client.get_forms();

    forms.assert();
    match result {
        Err(PyrusError::Http { status, body, .. }) => {
            assert_eq!(status, 502);
            assert!(body.contains("Bad Gateway"));
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[test]
fn test_second_unauthorized_with_empty_body_is_error() {
    let mut server = Server::new();
    let auth = mock_auth(&mut server, "fresh", 1);
    let lists = server
        .mock("GET", "/v4/lists")
        .with_status(401)
        .with_body("{}")
        .expect(2)
        .create();

    let client = client_for(&server).with_access_token("stale");
    let response = client.get_lists().expect("get_lists");

    auth.assert();
    lists.assert();
    assert!(!response.is_success());
    let error = response.error().unwrap();
    assert!(error.error_code.is_none());
    assert_eq!(error.error.as_deref(), Some("HTTP status 401"));
    assert_eq!(error.original, json!({}));
}

#[test]
fn test_server_error_without_error_keys() {
    let mut server = Server::new();
    let catalog = server
        .mock("GET", "/v4/catalogs/3")
        .with_status(500)
        .with_body(json!({"message": "boom"}).to_string())
        .expect(1)
        .create();

    let client = client_for(&server).with_access_token("saved");
    let response = client.get_catalog(3).expect("get_catalog");

    catalog.assert();
    let err = response.into_result().unwrap_err();
    assert!(matches!(err, PyrusError::Api { .. }));
    assert!(err.to_string().contains("HTTP status 500"));
}

#[test]
fn test_non_json_auth_reply_is_error_response() {
    let mut server = Server::new();
    let auth = server
        .mock("POST", "/v4/auth")
        .with_status(503)
        .with_body("<html>Service Unavailable</html>")
        .expect(1)
        .create();
    let forms = server.mock("GET", "/v4/forms").expect(0).create();

    let client = client_for(&server);
    let response = client.get_forms().expect("get_forms");

    auth.assert();
    forms.assert();
    let error = response.error().expect("auth error");
    assert_eq!(error.error.as_deref(), Some("HTTP status 503"));
    assert!(error
        .original
        .as_str()
        .map_or(false, |body| body.contains("Service Unavailable")));
    assert!(client.access_token().is_none());
}
