use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::Utc;
use gcontacts_providers::google::GoogleConfig;
use gcontacts_server::{AppState, router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn future_expire_time() -> String {
    (Utc::now() + chrono::Duration::hours(1)).to_rfc3339()
}

struct Fixture {
    server: MockServer,
    _temp: TempDir,
    token_path: PathBuf,
}

impl Fixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        let token_path = temp.path().join("token.json");
        fs::write(
            &token_path,
            json!({
                "access_token": "live-access",
                "refresh_token": "refresh-1",
                "expires_in": 3599,
                "token_type": "Bearer",
                "scope": "https://www.googleapis.com/auth/contacts",
                "expireTime": future_expire_time(),
                "client_id": "id",
                "client_secret": "secret"
            })
            .to_string(),
        )
        .unwrap();
        Self {
            server,
            _temp: temp,
            token_path,
        }
    }

    fn app(&self, prefix: &str) -> Router {
        let google = GoogleConfig::new(&self.token_path)
            .with_token_url(format!("{}/token", self.server.uri()))
            .with_people_api_url(format!("{}/v1", self.server.uri()))
            .with_timeout(Duration::from_secs(5));
        router(AppState::from_config(google).unwrap(), prefix)
    }
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_route_reports_working() {
    let fixture = Fixture::new().await;
    let (status, body) = send(fixture.app(""), Method::GET, "/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "API is working!"}));
}

#[tokio::test]
async fn routes_are_nested_under_prefix() {
    let fixture = Fixture::new().await;

    let (status, _) = send(fixture.app("/raman"), Method::GET, "/raman/test", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(fixture.app("/raman"), Method::GET, "/test", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_returns_resource_name() {
    let fixture = Fixture::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/people:createContact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceName": "people/123456",
            "etag": "e"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let (status, body) = send(
        fixture.app(""),
        Method::POST,
        "/create",
        Some(json!({
            "first_name": "A",
            "last_name": "B",
            "mobile_list": ["123"],
            "email": "a@b.com"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"resource_name": "people/123456"}));
}

#[tokio::test]
async fn edit_missing_contact_is_not_found() {
    let fixture = Fixture::new().await;
    Mock::given(method("GET"))
        .and(path("/v1/people/c404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&fixture.server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fixture.server)
        .await;

    let (status, body) = send(
        fixture.app(""),
        Method::PUT,
        "/edit",
        Some(json!({
            "resource_name": "people/c404",
            "first_name": "A",
            "last_name": "B",
            "mobile_list": ["1"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not_found"));
}

#[tokio::test]
async fn edit_updates_contact() {
    let fixture = Fixture::new().await;
    Mock::given(method("GET"))
        .and(path("/v1/people/c42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceName": "people/c42",
            "etag": "e1",
            "names": [{"givenName": "Old", "familyName": "Name"}],
            "phoneNumbers": [{"value": "111"}]
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v1/people/c42:updateContact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceName": "people/c42",
            "etag": "e2"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let (status, body) = send(
        fixture.app(""),
        Method::PUT,
        "/edit",
        Some(json!({
            "resource_name": "c42",
            "first_name": "New",
            "last_name": "Name",
            "mobile_list": ["222", "333"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn delete_succeeds() {
    let fixture = Fixture::new().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/people/c42:deleteContact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let (status, body) = send(
        fixture.app(""),
        Method::DELETE,
        "/delete",
        Some(json!({"resource_name": "people/c42"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn invalid_resource_name_is_bad_request() {
    let fixture = Fixture::new().await;
    let (status, body) = send(
        fixture.app(""),
        Method::DELETE,
        "/delete",
        Some(json!({"resource_name": "contactGroups/123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let fixture = Fixture::new().await;
    let (status, _) = send(
        fixture.app(""),
        Method::POST,
        "/create",
        Some(json!({"last_name": "B"})),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let fixture = Fixture::new().await;
    Mock::given(method("POST"))
        .and(path("/v1/people:createContact"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&fixture.server)
        .await;

    let (status, body) = send(
        fixture.app(""),
        Method::POST,
        "/create",
        Some(json!({"first_name": "A", "last_name": "B"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("backend error"));
}

#[tokio::test]
async fn missing_token_file_is_internal_error() {
    let fixture = Fixture::new().await;
    fs::remove_file(&fixture.token_path).unwrap();

    let (status, body) = send(
        fixture.app(""),
        Method::POST,
        "/create",
        Some(json!({"first_name": "A", "last_name": "B"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("file_access"));
}
