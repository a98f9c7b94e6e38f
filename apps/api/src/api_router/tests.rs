use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use docforge_application::{
    DocumentConfigSource, DocumentExportService, GenerationSessionService, LogoFetcher,
};
use docforge_core::{AppError, AppResult};
use docforge_domain::{
    DocumentConfig, DocumentTypeSummary, FieldKind, FieldSchema, ValidationRule,
};
use docforge_infrastructure::{DocxDocumentSerializer, InMemorySessionStore};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::build_router;
use crate::state::AppState;

const FRONTEND_URL: &str = "http://localhost:3000";

struct SingleLetterSource;

#[async_trait]
impl DocumentConfigSource for SingleLetterSource {
    async fn list_document_types(&self) -> AppResult<Vec<DocumentTypeSummary>> {
        Ok(vec![DocumentTypeSummary::new(
            "addition",
            "Product Addition",
            "plus",
        )?])
    }

    async fn load_config(
        &self,
        document_type_id: &str,
        _job_id: Option<&str>,
    ) -> AppResult<DocumentConfig> {
        if document_type_id != "addition" {
            return Err(AppError::NotFound(format!(
                "document type '{document_type_id}' does not exist"
            )));
        }

        DocumentConfig::new(
            "addition",
            "Product Addition",
            "plus",
            vec![
                FieldSchema::new("contractNumber", "Contract Number", FieldKind::Text)?
                    .with_rule(ValidationRule::required("Contract Number is required")),
            ],
        )
    }
}

struct UnreachableLogoFetcher;

#[async_trait]
impl LogoFetcher for UnreachableLogoFetcher {
    async fn fetch_logo(&self, _logo_url: &str) -> AppResult<Vec<u8>> {
        Err(AppError::Unavailable("logo host offline".to_owned()))
    }
}

fn test_router() -> Router {
    let session_service = GenerationSessionService::new(
        Arc::new(SingleLetterSource),
        DocumentExportService::new(
            Arc::new(UnreachableLogoFetcher),
            Arc::new(DocxDocumentSerializer::new()),
        ),
        Arc::new(InMemorySessionStore::new()),
    )
    .with_logo_url("https://assets.example.test/logo.png");

    build_router(
        AppState {
            session_service,
            frontend_url: FRONTEND_URL.to_owned(),
        },
        FRONTEND_URL,
    )
    .unwrap_or_else(|_| unreachable!())
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|_| unreachable!())
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    operator: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, FRONTEND_URL);
    if let Some(operator) = operator {
        builder = builder.header("x-operator-id", operator);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_else(|_| unreachable!());

    let response = router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!());
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|_| unreachable!())
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn create_session(router: &Router, operator: &str) -> String {
    let response = send(router, Method::POST, "/api/sessions", Some(operator), None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.json()["session_id"]
        .as_str()
        .unwrap_or_else(|| unreachable!())
        .to_owned()
}

#[tokio::test]
async fn health_is_public() {
    let router = test_router();
    let response = send(&router, Method::GET, "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}

#[tokio::test]
async fn session_routes_require_an_operator() {
    let router = test_router();
    let response = send(&router, Method::GET, "/api/document-types", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cross_site_mutations_are_blocked() {
    let router = test_router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sessions")
        .header("x-operator-id", "co-17")
        .header(header::ORIGIN, "https://elsewhere.example.test")
        .body(Body::empty())
        .unwrap_or_else(|_| unreachable!());

    let response = router
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lists_document_types() {
    let router = test_router();
    let response = send(&router, Method::GET, "/api/document-types", Some("co-17"), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()[0]["id"], "addition");
}

#[tokio::test]
async fn full_letter_flow_downloads_once_then_prompts() {
    let router = test_router();
    let session_id = create_session(&router, "co-17").await;
    let base = format!("/api/sessions/{session_id}");

    let selected = send(
        &router,
        Method::POST,
        &format!("{base}/document-type"),
        Some("co-17"),
        Some(json!({ "document_type_id": "addition" })),
    )
    .await;
    assert_eq!(selected.status, StatusCode::OK);
    assert_eq!(selected.json()["step"], "form-entry");

    let blocked = send(&router, Method::POST, &format!("{base}/preview"), Some("co-17"), None).await;
    assert_eq!(blocked.json()["advanced"], false);
    assert_eq!(blocked.json()["error_count"], 1);

    let filled = send(
        &router,
        Method::PUT,
        &format!("{base}/fields/contractNumber"),
        Some("co-17"),
        Some(json!({ "value": "GS-35F-0119Y" })),
    )
    .await;
    assert_eq!(filled.status, StatusCode::OK);

    let advanced = send(&router, Method::POST, &format!("{base}/preview"), Some("co-17"), None).await;
    assert_eq!(advanced.json()["advanced"], true);
    assert_eq!(advanced.json()["session"]["step"], "preview");

    let preview = send(&router, Method::GET, &format!("{base}/document"), Some("co-17"), None).await;
    assert_eq!(preview.status, StatusCode::OK);
    let html = preview.json()["html"].as_str().unwrap_or_default().to_owned();
    assert!(html.contains("GS-35F-0119Y"));

    let generate = send(&router, Method::POST, &format!("{base}/generate"), Some("co-17"), None).await;
    assert_eq!(generate.json()["step"], "generate");

    let download_uri = format!("{base}/download");
    let first = send(
        &router,
        Method::POST,
        &download_uri,
        Some("co-17"),
        Some(json!({})),
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body.starts_with(b"PK"));
    assert_eq!(
        first.headers.get(header::CONTENT_DISPOSITION).and_then(|value| value.to_str().ok()),
        Some("attachment; filename=\"Product_Addition_GS-35F-0119Y.docx\"")
    );
    assert_eq!(
        first.headers.get("x-document-version").and_then(|value| value.to_str().ok()),
        Some("1")
    );

    let repeat = send(
        &router,
        Method::POST,
        &download_uri,
        Some("co-17"),
        Some(json!({})),
    )
    .await;
    assert_eq!(repeat.status, StatusCode::CONFLICT);
    assert_eq!(repeat.json()["confirm_required"], true);

    let confirmed = send(
        &router,
        Method::POST,
        &download_uri,
        Some("co-17"),
        Some(json!({ "confirm_repeat": true })),
    )
    .await;
    assert_eq!(confirmed.status, StatusCode::OK);

    let history = send(&router, Method::GET, &format!("{base}/history"), Some("co-17"), None).await;
    let entries = history.json();
    assert_eq!(entries.as_array().map(Vec::len), Some(2));
    assert_eq!(entries[1]["version"], 2);
    assert_eq!(entries[1]["status"], "regenerated");
}

#[tokio::test]
async fn sessions_are_private_to_their_operator() {
    let router = test_router();
    let session_id = create_session(&router, "co-17").await;

    let response = send(
        &router,
        Method::GET,
        &format!("/api/sessions/{session_id}"),
        Some("co-99"),
        None,
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_session_id_is_a_bad_request() {
    let router = test_router();
    let response = send(
        &router,
        Method::GET,
        "/api/sessions/not-a-uuid",
        Some("co-17"),
        None,
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_document_type_records_load_error() {
    let router = test_router();
    let session_id = create_session(&router, "co-17").await;

    let response = send(
        &router,
        Method::POST,
        &format!("/api/sessions/{session_id}/document-type"),
        Some("co-17"),
        Some(json!({ "document_type_id": "deletion" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["step"], "load-config");
    assert!(body["config_load_error"].is_string());
}
