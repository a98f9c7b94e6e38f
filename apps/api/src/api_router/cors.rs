use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use docforge_core::AppError;
use tower_http::cors::CorsLayer;

use crate::handlers::sessions::DOCUMENT_VERSION_HEADER;
use crate::middleware::{OPERATOR_ID_HEADER, OPERATOR_NAME_HEADER};

pub(super) fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(OPERATOR_ID_HEADER),
            HeaderName::from_static(OPERATOR_NAME_HEADER),
        ])
        .expose_headers([
            CONTENT_DISPOSITION,
            HeaderName::from_static(DOCUMENT_VERSION_HEADER),
        ]))
}
