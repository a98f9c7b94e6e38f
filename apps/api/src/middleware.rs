use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use docforge_core::{AppError, OperatorIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the operator subject set by the upstream auth proxy.
pub const OPERATOR_ID_HEADER: &str = "x-operator-id";

/// Header carrying the operator display name.
pub const OPERATOR_NAME_HEADER: &str = "x-operator-name";

pub async fn require_operator(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = operator_from_headers(request.headers())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site")
            && fetch_site == HeaderValue::from_static("cross-site")
        {
            return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url;
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer.starts_with(&allowed_origin);

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn operator_from_headers(headers: &HeaderMap) -> Result<OperatorIdentity, AppError> {
    let subject = header_text(headers, OPERATOR_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("operator identity required".to_owned()))?;
    let display_name = header_text(headers, OPERATOR_NAME_HEADER).unwrap_or(subject);

    Ok(OperatorIdentity::new(subject, display_name))
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
