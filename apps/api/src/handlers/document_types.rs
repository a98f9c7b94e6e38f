use axum::Json;
use axum::extract::{Extension, State};
use docforge_core::OperatorIdentity;

use crate::dto::DocumentTypeResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_document_types_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
) -> ApiResult<Json<Vec<DocumentTypeResponse>>> {
    let document_types = state
        .session_service
        .list_document_types(&operator)
        .await?
        .into_iter()
        .map(DocumentTypeResponse::from)
        .collect();

    Ok(Json(document_types))
}
