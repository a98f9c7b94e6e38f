use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use docforge_application::{DownloadOutcome, PreviewGate};
use docforge_core::{OperatorIdentity, SessionId};

use crate::dto::{
    ApplyEditRequest, DocumentPreviewResponse, DownloadPromptResponse, DownloadRequest,
    GeneratedDocumentResponse, PreviewGateResponse, SelectDocumentTypeRequest, SessionResponse,
    SetEditingRequest, UpdateFieldRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the version of a downloaded document.
pub const DOCUMENT_VERSION_HEADER: &str = "x-document-version";

pub async fn create_session_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let session = state.session_service.create_session(&operator).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

pub async fn get_session_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .session_service
        .session(&operator, SessionId::from_str(session_id.as_str())?)
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn close_session_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .session_service
        .close_session(&operator, SessionId::from_str(session_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_document_type_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
    Json(payload): Json<SelectDocumentTypeRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .session_service
        .select_document_type(
            &operator,
            SessionId::from_str(session_id.as_str())?,
            payload.document_type_id.as_str(),
            payload.job_id,
        )
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn retry_config_load_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .session_service
        .retry_config_load(&operator, SessionId::from_str(session_id.as_str())?)
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn abandon_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .session_service
        .abandon(&operator, SessionId::from_str(session_id.as_str())?)
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn update_field_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path((session_id, field_id)): Path<(String, String)>,
    Json(payload): Json<UpdateFieldRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .session_service
        .update_field(
            &operator,
            SessionId::from_str(session_id.as_str())?,
            field_id.as_str(),
            payload.value,
        )
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn proceed_to_preview_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<PreviewGateResponse>> {
    let (gate, session) = state
        .session_service
        .proceed_to_preview(&operator, SessionId::from_str(session_id.as_str())?)
        .await?;

    let (advanced, error_count) = match gate {
        PreviewGate::Advanced => (true, 0),
        PreviewGate::Blocked { error_count } => (false, error_count),
    };

    Ok(Json(PreviewGateResponse {
        advanced,
        error_count,
        session: SessionResponse::from(session),
    }))
}

pub async fn back_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .session_service
        .back(&operator, SessionId::from_str(session_id.as_str())?)
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn get_document_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<DocumentPreviewResponse>> {
    let preview = state
        .session_service
        .document(&operator, SessionId::from_str(session_id.as_str())?)
        .await?;

    Ok(Json(DocumentPreviewResponse::from(preview)))
}

pub async fn apply_edit_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
    Json(payload): Json<ApplyEditRequest>,
) -> ApiResult<Json<DocumentPreviewResponse>> {
    let preview = state
        .session_service
        .apply_edit(
            &operator,
            SessionId::from_str(session_id.as_str())?,
            payload.document,
        )
        .await?;

    Ok(Json(DocumentPreviewResponse::from(preview)))
}

pub async fn set_editing_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
    Json(payload): Json<SetEditingRequest>,
) -> ApiResult<Json<DocumentPreviewResponse>> {
    let preview = state
        .session_service
        .set_editing(
            &operator,
            SessionId::from_str(session_id.as_str())?,
            payload.editing,
        )
        .await?;

    Ok(Json(DocumentPreviewResponse::from(preview)))
}

pub async fn proceed_to_generate_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .session_service
        .proceed_to_generate(&operator, SessionId::from_str(session_id.as_str())?)
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn download_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
    Json(payload): Json<DownloadRequest>,
) -> ApiResult<Response> {
    let outcome = state
        .session_service
        .download(
            &operator,
            SessionId::from_str(session_id.as_str())?,
            payload.confirm_repeat,
        )
        .await?;

    match outcome {
        DownloadOutcome::ConfirmRepeat => Ok((
            StatusCode::CONFLICT,
            Json(DownloadPromptResponse {
                confirm_required: true,
                message: "This document was already downloaded. Download it again?".to_owned(),
            }),
        )
            .into_response()),
        DownloadOutcome::Ready { document, metadata } => Ok((
            [
                (header::CONTENT_TYPE, document.content_type.to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.file_name),
                ),
                (
                    header::HeaderName::from_static(DOCUMENT_VERSION_HEADER),
                    metadata.version().to_string(),
                ),
            ],
            document.bytes,
        )
            .into_response()),
    }
}

pub async fn history_handler(
    State(state): State<AppState>,
    Extension(operator): Extension<OperatorIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<Vec<GeneratedDocumentResponse>>> {
    let history = state
        .session_service
        .history(&operator, SessionId::from_str(session_id.as_str())?)
        .await?
        .into_iter()
        .map(GeneratedDocumentResponse::from)
        .collect();

    Ok(Json(history))
}
