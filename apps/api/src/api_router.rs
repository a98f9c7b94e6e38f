mod cors;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use docforge_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/document-types",
            get(handlers::document_types::list_document_types_handler),
        )
        .route(
            "/api/sessions",
            post(handlers::sessions::create_session_handler),
        )
        .route(
            "/api/sessions/{session_id}",
            get(handlers::sessions::get_session_handler)
                .delete(handlers::sessions::close_session_handler),
        )
        .route(
            "/api/sessions/{session_id}/document-type",
            post(handlers::sessions::select_document_type_handler),
        )
        .route(
            "/api/sessions/{session_id}/config/retry",
            post(handlers::sessions::retry_config_load_handler),
        )
        .route(
            "/api/sessions/{session_id}/abandon",
            post(handlers::sessions::abandon_handler),
        )
        .route(
            "/api/sessions/{session_id}/fields/{field_id}",
            put(handlers::sessions::update_field_handler),
        )
        .route(
            "/api/sessions/{session_id}/preview",
            post(handlers::sessions::proceed_to_preview_handler),
        )
        .route(
            "/api/sessions/{session_id}/back",
            post(handlers::sessions::back_handler),
        )
        .route(
            "/api/sessions/{session_id}/document",
            get(handlers::sessions::get_document_handler)
                .put(handlers::sessions::apply_edit_handler),
        )
        .route(
            "/api/sessions/{session_id}/document/editing",
            put(handlers::sessions::set_editing_handler),
        )
        .route(
            "/api/sessions/{session_id}/generate",
            post(handlers::sessions::proceed_to_generate_handler),
        )
        .route(
            "/api/sessions/{session_id}/download",
            post(handlers::sessions::download_handler),
        )
        .route(
            "/api/sessions/{session_id}/history",
            get(handlers::sessions::history_handler),
        )
        .route_layer(from_fn(middleware::require_operator));

    let cors_layer = cors::build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
