use docforge_application::GenerationSessionService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session_service: GenerationSessionService,
    pub frontend_url: String,
}
