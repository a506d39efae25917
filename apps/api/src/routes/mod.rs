pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::internships::handlers as internships;
use crate::state::AppState;

async fn route_not_found() -> Result<(), AppError> {
    Err(AppError::NotFound("Route not found".to_string()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route(
            "/api/auth/profile/:id",
            get(auth::handle_get_profile).put(auth::handle_update_profile),
        )
        // Internships
        .route(
            "/api/internships",
            get(internships::handle_list_internships).post(internships::handle_create_internship),
        )
        .route(
            "/api/internships/applications",
            get(internships::handle_list_applications),
        )
        .route(
            "/api/internships/recommend/:user_id",
            get(internships::handle_recommend),
        )
        .route(
            "/api/internships/:id",
            get(internships::handle_get_internship)
                .put(internships::handle_update_internship)
                .delete(internships::handle_delete_internship),
        )
        .route("/api/internships/:id/apply", post(internships::handle_apply))
        .fallback(route_not_found)
        .with_state(state)
}
