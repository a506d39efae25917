//! Axum route handlers for the Internships API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::token::AdminUser;
use crate::errors::{parse_id, AppError};
use crate::extract::JsonBody;
use crate::internships::ledger::{apply_for_internship, list_applications};
use crate::internships::recommend::{recommend_for_user, Recommendation};
use crate::models::application::{AppliedEntry, ApplicationRow};
use crate::models::internship::{Internship, InternshipFields};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct InternshipResponse {
    pub message: String,
    pub internship: Internship,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub message: String,
    pub applied: Vec<AppliedEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/internships
pub async fn handle_list_internships(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Internship>>, AppError> {
    let data = state.store.list_internships().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/internships/:id
pub async fn handle_get_internship(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Internship>, AppError> {
    let id = parse_id(&id, "Internship")?;
    let internship = state
        .store
        .find_internship(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Internship not found".to_string()))?;
    Ok(Json(internship))
}

/// POST /api/internships
pub async fn handle_create_internship(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(fields): JsonBody<InternshipFields>,
) -> Result<(StatusCode, Json<InternshipResponse>), AppError> {
    let new = fields.into_new()?;
    let internship = state.store.create_internship(new).await?;

    info!("Admin {} created internship {}", admin.id, internship.id);
    Ok((
        StatusCode::CREATED,
        Json(InternshipResponse {
            message: "Internship stored".to_string(),
            internship,
        }),
    ))
}

/// PUT /api/internships/:id
///
/// Partial update: only the supplied fields are overwritten.
pub async fn handle_update_internship(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    JsonBody(fields): JsonBody<InternshipFields>,
) -> Result<Json<InternshipResponse>, AppError> {
    let id = parse_id(&id, "Internship")?;
    fields.validate_update()?;

    let internship = state
        .store
        .update_internship(id, fields)
        .await?
        .ok_or_else(|| AppError::NotFound("Internship not found".to_string()))?;

    info!("Admin {} updated internship {id}", admin.id);
    Ok(Json(InternshipResponse {
        message: "Internship updated".to_string(),
        internship,
    }))
}

/// DELETE /api/internships/:id
pub async fn handle_delete_internship(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "Internship")?;
    if !state.store.delete_internship(id).await? {
        return Err(AppError::NotFound("Internship not found".to_string()));
    }

    info!("Admin {} deleted internship {id}", admin.id);
    Ok(Json(MessageResponse {
        message: "Internship deleted".to_string(),
    }))
}

/// GET /api/internships/recommend/:user_id
///
/// Always 200 for an existing user, even when the scoring service is down.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<Recommendation>>, AppError> {
    let user_id = parse_id(&user_id, "User")?;
    let data = recommend_for_user(state.store.as_ref(), state.scorer.as_ref(), user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/internships/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(internship_id): Path<String>,
    JsonBody(req): JsonBody<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    let Some(user_id) = req.user_id else {
        warn!("Apply rejected: missing userId");
        return Err(AppError::Validation("userId is required".to_string()));
    };
    let user_id = parse_id(&user_id, "User")?;
    let internship_id = parse_id(&internship_id, "Internship")?;

    let applied = apply_for_internship(state.store.as_ref(), user_id, internship_id).await?;
    Ok(Json(ApplyResponse {
        message: "Application submitted successfully".to_string(),
        applied,
    }))
}

/// GET /api/internships/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<DataResponse<ApplicationRow>>, AppError> {
    let data = list_applications(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data }))
}
