use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::AdminUser;
use crate::errors::{parse_id, AppError};
use crate::extract::JsonBody;
use crate::models::application::populate;
use crate::models::user::{NewUser, ProfileUpdate, Role, User, UserProfile};
use crate::state::AppState;
use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Loads the user's applied entries and inlines the internships they reference.
async fn load_profile(store: &dyn Store, user: User) -> Result<UserProfile, AppError> {
    let entries = store.applied_entries(user.id).await?;
    let ids: Vec<_> = entries.iter().map(|e| e.internship_id).collect();
    let internships = if ids.is_empty() {
        Vec::new()
    } else {
        store.internships_by_ids(&ids).await?
    };
    Ok(UserProfile {
        user,
        applied: populate(entries, &internships),
    })
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// An admin account needs an admin caller, or the configured bootstrap email.
fn may_grant_admin(state: &AppState, caller: Option<&AdminUser>, email: &str) -> bool {
    caller.is_some()
        || state
            .config
            .bootstrap_admin_email
            .as_deref()
            .is_some_and(|bootstrap| bootstrap.eq_ignore_ascii_case(email))
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    caller: Option<AdminUser>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = required(req.email);
    info!("Register attempt for {}", email.as_deref().unwrap_or("<missing>"));

    let name = required(req.name);
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        warn!("Register rejected: missing fields");
        return Err(AppError::Validation(
            "name, email, and password are required".to_string(),
        ));
    };

    let requested = req
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let role = match requested {
        Some(Role::Admin) if !may_grant_admin(&state, caller.as_ref(), &email) => {
            warn!("Register rejected: admin role requested for {email}");
            return Err(AppError::Forbidden(
                "Only admins can create admin accounts".to_string(),
            ));
        }
        Some(role) => role,
        None => state.config.default_role,
    };

    let password_hash = hash_password(password).await?;
    let user = state
        .store
        .create_user(NewUser {
            name,
            email,
            password_hash,
            role,
            skills: req.skills.unwrap_or_default(),
            interests: req.interests.unwrap_or_default(),
        })
        .await
        .map_err(|e| {
            if matches!(e, AppError::Conflict(_)) {
                warn!("Register rejected: email already in use");
            }
            e
        })?;

    info!("User registered: {} ({})", user.id, user.role);

    let token = state.tokens.issue(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered".to_string(),
            user: UserProfile {
                user,
                applied: Vec::new(),
            },
            token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = required(req.email);
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        warn!("Login rejected: missing email or password");
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    };
    info!("Login attempt for {email}");

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        warn!("Login failed: unknown email {email}");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, user.password_hash.clone()).await? {
        warn!("Login failed: wrong password for {email}");
        return Err(AppError::InvalidCredentials);
    }

    info!("Login successful: {}", user.id);

    let token = state.tokens.issue(&user)?;
    let profile = load_profile(state.store.as_ref(), user).await?;
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: profile,
        token,
    }))
}

/// GET /api/auth/profile/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let id = parse_id(&id, "User")?;
    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(load_profile(state.store.as_ref(), user).await?))
}

/// PUT /api/auth/profile/:id
///
/// Only `name`, `skills`, `interests`, `education` and `description` can change;
/// omitted fields keep their stored values.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> Result<Json<ProfileUpdatedResponse>, AppError> {
    let id = parse_id(&id, "User")?;
    info!("Update profile attempt for user {id}");

    let user = state
        .store
        .update_profile(id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    info!("User profile updated: {id}");
    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_string(),
        user: load_profile(state.store.as_ref(), user).await?,
    }))
}
