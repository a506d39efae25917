//! Application ledger: at most one application per (user, internship).

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{AppliedEntry, ApplicationRow};
use crate::store::{AppendOutcome, Store};

/// Records an application and returns the user's full applied sequence.
pub async fn apply_for_internship(
    store: &dyn Store,
    user_id: Uuid,
    internship_id: Uuid,
) -> Result<Vec<AppliedEntry>, AppError> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    store
        .find_internship(internship_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Internship not found".to_string()))?;

    match store.append_application(user_id, internship_id).await? {
        AppendOutcome::Appended => {
            info!("User {user_id} applied for internship {internship_id}");
        }
        AppendOutcome::AlreadyApplied => {
            warn!("User {user_id} already applied for internship {internship_id}");
            return Err(AppError::AlreadyApplied);
        }
    }

    store.applied_entries(user_id).await
}

/// Every (student, application) pair whose internship still exists.
pub async fn list_applications(store: &dyn Store) -> Result<Vec<ApplicationRow>, AppError> {
    let rows = store.application_rows().await?;
    info!("Listed {} applications", rows.len());
    Ok(rows)
}
