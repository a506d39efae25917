//! Record store: users, internships and the per-user application ledger.
//!
//! `AppState` holds an `Arc<dyn Store>`. Production uses `PgStore`; tests use
//! the in-memory `MemoryStore`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{AppliedEntry, ApplicationRow};
use crate::models::internship::{Internship, InternshipFields, NewInternship};
use crate::models::user::{NewUser, ProfileUpdate, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of a conditional append to a user's applied sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    AlreadyApplied,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Overwrites only the supplied fields. `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError>;

    /// All internships in creation order.
    async fn list_internships(&self) -> Result<Vec<Internship>, AppError>;

    async fn find_internship(&self, id: Uuid) -> Result<Option<Internship>, AppError>;

    /// Internships among `ids` that still exist, in no particular order.
    async fn internships_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Internship>, AppError>;

    async fn create_internship(&self, internship: NewInternship) -> Result<Internship, AppError>;

    /// Overwrites only the supplied fields. `None` when the internship does not exist.
    async fn update_internship(
        &self,
        id: Uuid,
        fields: InternshipFields,
    ) -> Result<Option<Internship>, AppError>;

    /// Returns false when nothing was deleted.
    async fn delete_internship(&self, id: Uuid) -> Result<bool, AppError>;

    /// The user's applied sequence in append order.
    async fn applied_entries(&self, user_id: Uuid) -> Result<Vec<AppliedEntry>, AppError>;

    /// Appends `{internship_id}` unless the pair already exists. Atomic per pair.
    async fn append_application(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> Result<AppendOutcome, AppError>;

    /// Inner join of users, their applications and the referenced internships.
    async fn application_rows(&self) -> Result<Vec<ApplicationRow>, AppError>;
}
