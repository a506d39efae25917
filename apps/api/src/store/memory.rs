use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{AppliedEntry, ApplicationRow, DEFAULT_STATUS};
use crate::models::internship::{Internship, InternshipFields, NewInternship};
use crate::models::user::{NewUser, ProfileUpdate, User};
use crate::store::{AppendOutcome, Store};

/// In-memory store used by tests. Mirrors the Postgres semantics, including
/// the unique email and unique (user, internship) constraints.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    internships: Vec<Internship>,
    applications: Vec<(Uuid, AppliedEntry)>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.inner.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            skills: user.skills,
            interests: user.interests,
            education: None,
            description: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut tables = self.inner.lock().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(skills) = update.skills {
            user.skills = skills;
        }
        if let Some(interests) = update.interests {
            user.interests = interests;
        }
        if let Some(education) = update.education {
            user.education = Some(education);
        }
        if let Some(description) = update.description {
            user.description = Some(description);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn list_internships(&self) -> Result<Vec<Internship>, AppError> {
        Ok(self.inner.lock().await.internships.clone())
    }

    async fn find_internship(&self, id: Uuid) -> Result<Option<Internship>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables.internships.iter().find(|i| i.id == id).cloned())
    }

    async fn internships_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Internship>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables
            .internships
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn create_internship(&self, internship: NewInternship) -> Result<Internship, AppError> {
        let now = Utc::now();
        let created = Internship {
            id: Uuid::new_v4(),
            title: internship.title,
            company: internship.company,
            location: internship.location,
            required_skills: internship.required_skills,
            description: internship.description,
            duration: internship.duration,
            stipend: internship.stipend,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().await.internships.push(created.clone());
        Ok(created)
    }

    async fn update_internship(
        &self,
        id: Uuid,
        fields: InternshipFields,
    ) -> Result<Option<Internship>, AppError> {
        let mut tables = self.inner.lock().await;
        let Some(internship) = tables.internships.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(title) = fields.title {
            internship.title = title;
        }
        if let Some(company) = fields.company {
            internship.company = company;
        }
        if let Some(location) = fields.location {
            internship.location = location;
        }
        if let Some(required_skills) = fields.required_skills {
            internship.required_skills = required_skills;
        }
        if fields.description.is_some() {
            internship.description = fields.description;
        }
        if fields.duration.is_some() {
            internship.duration = fields.duration;
        }
        if fields.stipend.is_some() {
            internship.stipend = fields.stipend;
        }
        internship.updated_at = Utc::now();
        Ok(Some(internship.clone()))
    }

    async fn delete_internship(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.inner.lock().await;
        let before = tables.internships.len();
        tables.internships.retain(|i| i.id != id);
        let deleted = tables.internships.len() < before;
        if deleted {
            // ON DELETE CASCADE
            tables.applications.retain(|(_, e)| e.internship_id != id);
        }
        Ok(deleted)
    }

    async fn applied_entries(&self, user_id: Uuid) -> Result<Vec<AppliedEntry>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables
            .applications
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn append_application(
        &self,
        user_id: Uuid,
        internship_id: Uuid,
    ) -> Result<AppendOutcome, AppError> {
        let mut tables = self.inner.lock().await;
        let exists = tables
            .applications
            .iter()
            .any(|(owner, e)| *owner == user_id && e.internship_id == internship_id);
        if exists {
            return Ok(AppendOutcome::AlreadyApplied);
        }
        tables.applications.push((
            user_id,
            AppliedEntry {
                id: Uuid::new_v4(),
                internship_id,
                applied_at: Utc::now(),
                status: DEFAULT_STATUS.to_string(),
            },
        ));
        Ok(AppendOutcome::Appended)
    }

    async fn application_rows(&self) -> Result<Vec<ApplicationRow>, AppError> {
        let tables = self.inner.lock().await;
        let mut rows = Vec::new();
        for user in &tables.users {
            for (_, entry) in tables.applications.iter().filter(|(owner, _)| *owner == user.id) {
                let Some(internship) = tables
                    .internships
                    .iter()
                    .find(|i| i.id == entry.internship_id)
                else {
                    continue;
                };
                rows.push(ApplicationRow {
                    student_name: user.name.clone(),
                    student_email: user.email.clone(),
                    role: internship.title.clone(),
                    company: internship.company.clone(),
                    contact: user.email.clone(),
                    date: entry.applied_at,
                    status: entry.status.clone(),
                });
            }
        }
        Ok(rows)
    }
}

impl MemoryStore {
    /// Test hook: drops an internship row without cascading, leaving dangling
    /// applied entries behind.
    pub async fn remove_internship_row(&self, id: Uuid) {
        self.inner.lock().await.internships.retain(|i| i.id != id);
    }
}
