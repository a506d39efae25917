use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

pub const DEFAULT_LOCATION: &str = "Remote";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub required_skills: Vec<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub stipend: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInternship {
    pub title: String,
    pub company: String,
    pub location: String,
    pub required_skills: Vec<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub stipend: Option<String>,
}

/// Request body for create and update. Unknown keys (e.g. a legacy `userRole`)
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipFields {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub stipend: Option<String>,
}

impl InternshipFields {
    /// Validates a create request and fills in defaults.
    pub fn into_new(self) -> Result<NewInternship, AppError> {
        let title = non_blank(self.title)
            .ok_or_else(|| AppError::Validation("title and company are required".to_string()))?;
        let company = non_blank(self.company)
            .ok_or_else(|| AppError::Validation("title and company are required".to_string()))?;

        Ok(NewInternship {
            title,
            company,
            location: non_blank(self.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            required_skills: self.required_skills.unwrap_or_default(),
            description: self.description,
            duration: self.duration,
            stipend: self.stipend,
        })
    }

    /// Rejects updates that would blank out a required field.
    pub fn validate_update(&self) -> Result<(), AppError> {
        let blanks = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blanks(&self.title) || blanks(&self.company) {
            return Err(AppError::Validation(
                "title and company cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
