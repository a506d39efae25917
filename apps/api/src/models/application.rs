use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::internship::Internship;

pub const DEFAULT_STATUS: &str = "pending";

/// One entry of a user's `applied` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppliedEntry {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub internship_id: Uuid,
    pub applied_at: DateTime<Utc>,
    pub status: String,
}

/// An applied entry with the referenced internship inlined under `internshipId`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedApplication {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "internshipId")]
    pub internship: Internship,
    pub applied_at: DateTime<Utc>,
    pub status: String,
}

/// Admin listing row: one per (student, application) whose internship still exists.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub student_name: String,
    pub student_email: String,
    pub role: String,
    pub company: String,
    pub contact: String,
    pub date: DateTime<Utc>,
    pub status: String,
}

/// Inlines internships into applied entries. Entries whose internship is gone are dropped.
pub fn populate(entries: Vec<AppliedEntry>, internships: &[Internship]) -> Vec<PopulatedApplication> {
    let by_id: HashMap<Uuid, &Internship> = internships.iter().map(|i| (i.id, i)).collect();

    entries
        .into_iter()
        .filter_map(|entry| {
            by_id.get(&entry.internship_id).map(|internship| PopulatedApplication {
                id: entry.id,
                internship: (*internship).clone(),
                applied_at: entry.applied_at,
                status: entry.status,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn internship(title: &str) -> Internship {
        Internship {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            required_skills: vec![],
            description: None,
            duration: None,
            stipend: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry(internship_id: Uuid) -> AppliedEntry {
        AppliedEntry {
            id: Uuid::new_v4(),
            internship_id,
            applied_at: Utc::now(),
            status: DEFAULT_STATUS.to_string(),
        }
    }

    #[test]
    fn test_populate_keeps_entry_order() {
        let a = internship("A");
        let b = internship("B");
        let entries = vec![entry(b.id), entry(a.id)];

        let populated = populate(entries, &[a.clone(), b.clone()]);
        assert_eq!(populated.len(), 2);
        assert_eq!(populated[0].internship.title, "B");
        assert_eq!(populated[1].internship.title, "A");
    }

    #[test]
    fn test_populate_drops_dangling_references() {
        let a = internship("A");
        let entries = vec![entry(a.id), entry(Uuid::new_v4())];

        let populated = populate(entries, &[a]);
        assert_eq!(populated.len(), 1);
    }

    #[test]
    fn test_populated_entry_serializes_internship_under_internship_id() {
        let a = internship("Data Intern");
        let populated = populate(vec![entry(a.id)], &[a]);
        let value = serde_json::to_value(&populated[0]).unwrap();
        assert_eq!(value["internshipId"]["title"], "Data Intern");
        assert_eq!(value["status"], "pending");
        assert!(value["appliedAt"].is_string());
    }
}
