/// Scoring client: the boundary to the external recommendation service.
///
/// The service owns the ranking algorithm. This module only ships a student
/// profile plus candidate internships and reads back `(internship_id, score)`
/// pairs. One attempt per call: no retry, transport-default timeout.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::internship::Internship;
use crate::models::user::User;

const RECOMMEND_PATH: &str = "/recommend";

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scoring service error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Malformed scoring response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProfile {
    pub id: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub education: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInternship {
    pub id: String,
    pub title: String,
    pub company: String,
    pub required_skills: Vec<String>,
    pub description: String,
}

/// Payload POSTed to `{ML_SERVICE_URL}/recommend`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringRequest {
    pub student: StudentProfile,
    pub internships: Vec<CandidateInternship>,
}

impl ScoringRequest {
    /// Absent optional fields are sent as empty strings.
    pub fn build(user: &User, internships: &[Internship]) -> Self {
        Self {
            student: StudentProfile {
                id: user.id.to_string(),
                skills: user.skills.clone(),
                interests: user.interests.clone(),
                education: user.education.clone().unwrap_or_default(),
                description: user.description.clone().unwrap_or_default(),
            },
            internships: internships
                .iter()
                .map(|i| CandidateInternship {
                    id: i.id.to_string(),
                    title: i.title.clone(),
                    company: i.company.clone(),
                    required_skills: i.required_skills.clone(),
                    description: i.description.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredInternship {
    pub internship_id: String,
    pub score: f64,
}

/// The gateway trait. `AppState` carries it as `Arc<dyn ScoringGateway>`.
#[async_trait]
pub trait ScoringGateway: Send + Sync {
    /// Returns pairs in the service's ranking order.
    async fn score(&self, request: &ScoringRequest) -> Result<Vec<ScoredInternship>, ScoringError>;
}

/// HTTP client for the ML recommendation service.
#[derive(Clone)]
pub struct MlScoringClient {
    client: Client,
    endpoint: String,
}

impl MlScoringClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{RECOMMEND_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScoringGateway for MlScoringClient {
    async fn score(&self, request: &ScoringRequest) -> Result<Vec<ScoredInternship>, ScoringError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScoringError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let scored: Vec<ScoredInternship> = serde_json::from_str(&body)?;
        debug!(
            "Scoring service ranked {} of {} candidates",
            scored.len(),
            request.internships.len()
        );
        Ok(scored)
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Canned gateway for tests. Counts calls.
    pub struct StubGateway {
        response: Option<Vec<ScoredInternship>>,
        calls: AtomicUsize,
    }

    impl StubGateway {
        pub fn scoring(pairs: Vec<(String, f64)>) -> Self {
            Self {
                response: Some(
                    pairs
                        .into_iter()
                        .map(|(internship_id, score)| ScoredInternship {
                            internship_id,
                            score,
                        })
                        .collect(),
                ),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn unavailable() -> Self {
            Self {
                response: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScoringGateway for StubGateway {
        async fn score(
            &self,
            _request: &ScoringRequest,
        ) -> Result<Vec<ScoredInternship>, ScoringError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().ok_or(ScoringError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            })
        }
    }
}
