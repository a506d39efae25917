//! Recommendation orchestration.
//!
//! Flow: load user → load internships → build scoring request → call the
//! gateway once → merge scores back into full records in gateway order.
//!
//! A gateway failure is never surfaced: the caller gets every internship in
//! storage order, unscored.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::internship::Internship;
use crate::scoring_client::{ScoredInternship, ScoringGateway, ScoringRequest};
use crate::store::Store;

/// An internship with its match score. `score` is omitted in fallback results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub internship: Internship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Builds ranked recommendations for a user.
///
/// Fails only when the user does not exist or a store read fails.
pub async fn recommend_for_user(
    store: &dyn Store,
    gateway: &dyn ScoringGateway,
    user_id: Uuid,
) -> Result<Vec<Recommendation>, AppError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let internships = store.list_internships().await?;
    let request = ScoringRequest::build(&user, &internships);

    match gateway.score(&request).await {
        Ok(scored) => {
            let ranked = merge_scores(internships, scored);
            info!("Built {} ranked recommendations for user {user_id}", ranked.len());
            Ok(ranked)
        }
        Err(e) => {
            warn!("Scoring service failed for user {user_id}, falling back to unranked list: {e}");
            Ok(unranked(internships))
        }
    }
}

/// Maps scored pairs onto internships by id string, keeping the gateway's order.
/// Pairs naming an unknown internship are dropped.
fn merge_scores(internships: Vec<Internship>, scored: Vec<ScoredInternship>) -> Vec<Recommendation> {
    let by_id: HashMap<String, Internship> = internships
        .into_iter()
        .map(|i| (i.id.to_string(), i))
        .collect();

    scored
        .into_iter()
        .filter_map(|pair| {
            by_id.get(&pair.internship_id).map(|internship| Recommendation {
                internship: internship.clone(),
                score: Some(pair.score),
            })
        })
        .collect()
}

fn unranked(internships: Vec<Internship>) -> Vec<Recommendation> {
    internships
        .into_iter()
        .map(|internship| Recommendation {
            internship,
            score: None,
        })
        .collect()
}
