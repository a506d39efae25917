// Internship listings, the application ledger and ranked recommendations.
// Scoring is delegated to the external service through scoring_client.

pub mod handlers;
pub mod ledger;
pub mod recommend;
