use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetIsActiveInput {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeactivateUsersInput {
    pub user_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

/// Outcome of the deactivation cascade for one pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeOutcome {
    pub pull_request_id: String,
    pub assigned_reviewers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeFailure {
    pub pull_request_id: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeactivationReport {
    pub deactivated: Vec<String>,
    pub reassigned: Vec<CascadeOutcome>,
    pub failed: Vec<CascadeFailure>,
}

impl DeactivationReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
