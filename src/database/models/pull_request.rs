use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum PullRequestStatus {
        Open => "OPEN",
        Merged => "MERGED",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PullRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    /// Ordered; positions are kept stable across single-reviewer swaps.
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.assigned_reviewers.iter().any(|id| id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePullRequestInput {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergePullRequestInput {
    pub pull_request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignReviewerInput {
    pub pull_request_id: String,
    #[serde(alias = "old_reviewer_id")]
    pub old_user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestEnvelope {
    pub pr: PullRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignResult {
    pub pr: PullRequest,
    pub replaced_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReviews {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShort>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReviewCount {
    pub user_id: String,
    pub reviews: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("OPEN".parse::<PullRequestStatus>(), Ok(PullRequestStatus::Open));
        assert_eq!("merged".parse::<PullRequestStatus>(), Ok(PullRequestStatus::Merged));
        assert!("CLOSED".parse::<PullRequestStatus>().is_err());
        assert_eq!(PullRequestStatus::Merged.to_string(), "MERGED");
    }

    #[test]
    fn status_serializes_in_upper_case() {
        let json = serde_json::to_string(&PullRequestStatus::Open).unwrap();
        assert_eq!(json, "\"OPEN\"");
    }

    #[test]
    fn reassign_input_accepts_both_field_names() {
        let a: ReassignReviewerInput =
            serde_json::from_str(r#"{"pull_request_id":"pr-1","old_user_id":"u2"}"#).unwrap();
        let b: ReassignReviewerInput =
            serde_json::from_str(r#"{"pull_request_id":"pr-1","old_reviewer_id":"u2"}"#).unwrap();
        assert_eq!(a.old_user_id, "u2");
        assert_eq!(b.old_user_id, "u2");
    }

    #[test]
    fn pull_request_helpers() {
        let pr = PullRequest {
            pull_request_id: "pr-1".into(),
            pull_request_name: "Add feature".into(),
            author_id: "u1".into(),
            status: PullRequestStatus::Open,
            assigned_reviewers: vec!["u2".into(), "u3".into()],
            created_at: Utc::now(),
            merged_at: None,
        };

        assert!(!pr.is_merged());
        assert!(pr.has_reviewer("u3"));
        assert!(!pr.has_reviewer("u1"));
    }
}
