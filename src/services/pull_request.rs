use std::sync::Arc;

use sqlx::PgPool;

use crate::database::{
    DatabaseTransaction,
    models::{CreatePullRequestInput, PullRequest, PullRequestShort},
    repositories::{membership, pull_request as pr_repo, user as user_repo},
};
use crate::error::{AppError, require_non_blank};
use crate::services::ReviewerSelector;

/// Reviewers picked when a pull request is opened.
pub const REVIEWERS_PER_PULL_REQUEST: usize = 2;

/// Fails when the reviewer set of `pull_request` is frozen.
pub fn ensure_open(pull_request: &PullRequest) -> Result<(), AppError> {
    if pull_request.is_merged() {
        return Err(AppError::AlreadyMerged(
            pull_request.pull_request_id.clone(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PullRequestService {
    pool: PgPool,
    selector: Arc<dyn ReviewerSelector>,
}

impl PullRequestService {
    pub fn new(pool: PgPool, selector: Arc<dyn ReviewerSelector>) -> Self {
        Self { pool, selector }
    }

    /// Opens a pull request with up to two active teammates of the author.
    ///
    /// The candidate read and the insert share one transaction.
    pub async fn create(&self, input: CreatePullRequestInput) -> Result<PullRequest, AppError> {
        require_non_blank("pull_request_id", &input.pull_request_id)?;
        require_non_blank("pull_request_name", &input.pull_request_name)?;
        require_non_blank("author_id", &input.author_id)?;

        let selector = self.selector.clone();

        let pull_request = DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                if pr_repo::exists(tx, &input.pull_request_id).await? {
                    return Err(AppError::AlreadyExists(input.pull_request_id));
                }

                let teammates = membership::active_teammates(tx, &input.author_id).await?;
                log::debug!(
                    "Found {} reviewer candidates for {}",
                    teammates.len(),
                    input.pull_request_id
                );

                let reviewers = selector.select(teammates, REVIEWERS_PER_PULL_REQUEST);

                pr_repo::insert(
                    tx,
                    &input.pull_request_id,
                    &input.pull_request_name,
                    &input.author_id,
                    &reviewers,
                )
                .await
                .map_err(|e| {
                    if AppError::is_unique_violation(&e) {
                        AppError::AlreadyExists(input.pull_request_id.clone())
                    } else {
                        AppError::from(e)
                    }
                })
            })
        })
        .await?;

        log::info!(
            "Pull request {} created by {} with reviewers {:?}",
            pull_request.pull_request_id,
            pull_request.author_id,
            pull_request.assigned_reviewers
        );

        Ok(pull_request)
    }

    /// Marks the pull request merged. Merging twice keeps the first timestamp.
    pub async fn merge(&self, pull_request_id: &str) -> Result<PullRequest, AppError> {
        require_non_blank("pull_request_id", pull_request_id)?;

        let pull_request = pr_repo::merge(&self.pool, pull_request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pull request {}", pull_request_id)))?;

        log::info!("Pull request {} merged", pull_request.pull_request_id);

        Ok(pull_request)
    }

    pub async fn get(&self, pull_request_id: &str) -> Result<PullRequest, AppError> {
        pr_repo::find_by_id(&self.pool, pull_request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pull request {}", pull_request_id)))
    }

    pub async fn is_merged(&self, pull_request_id: &str) -> Result<bool, AppError> {
        Ok(self.get(pull_request_id).await?.is_merged())
    }

    /// Pull requests where `user_id` is currently an assigned reviewer.
    pub async fn get_reviews_for(&self, user_id: &str) -> Result<Vec<PullRequestShort>, AppError> {
        require_non_blank("user_id", user_id)?;

        Ok(pr_repo::find_reviewed_by(&self.pool, user_id).await?)
    }

    pub async fn count_reviews_for(&self, user_id: &str) -> Result<i64, AppError> {
        require_non_blank("user_id", user_id)?;

        if !user_repo::user_exists(&self.pool, user_id).await? {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }

        Ok(pr_repo::count_reviewed_by(&self.pool, user_id).await?)
    }
}
