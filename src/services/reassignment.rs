use std::collections::HashSet;
use std::sync::Arc;

use sqlx::PgPool;

use crate::database::{
    DatabaseTransaction,
    models::{CascadeFailure, CascadeOutcome, PullRequest},
    repositories::{membership, pull_request as pr_repo},
};
use crate::error::{AppError, require_non_blank};
use crate::services::{ReviewerSelector, pull_request::ensure_open};

/// Per-pull-request results of a deactivation cascade.
#[derive(Debug, Default)]
pub struct CascadeResult {
    pub reassigned: Vec<CascadeOutcome>,
    pub failed: Vec<CascadeFailure>,
}

#[derive(Clone)]
pub struct ReassignmentService {
    pool: PgPool,
    selector: Arc<dyn ReviewerSelector>,
}

impl ReassignmentService {
    pub fn new(pool: PgPool, selector: Arc<dyn ReviewerSelector>) -> Self {
        Self { pool, selector }
    }

    /// Replaces `old_reviewer_id` with a random eligible teammate at the same
    /// position. Returns the updated pull request and the chosen reviewer.
    pub async fn reassign(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> Result<(PullRequest, String), AppError> {
        require_non_blank("pull_request_id", pull_request_id)?;
        require_non_blank("old_user_id", old_reviewer_id)?;

        let selector = self.selector.clone();
        let pr_id = pull_request_id.to_string();
        let old_id = old_reviewer_id.to_string();

        let (pull_request, replaced_by) = DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                // Concurrent swaps on one pull request run one after another.
                let current = pr_repo::find_for_update(tx, &pr_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("pull request {}", pr_id))
                    })?;
                check_reassignable(&current, &old_id)?;

                let candidates = membership::eligible_replacements(
                    tx,
                    &pr_id,
                    std::slice::from_ref(&old_id),
                )
                .await?;

                let replaced_by = selector
                    .select(candidates, 1)
                    .into_iter()
                    .next()
                    .ok_or_else(|| AppError::NoCandidate(pr_id.clone()))?;

                match pr_repo::replace_reviewer(tx, &pr_id, &old_id, &replaced_by)
                    .await?
                {
                    Some(updated) => Ok((updated, replaced_by)),
                    None => {
                        // The guarded update matched nothing: someone changed
                        // the row after we read it. Report what they did.
                        let latest = pr_repo::find_in_tx(tx, &pr_id)
                            .await?
                            .ok_or_else(|| {
                                AppError::NotFound(format!("pull request {}", pr_id))
                            })?;
                        check_reassignable(&latest, &old_id)?;
                        Err(AppError::NoCandidate(format!(
                            "{} was assigned to {} concurrently",
                            replaced_by, pr_id
                        )))
                    }
                }
            })
        })
        .await?;

        log::info!(
            "Reviewer {} replaced by {} on pull request {}",
            old_reviewer_id,
            replaced_by,
            pull_request.pull_request_id
        );

        Ok((pull_request, replaced_by))
    }

    /// Runs the deactivation cascade over every open pull request that has
    /// any of `deactivated` assigned.
    ///
    /// Each pull request is its own transaction; a failure is recorded and
    /// the remaining pull requests are still processed.
    pub async fn reassign_deactivated(
        &self,
        deactivated: &[String],
    ) -> Result<CascadeResult, AppError> {
        let mut result = CascadeResult::default();
        if deactivated.is_empty() {
            return Ok(result);
        }

        let affected = pr_repo::find_open_ids_reviewed_by_any(&self.pool, deactivated).await?;
        log::info!(
            "Deactivation of {:?} affects {} open pull requests",
            deactivated,
            affected.len()
        );

        for pull_request_id in affected {
            match self
                .cascade_one(pull_request_id.clone(), deactivated.to_vec())
                .await
            {
                Ok(Some(updated)) => result.reassigned.push(CascadeOutcome {
                    pull_request_id: updated.pull_request_id,
                    assigned_reviewers: updated.assigned_reviewers,
                }),
                Ok(None) => {
                    log::debug!("Pull request {} no longer needs a cascade", pull_request_id)
                }
                Err(e) => {
                    log::warn!("Cascade failed for pull request {}: {}", pull_request_id, e);
                    result.failed.push(CascadeFailure {
                        pull_request_id,
                        code: e.code().to_string(),
                        message: e.public_message(),
                    });
                }
            }
        }

        Ok(result)
    }

    /// Rewrites one pull request's reviewers; `None` when it was merged or no
    /// longer references a deactivated id by the time the row was locked.
    async fn cascade_one(
        &self,
        pull_request_id: String,
        deactivated: Vec<String>,
    ) -> Result<Option<PullRequest>, AppError> {
        let selector = self.selector.clone();

        DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                let Some(current) = pr_repo::find_for_update(tx, &pull_request_id).await? else {
                    return Err(AppError::NotFound(format!(
                        "pull request {}",
                        pull_request_id
                    )));
                };

                if current.is_merged()
                    || !current
                        .assigned_reviewers
                        .iter()
                        .any(|id| deactivated.contains(id))
                {
                    return Ok(None);
                }

                let candidates =
                    membership::eligible_replacements(tx, &pull_request_id, &deactivated).await?;
                let draw_len = candidates.len();
                let draw = selector.select(candidates, draw_len);

                let reviewers = plan_replacement(
                    &current.assigned_reviewers,
                    &current.author_id,
                    &deactivated,
                    &draw,
                );

                let updated = pr_repo::set_reviewers(tx, &pull_request_id, &reviewers).await?;
                if let Some(updated) = &updated {
                    log::info!(
                        "Pull request {} reviewers {:?} -> {:?}",
                        pull_request_id,
                        current.assigned_reviewers,
                        updated.assigned_reviewers
                    );
                }

                Ok(updated)
            })
        })
        .await
    }
}

fn check_reassignable(pull_request: &PullRequest, old_reviewer_id: &str) -> Result<(), AppError> {
    ensure_open(pull_request)?;
    if !pull_request.has_reviewer(old_reviewer_id) {
        return Err(AppError::NotAssigned(format!(
            "{} is not a reviewer of {}",
            old_reviewer_id, pull_request.pull_request_id
        )));
    }
    Ok(())
}

/// Computes the reviewer list left after removing `deactivated` ids.
///
/// Positions holding an active reviewer are kept. Each deactivated slot takes
/// the next id from `draw` that is not deactivated, not the author and not
/// already on the list; when `draw` runs out the slot is dropped.
pub fn plan_replacement(
    current: &[String],
    author_id: &str,
    deactivated: &[String],
    draw: &[String],
) -> Vec<String> {
    let deactivated: HashSet<&str> = deactivated.iter().map(String::as_str).collect();

    let mut used: HashSet<&str> = current
        .iter()
        .map(String::as_str)
        .filter(|id| !deactivated.contains(id))
        .collect();
    used.insert(author_id);

    let mut draw = draw.iter();
    let mut reviewers = Vec::with_capacity(current.len());

    for reviewer in current {
        if !deactivated.contains(reviewer.as_str()) {
            reviewers.push(reviewer.clone());
            continue;
        }

        let replacement = draw
            .by_ref()
            .find(|candidate| {
                !deactivated.contains(candidate.as_str()) && !used.contains(candidate.as_str())
            });

        if let Some(candidate) = replacement {
            used.insert(candidate.as_str());
            reviewers.push(candidate.clone());
        }
    }

    reviewers
}
