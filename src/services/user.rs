use std::collections::HashSet;

use sqlx::PgPool;

use crate::database::{
    DatabaseTransaction,
    models::{DeactivationReport, User},
    repositories::user as user_repo,
};
use crate::error::{AppError, require_non_blank};
use crate::services::ReassignmentService;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    reassignment: ReassignmentService,
}

impl UserService {
    pub fn new(pool: PgPool, reassignment: ReassignmentService) -> Self {
        Self { pool, reassignment }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, AppError> {
        user_repo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))
    }

    /// Flips a single user's flag. Existing assignments are left alone.
    pub async fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User, AppError> {
        require_non_blank("user_id", user_id)?;

        let id = user_id.to_string();
        let user = DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                user_repo::set_is_active(tx, &id, is_active)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
            })
        })
        .await?;

        log::info!("User {} is_active set to {}", user.user_id, user.is_active);

        Ok(user)
    }

    /// Deactivates `user_ids`, then moves their open reviews to active
    /// teammates. Unknown ids are skipped.
    pub async fn deactivate(&self, user_ids: Vec<String>) -> Result<DeactivationReport, AppError> {
        if user_ids.is_empty() {
            return Err(AppError::BadRequest("user_ids must not be empty".to_string()));
        }
        for user_id in &user_ids {
            require_non_blank("user_id", user_id)?;
        }

        let mut seen = HashSet::new();
        let requested: Vec<String> = user_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let ids = requested.clone();
        let found: HashSet<String> = DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move { Ok(user_repo::deactivate_many(tx, &ids).await?) })
        })
        .await?
        .into_iter()
        .collect();

        let deactivated: Vec<String> = requested
            .into_iter()
            .filter(|id| found.contains(id))
            .collect();
        log::info!("Deactivated users {:?}", deactivated);

        let cascade = self.reassignment.reassign_deactivated(&deactivated).await?;
        if !cascade.failed.is_empty() {
            log::warn!(
                "Deactivation cascade failed for {} pull requests",
                cascade.failed.len()
            );
        }

        Ok(DeactivationReport {
            deactivated,
            reassigned: cascade.reassigned,
            failed: cascade.failed,
        })
    }
}
