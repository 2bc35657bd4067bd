use std::collections::HashSet;

use sqlx::PgPool;

use crate::database::{
    DatabaseTransaction,
    models::{CreateTeamInput, Team},
    repositories::{team as team_repo, user as user_repo},
};
use crate::error::{AppError, require_non_blank};

#[derive(Clone)]
pub struct TeamService {
    pool: PgPool,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the team and upserts its members in one transaction.
    /// Existing users named in `members` move into the new team.
    pub async fn create_team(&self, input: CreateTeamInput) -> Result<Team, AppError> {
        require_non_blank("team_name", &input.team_name)?;

        let mut seen = HashSet::new();
        for member in &input.members {
            require_non_blank("user_id", &member.user_id)?;
            require_non_blank("username", &member.username)?;
            if !seen.insert(member.user_id.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "duplicate member {}",
                    member.user_id
                )));
            }
        }

        if team_repo::team_exists(&self.pool, &input.team_name).await? {
            return Err(AppError::TeamExists(input.team_name));
        }

        let team_name = input.team_name.clone();
        DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                team_repo::create_team(tx, &input.team_name)
                    .await
                    .map_err(|e| {
                        if AppError::is_unique_violation(&e) {
                            AppError::TeamExists(input.team_name.clone())
                        } else {
                            AppError::from(e)
                        }
                    })?;

                for member in &input.members {
                    user_repo::upsert_member(tx, &input.team_name, member).await?;
                }

                Ok(())
            })
        })
        .await?;

        log::info!("Team {} created", team_name);

        self.get_team(&team_name).await
    }

    pub async fn get_team(&self, team_name: &str) -> Result<Team, AppError> {
        require_non_blank("team_name", team_name)?;

        if !team_repo::team_exists(&self.pool, team_name).await? {
            return Err(AppError::NotFound(format!("team {}", team_name)));
        }

        let members = team_repo::get_team_members(&self.pool, team_name).await?;

        Ok(Team {
            team_name: team_name.to_string(),
            members,
        })
    }
}
