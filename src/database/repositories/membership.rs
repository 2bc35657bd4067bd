//! Read-only queries answering who may review a given pull request.

use sqlx::{Postgres, Transaction};

use crate::database::utils::sql;
use crate::error::AppError;

/// Active members of `author_id`'s team, excluding the author.
pub async fn active_teammates(
    tx: &mut Transaction<'_, Postgres>,
    author_id: &str,
) -> Result<Vec<String>, AppError> {
    let team_name = sqlx::query_scalar::<_, String>(&sql(r#"
            SELECT
                team_name
            FROM
                users
            WHERE
                user_id = ?
        "#))
    .bind(author_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("author {}", author_id)))?;

    let teammates = sqlx::query_scalar::<_, String>(&sql(r#"
            SELECT
                user_id
            FROM
                users
            WHERE
                team_name = ?
                AND is_active = TRUE
                AND user_id <> ?
            ORDER BY
                user_id
        "#))
    .bind(team_name)
    .bind(author_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(teammates)
}

/// Active members of the pull request author's team who could take over a
/// slot: never the author, never anyone in `excluded_ids`, never anyone
/// already assigned to the pull request.
pub async fn eligible_replacements(
    tx: &mut Transaction<'_, Postgres>,
    pull_request_id: &str,
    excluded_ids: &[String],
) -> Result<Vec<String>, AppError> {
    let author_found = sqlx::query_scalar::<_, bool>(&sql(r#"
            SELECT
                EXISTS (
                    SELECT
                        1
                    FROM
                        pull_requests pr
                        INNER JOIN users author ON author.user_id = pr.author_id
                    WHERE
                        pr.pull_request_id = ?
                )
        "#))
    .bind(pull_request_id)
    .fetch_one(&mut **tx)
    .await?;

    if !author_found {
        return Err(AppError::NotFound(format!(
            "pull request {}",
            pull_request_id
        )));
    }

    let candidates = sqlx::query_scalar::<_, String>(&sql(r#"
            SELECT
                u.user_id
            FROM
                pull_requests pr
                INNER JOIN users author ON author.user_id = pr.author_id
                INNER JOIN users u ON u.team_name = author.team_name
            WHERE
                pr.pull_request_id = ?
                AND u.is_active = TRUE
                AND u.user_id <> pr.author_id
                AND NOT (u.user_id = ANY(?))
                AND NOT (u.user_id = ANY(pr.assigned_reviewers))
            ORDER BY
                u.user_id
        "#))
    .bind(pull_request_id)
    .bind(excluded_ids)
    .fetch_all(&mut **tx)
    .await?;

    Ok(candidates)
}
