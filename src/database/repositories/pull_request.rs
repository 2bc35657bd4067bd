use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::{
    models::{PullRequest, PullRequestShort, PullRequestStatus},
    utils::sql,
};

const PULL_REQUEST_COLUMNS: &str = r#"
    pull_request_id,
    pull_request_name,
    author_id,
    status,
    assigned_reviewers,
    created_at,
    merged_at
"#;

pub async fn exists(
    tx: &mut Transaction<'_, Postgres>,
    pull_request_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(&sql(
        "SELECT EXISTS (SELECT 1 FROM pull_requests WHERE pull_request_id = ?)",
    ))
    .bind(pull_request_id)
    .fetch_one(&mut **tx)
    .await
}

pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    pull_request_id: &str,
    pull_request_name: &str,
    author_id: &str,
    reviewers: &[String],
) -> Result<PullRequest, sqlx::Error> {
    let pull_request = sqlx::query_as::<_, PullRequest>(&sql(&format!(
        r#"
            INSERT INTO
                pull_requests (
                    pull_request_id,
                    pull_request_name,
                    author_id,
                    status,
                    assigned_reviewers,
                    created_at,
                    merged_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, NULL)
            RETURNING
                {}
        "#,
        PULL_REQUEST_COLUMNS
    )))
    .bind(pull_request_id)
    .bind(pull_request_name)
    .bind(author_id)
    .bind(PullRequestStatus::Open)
    .bind(reviewers)
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await?;

    Ok(pull_request)
}

pub async fn find_by_id(
    pool: &PgPool,
    pull_request_id: &str,
) -> Result<Option<PullRequest>, sqlx::Error> {
    sqlx::query_as::<_, PullRequest>(&sql(&format!(
        "SELECT {} FROM pull_requests WHERE pull_request_id = ?",
        PULL_REQUEST_COLUMNS
    )))
    .bind(pull_request_id)
    .fetch_optional(pool)
    .await
}

/// Reads the pull request and locks its row until the transaction ends.
pub async fn find_for_update(
    tx: &mut Transaction<'_, Postgres>,
    pull_request_id: &str,
) -> Result<Option<PullRequest>, sqlx::Error> {
    sqlx::query_as::<_, PullRequest>(&sql(&format!(
        "SELECT {} FROM pull_requests WHERE pull_request_id = ? FOR UPDATE",
        PULL_REQUEST_COLUMNS
    )))
    .bind(pull_request_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Plain read inside the transaction; no row lock is taken.
pub async fn find_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    pull_request_id: &str,
) -> Result<Option<PullRequest>, sqlx::Error> {
    sqlx::query_as::<_, PullRequest>(&sql(&format!(
        "SELECT {} FROM pull_requests WHERE pull_request_id = ?",
        PULL_REQUEST_COLUMNS
    )))
    .bind(pull_request_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Sets MERGED; an existing merge timestamp is kept.
pub async fn merge(
    pool: &PgPool,
    pull_request_id: &str,
) -> Result<Option<PullRequest>, sqlx::Error> {
    sqlx::query_as::<_, PullRequest>(&sql(&format!(
        r#"
            UPDATE
                pull_requests
            SET
                status = ?,
                merged_at = COALESCE(merged_at, ?)
            WHERE
                pull_request_id = ?
            RETURNING
                {}
        "#,
        PULL_REQUEST_COLUMNS
    )))
    .bind(PullRequestStatus::Merged)
    .bind(Utc::now())
    .bind(pull_request_id)
    .fetch_optional(pool)
    .await
}

/// Swaps `old_reviewer_id` for `new_reviewer_id` in place.
///
/// Only applies while the pull request is still OPEN, still has the old
/// reviewer and does not already have the new one; returns `None` otherwise.
pub async fn replace_reviewer(
    tx: &mut Transaction<'_, Postgres>,
    pull_request_id: &str,
    old_reviewer_id: &str,
    new_reviewer_id: &str,
) -> Result<Option<PullRequest>, sqlx::Error> {
    sqlx::query_as::<_, PullRequest>(&sql(&format!(
        r#"
            UPDATE
                pull_requests
            SET
                assigned_reviewers = array_replace(assigned_reviewers, ?, ?)
            WHERE
                pull_request_id = ?
                AND status = ?
                AND ? = ANY(assigned_reviewers)
                AND NOT (? = ANY(assigned_reviewers))
            RETURNING
                {}
        "#,
        PULL_REQUEST_COLUMNS
    )))
    .bind(old_reviewer_id)
    .bind(new_reviewer_id)
    .bind(pull_request_id)
    .bind(PullRequestStatus::Open)
    .bind(old_reviewer_id)
    .bind(new_reviewer_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Overwrites the reviewer list of an OPEN pull request.
pub async fn set_reviewers(
    tx: &mut Transaction<'_, Postgres>,
    pull_request_id: &str,
    reviewers: &[String],
) -> Result<Option<PullRequest>, sqlx::Error> {
    sqlx::query_as::<_, PullRequest>(&sql(&format!(
        r#"
            UPDATE
                pull_requests
            SET
                assigned_reviewers = ?
            WHERE
                pull_request_id = ?
                AND status = ?
            RETURNING
                {}
        "#,
        PULL_REQUEST_COLUMNS
    )))
    .bind(reviewers)
    .bind(pull_request_id)
    .bind(PullRequestStatus::Open)
    .fetch_optional(&mut **tx)
    .await
}

/// Ids of OPEN pull requests that have any of `user_ids` assigned.
pub async fn find_open_ids_reviewed_by_any(
    pool: &PgPool,
    user_ids: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(&sql(r#"
            SELECT
                pull_request_id
            FROM
                pull_requests
            WHERE
                status = ?
                AND assigned_reviewers && ?::TEXT[]
            ORDER BY
                created_at,
                pull_request_id
        "#))
    .bind(PullRequestStatus::Open)
    .bind(user_ids)
    .fetch_all(pool)
    .await
}

pub async fn find_reviewed_by(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<PullRequestShort>, sqlx::Error> {
    sqlx::query_as::<_, PullRequestShort>(&sql(r#"
            SELECT
                pull_request_id,
                pull_request_name,
                author_id,
                status
            FROM
                pull_requests
            WHERE
                ? = ANY(assigned_reviewers)
            ORDER BY
                created_at,
                pull_request_id
        "#))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn count_reviewed_by(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&sql(r#"
            SELECT
                COUNT(*)
            FROM
                pull_requests
            WHERE
                ? = ANY(assigned_reviewers)
        "#))
    .bind(user_id)
    .fetch_one(pool)
    .await
}
