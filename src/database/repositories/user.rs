use sqlx::{PgPool, Postgres, Transaction};

use crate::database::{
    models::{TeamMember, User},
    utils::sql,
};

/// Inserts the member or moves an existing user into `team_name`.
pub async fn upsert_member(
    tx: &mut Transaction<'_, Postgres>,
    team_name: &str,
    member: &TeamMember,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql(r#"
            INSERT INTO
                users (
                    user_id,
                    username,
                    team_name,
                    is_active
                )
            VALUES
                (?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE
            SET
                username = EXCLUDED.username,
                team_name = EXCLUDED.team_name,
                is_active = EXCLUDED.is_active
        "#))
    .bind(&member.user_id)
    .bind(&member.username)
    .bind(team_name)
    .bind(member.is_active)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn find_by_id(pool: &PgPool, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                user_id,
                username,
                team_name,
                is_active
            FROM
                users
            WHERE
                user_id = ?
        "#))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn user_exists(pool: &PgPool, user_id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(&sql(
        "SELECT EXISTS (SELECT 1 FROM users WHERE user_id = ?)",
    ))
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn set_is_active(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    is_active: bool,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&sql(r#"
            UPDATE
                users
            SET
                is_active = ?
            WHERE
                user_id = ?
            RETURNING
                user_id,
                username,
                team_name,
                is_active
        "#))
    .bind(is_active)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Marks every known id inactive and returns the ids that were found.
pub async fn deactivate_many(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(&sql(r#"
            UPDATE
                users
            SET
                is_active = FALSE
            WHERE
                user_id = ANY(?)
            RETURNING
                user_id
        "#))
    .bind(user_ids)
    .fetch_all(&mut **tx)
    .await
}
