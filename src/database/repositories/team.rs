use sqlx::{PgPool, Postgres, Transaction};

use crate::database::{models::TeamMember, utils::sql};

pub async fn team_exists(pool: &PgPool, team_name: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(&sql(
        "SELECT EXISTS (SELECT 1 FROM teams WHERE team_name = ?)",
    ))
    .bind(team_name)
    .fetch_one(pool)
    .await
}

pub async fn create_team(
    tx: &mut Transaction<'_, Postgres>,
    team_name: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql("INSERT INTO teams (team_name) VALUES (?)"))
        .bind(team_name)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn get_team_members(
    pool: &PgPool,
    team_name: &str,
) -> Result<Vec<TeamMember>, sqlx::Error> {
    let members = sqlx::query_as::<_, TeamMember>(&sql(r#"
            SELECT
                user_id,
                username,
                is_active
            FROM
                users
            WHERE
                team_name = ?
            ORDER BY
                user_id
        "#))
    .bind(team_name)
    .fetch_all(pool)
    .await?;

    Ok(members)
}
