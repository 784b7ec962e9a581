/*
 * Responsibility
 * - follows: create / delete edges, list either side of the edge as profiles
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::profile_repo::ProfileSummaryRow;

#[derive(Debug, Clone, FromRow)]
pub struct FollowRow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// `RepoError::Conflict` when the edge already exists.
pub async fn create(pool: &PgPool, follower_id: Uuid, following_id: Uuid) -> RepoResult<FollowRow> {
    let row = sqlx::query_as::<_, FollowRow>(
        r#"
        INSERT INTO follows (follower_id, following_id)
        VALUES ($1, $2)
        RETURNING id, follower_id, following_id, created_at
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .fetch_one(pool)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Number of edges removed (0 or 1).
pub async fn delete(pool: &PgPool, follower_id: Uuid, following_id: Uuid) -> RepoResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND following_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Profiles that follow `user_id`.
pub async fn followers(pool: &PgPool, user_id: Uuid) -> RepoResult<Vec<ProfileSummaryRow>> {
    let rows = sqlx::query_as::<_, ProfileSummaryRow>(
        r#"
        SELECT p.id, p.username, p.full_name, p.avatar_url
        FROM follows f
        JOIN profiles p ON p.id = f.follower_id
        WHERE f.following_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Profiles `user_id` follows.
pub async fn following(pool: &PgPool, user_id: Uuid) -> RepoResult<Vec<ProfileSummaryRow>> {
    let rows = sqlx::query_as::<_, ProfileSummaryRow>(
        r#"
        SELECT p.id, p.username, p.full_name, p.avatar_url
        FROM follows f
        JOIN profiles p ON p.id = f.following_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
