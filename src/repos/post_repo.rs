/*
 * Responsibility
 * - posts CRUD, always returned with the author's profile joined in
 * - ownership is enforced in the WHERE clause, never by a prior read
 * - timeline: posts by the users the caller follows
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::update;
use crate::services::partial_update::{AllowedField, UpdateSet};

pub const UPDATABLE_FIELDS: &[AllowedField] = &[AllowedField::same("content")];

#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,

    // LEFT JOIN: a post can outlive its author's profile.
    pub author_username: Option<String>,
    pub author_full_name: Option<String>,
    pub author_avatar_url: Option<String>,
}

const WITH_AUTHOR: &str = r#"
    SELECT
        p.id, p.user_id, p.content, p.created_at,
        a.username AS author_username,
        a.full_name AS author_full_name,
        a.avatar_url AS author_avatar_url
"#;

pub async fn list(
    pool: &PgPool,
    author: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<PostRow>> {
    let sql = format!(
        r#"
        {WITH_AUTHOR}
        FROM posts p
        LEFT JOIN profiles a ON a.id = p.user_id
        WHERE ($1::uuid IS NULL OR p.user_id = $1)
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#
    );

    let rows = sqlx::query_as::<_, PostRow>(&sql)
        .bind(author)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn timeline(
    pool: &PgPool,
    follower_id: Uuid,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<PostRow>> {
    let sql = format!(
        r#"
        {WITH_AUTHOR}
        FROM posts p
        JOIN follows f ON f.following_id = p.user_id
        LEFT JOIN profiles a ON a.id = p.user_id
        WHERE f.follower_id = $1
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#
    );

    let rows = sqlx::query_as::<_, PostRow>(&sql)
        .bind(follower_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn get(pool: &PgPool, post_id: Uuid) -> RepoResult<Option<PostRow>> {
    let sql = format!(
        r#"
        {WITH_AUTHOR}
        FROM posts p
        LEFT JOIN profiles a ON a.id = p.user_id
        WHERE p.id = $1
        "#
    );

    let row = sqlx::query_as::<_, PostRow>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn create(pool: &PgPool, author_id: Uuid, content: &str) -> RepoResult<PostRow> {
    let sql = format!(
        r#"
        WITH p AS (
            INSERT INTO posts (user_id, content)
            VALUES ($1, $2)
            RETURNING id, user_id, content, created_at
        )
        {WITH_AUTHOR}
        FROM p
        LEFT JOIN profiles a ON a.id = p.user_id
        "#
    );

    let row = sqlx::query_as::<_, PostRow>(&sql)
        .bind(author_id)
        .bind(content)
        .fetch_one(pool)
        .await
        .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub(crate) fn update_query(
    post_id: Uuid,
    owner_id: Uuid,
    set: &UpdateSet,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("WITH p AS (UPDATE posts SET ");
    update::push_assignments(&mut builder, set);
    builder.push(" WHERE id = ");
    builder.push_bind(post_id);
    builder.push(" AND user_id = ");
    builder.push_bind(owner_id);
    builder.push(" RETURNING id, user_id, content, created_at)");
    builder.push(WITH_AUTHOR);
    builder.push("FROM p LEFT JOIN profiles a ON a.id = p.user_id");
    builder
}

/// `None` when the post does not exist or belongs to someone else.
pub async fn apply_update(
    pool: &PgPool,
    post_id: Uuid,
    owner_id: Uuid,
    set: &UpdateSet,
) -> RepoResult<Option<PostRow>> {
    let mut builder = update_query(post_id, owner_id, set);
    let row = builder
        .build_query_as::<PostRow>()
        .fetch_optional(pool)
        .await
        .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, post_id: Uuid, owner_id: Uuid) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::partial_update::{FieldValue, UpdateRequest, build_update_set};

    struct ContentOnly(Option<String>);

    impl UpdateRequest for ContentOnly {
        fn value_of(&self, field: &str) -> Option<FieldValue> {
            match field {
                "content" => FieldValue::text(&self.0),
                _ => None,
            }
        }
    }

    #[test]
    fn update_is_scoped_to_the_owner() {
        let set = build_update_set(&ContentOnly(Some("edited".into())), UPDATABLE_FIELDS).unwrap();
        let builder = update_query(Uuid::new_v4(), Uuid::new_v4(), &set);
        let sql = builder.sql();

        assert!(sql.starts_with(
            "WITH p AS (UPDATE posts SET content = $1 WHERE id = $2 AND user_id = $3 RETURNING"
        ));
        assert!(sql.contains("a.username AS author_username"));
        assert!(sql.ends_with("FROM p LEFT JOIN profiles a ON a.id = p.user_id"));
    }

    #[test]
    fn missing_content_never_reaches_sql() {
        assert!(build_update_set(&ContentOnly(None), UPDATABLE_FIELDS).is_err());
    }
}
