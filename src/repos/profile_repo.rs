/*
 * Responsibility
 * - SQLx access to the profiles table
 * - Lookup by id / username, availability check, create, partial update, search
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::update;
use crate::services::partial_update::{AllowedField, UpdateSet};

/// Fields a user may change on their own profile. `id` and `updated_at` are never client-writable.
pub const UPDATABLE_FIELDS: &[AllowedField] = &[
    AllowedField::same("full_name"),
    AllowedField::same("username"),
    AllowedField::same("avatar_url"),
    AllowedField::same("website"),
];

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Compact profile used in follower/following lists.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileSummaryRow {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn get(db: &PgPool, user_id: Uuid) -> RepoResult<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, username, full_name, avatar_url, website, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get_by_username(db: &PgPool, username: &str) -> RepoResult<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, username, full_name, avatar_url, website, updated_at
        FROM profiles
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn exists(db: &PgPool, user_id: Uuid) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM profiles WHERE id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(found)
}

pub async fn username_taken(db: &PgPool, username: &str) -> RepoResult<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM profiles WHERE username = $1)
        "#,
    )
    .bind(username)
    .fetch_one(db)
    .await?;

    Ok(taken)
}

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    username: &str,
    full_name: Option<&str>,
) -> RepoResult<ProfileRow> {
    // Duplicate id or username both surface as RepoError::Conflict.
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles (id, username, full_name, updated_at)
        VALUES ($1, $2, $3, now())
        RETURNING id, username, full_name, avatar_url, website, updated_at
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(full_name)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub(crate) fn update_query(user_id: Uuid, set: &UpdateSet) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE profiles SET ");
    update::push_assignments(&mut builder, set);
    builder.push(", updated_at = now() WHERE id = ");
    builder.push_bind(user_id);
    builder.push(" RETURNING id, username, full_name, avatar_url, website, updated_at");
    builder
}

/// Commit every column of `set` in one statement. `None` when the profile does not exist.
pub async fn apply_update(
    db: &PgPool,
    user_id: Uuid,
    set: &UpdateSet,
) -> RepoResult<Option<ProfileRow>> {
    let mut builder = update_query(user_id, set);
    let row = builder
        .build_query_as::<ProfileRow>()
        .fetch_optional(db)
        .await
        .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Case-insensitive substring search over username and full name.
pub async fn search(db: &PgPool, query: &str, limit: i64) -> RepoResult<Vec<ProfileRow>> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, username, full_name, avatar_url, website, updated_at
        FROM profiles
        WHERE username ILIKE $1 ESCAPE '\' OR full_name ILIKE $1 ESCAPE '\'
        ORDER BY username
        LIMIT $2
        "#,
    )
    .bind(like_pattern(query))
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

// `%term%` with LIKE metacharacters in the term taken literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::services::partial_update::{FieldValue, UpdateRequest, build_update_set};

    struct Raw(HashMap<&'static str, FieldValue>);

    impl UpdateRequest for Raw {
        fn value_of(&self, field: &str) -> Option<FieldValue> {
            self.0.get(field).cloned()
        }
    }

    fn set_of(pairs: &[(&'static str, FieldValue)]) -> UpdateSet {
        build_update_set(&Raw(pairs.iter().cloned().collect()), UPDATABLE_FIELDS).unwrap()
    }

    #[test]
    fn update_touches_only_supplied_columns() {
        let set = set_of(&[("full_name", FieldValue::Text("Ann".into()))]);
        let builder = update_query(Uuid::nil(), &set);

        assert_eq!(
            builder.sql(),
            "UPDATE profiles SET full_name = $1, updated_at = now() WHERE id = $2 \
             RETURNING id, username, full_name, avatar_url, website, updated_at"
        );
    }

    #[test]
    fn explicit_null_clears_a_nullable_column_without_a_bind() {
        let set = set_of(&[
            ("username", FieldValue::Text("ann".into())),
            ("website", FieldValue::Null),
        ]);
        let builder = update_query(Uuid::nil(), &set);

        assert!(
            builder
                .sql()
                .starts_with("UPDATE profiles SET username = $1, website = NULL, updated_at = now() WHERE id = $2")
        );
    }

    #[test]
    fn identifiers_cannot_be_assigned() {
        let set = set_of(&[
            ("id", FieldValue::Text(Uuid::new_v4().to_string())),
            ("updated_at", FieldValue::Text("1970-01-01T00:00:00Z".into())),
            ("avatar_url", FieldValue::Text("https://cdn.example/a.png".into())),
        ]);
        let builder = update_query(Uuid::nil(), &set);

        assert!(builder.sql().starts_with("UPDATE profiles SET avatar_url = $1, updated_at = now()"));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ann"), "%ann%");
        assert_eq!(like_pattern("100%_sure"), "%100\\%\\_sure%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
