/*
 * Responsibility
 * - notifications for one recipient, with the sender's profile folded in
 * - mark one / mark all as read; every statement is scoped by recipient
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::update;
use crate::services::partial_update::{AllowedField, UpdateSet};

pub const UPDATABLE_FIELDS: &[AllowedField] = &[AllowedField::same("is_read")];

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub recipient_user_id: Uuid,
    pub sender_user_id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub post_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,

    pub sender_username: String,
    pub sender_full_name: String,
    pub sender_avatar_url: String,
}

// A sender whose profile is gone renders as "Unknown" / "Unknown User" / "".
const WITH_SENDER: &str = r#"
    SELECT
        n.id, n.recipient_user_id, n.sender_user_id, n.type, n.post_id, n.is_read, n.created_at,
        CASE WHEN s.id IS NULL THEN 'Unknown' ELSE s.username END AS sender_username,
        CASE WHEN s.id IS NULL THEN 'Unknown User' ELSE COALESCE(s.full_name, '') END AS sender_full_name,
        COALESCE(s.avatar_url, '') AS sender_avatar_url
"#;

pub async fn list_for_recipient(pool: &PgPool, recipient_id: Uuid) -> RepoResult<Vec<NotificationRow>> {
    let sql = format!(
        r#"
        {WITH_SENDER}
        FROM notifications n
        LEFT JOIN profiles s ON s.id = n.sender_user_id
        WHERE n.recipient_user_id = $1
        ORDER BY n.created_at DESC
        "#
    );

    let rows = sqlx::query_as::<_, NotificationRow>(&sql)
        .bind(recipient_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns how many notifications flipped from unread to read.
pub async fn mark_all_read(pool: &PgPool, recipient_id: Uuid) -> RepoResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = true
        WHERE recipient_user_id = $1 AND is_read = false
        "#,
    )
    .bind(recipient_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub(crate) fn update_query(
    notification_id: Uuid,
    recipient_id: Uuid,
    set: &UpdateSet,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("WITH n AS (UPDATE notifications SET ");
    update::push_assignments(&mut builder, set);
    builder.push(" WHERE id = ");
    builder.push_bind(notification_id);
    builder.push(" AND recipient_user_id = ");
    builder.push_bind(recipient_id);
    builder.push(" RETURNING *)");
    builder.push(WITH_SENDER);
    builder.push("FROM n LEFT JOIN profiles s ON s.id = n.sender_user_id");
    builder
}

/// `None` when the notification does not exist or is addressed to someone else.
pub async fn apply_update(
    pool: &PgPool,
    notification_id: Uuid,
    recipient_id: Uuid,
    set: &UpdateSet,
) -> RepoResult<Option<NotificationRow>> {
    let mut builder = update_query(notification_id, recipient_id, set);
    let row = builder
        .build_query_as::<NotificationRow>()
        .fetch_optional(pool)
        .await
        .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::partial_update::{FieldValue, UpdateRequest, build_update_set};

    struct Read(Option<bool>);

    impl UpdateRequest for Read {
        fn value_of(&self, field: &str) -> Option<FieldValue> {
            (field == "is_read").then(|| FieldValue::bool(self.0)).flatten()
        }
    }

    #[test]
    fn update_binds_the_flag_and_scopes_to_recipient() {
        let set = build_update_set(&Read(Some(true)), UPDATABLE_FIELDS).unwrap();
        let builder = update_query(Uuid::new_v4(), Uuid::new_v4(), &set);

        assert!(builder.sql().starts_with(
            "WITH n AS (UPDATE notifications SET is_read = $1 WHERE id = $2 AND recipient_user_id = $3"
        ));
    }

    #[test]
    fn sender_fallbacks_are_rendered_in_sql() {
        assert!(WITH_SENDER.contains("'Unknown'"));
        assert!(WITH_SENDER.contains("'Unknown User'"));
    }
}
