/*
 * Responsibility
 * - Notifications の request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::notification_repo::NotificationRow;
use crate::services::partial_update::{FieldValue, UpdateRequest};

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNotificationRequest {
    pub is_read: Option<bool>,
}

impl UpdateNotificationRequest {
    pub fn mark_read() -> Self {
        Self { is_read: Some(true) }
    }
}

impl UpdateRequest for UpdateNotificationRequest {
    fn value_of(&self, field: &str) -> Option<FieldValue> {
        match field {
            "is_read" => FieldValue::bool(self.is_read),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub recipient_user_id: Uuid,
    pub sender_user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender_username: String,
    pub sender_full_name: String,
    pub sender_avatar_url: String,
}

impl From<NotificationRow> for NotificationResponse {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            recipient_user_id: row.recipient_user_id,
            sender_user_id: row.sender_user_id,
            kind: row.kind,
            post_id: row.post_id,
            is_read: row.is_read,
            created_at: row.created_at,
            sender_username: row.sender_username,
            sender_full_name: row.sender_full_name,
            sender_avatar_url: row.sender_avatar_url,
        }
    }
}
