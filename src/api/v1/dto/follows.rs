/*
 * Responsibility
 * - Follow の request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::follow_repo::FollowRow;

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub following_id: String, // UUID (profiles.id)
}

impl FollowRequest {
    pub fn target(&self) -> Result<Uuid, &'static str> {
        Uuid::parse_str(self.following_id.trim()).map_err(|_| "invalid following_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

impl UserIdQuery {
    pub fn user_id(&self) -> Result<Uuid, &'static str> {
        let raw = self.user_id.as_deref().ok_or("user_id is required")?;
        Uuid::parse_str(raw.trim()).map_err(|_| "invalid user_id")
    }
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<FollowRow> for FollowResponse {
    fn from(row: FollowRow) -> Self {
        Self {
            id: row.id,
            follower_id: row.follower_id,
            following_id: row.following_id,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn following_id_must_be_a_uuid() {
        let ok = FollowRequest {
            following_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".into(),
        };
        let bad = FollowRequest {
            following_id: "alice".into(),
        };

        assert!(ok.target().is_ok());
        assert_eq!(bad.target(), Err("invalid following_id"));
    }

    #[test]
    fn user_id_query_is_required() {
        assert_eq!(UserIdQuery { user_id: None }.user_id(), Err("user_id is required"));
        assert_eq!(
            UserIdQuery {
                user_id: Some("nope".into())
            }
            .user_id(),
            Err("invalid user_id")
        );
    }
}
