/*
 * Responsibility
 * - Posts の request/response DTO
 * - a post is always rendered with its author embedded under `user`
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Pagination;
use crate::repos::post_repo::PostRow;
use crate::services::partial_update::{FieldValue, UpdateRequest};

pub const CONTENT_MAX_CHARS: usize = 280;

fn check_content(content: &str) -> Result<(), &'static str> {
    if content.trim().is_empty() {
        return Err("content cannot be empty");
    }
    if content.chars().count() > CONTENT_MAX_CHARS {
        return Err("content must be <= 280 chars");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_content(&self.content)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(content) = &self.content {
            check_content(content)?;
        }
        Ok(())
    }
}

impl UpdateRequest for UpdatePostRequest {
    fn value_of(&self, field: &str) -> Option<FieldValue> {
        match field {
            "content" => FieldValue::text(&self.content),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    pub user_id: Option<String>, // optional author filter
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PostListQuery {
    pub fn author(&self) -> Result<Option<Uuid>, &'static str> {
        match self.user_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Uuid::parse_str(raw).map(Some).map_err(|_| "invalid user_id"),
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostAuthor {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: PostAuthor,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            created_at: row.created_at,
            user: PostAuthor {
                id: row.user_id,
                username: row.author_username.unwrap_or_default(),
                full_name: row.author_full_name.unwrap_or_default(),
                avatar_url: row.author_avatar_url.unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_must_be_present_and_short() {
        let ok = CreatePostRequest {
            content: "hello".into(),
        };
        let blank = CreatePostRequest {
            content: " \n ".into(),
        };
        let long = CreatePostRequest {
            content: "a".repeat(CONTENT_MAX_CHARS + 1),
        };

        assert!(ok.validate().is_ok());
        assert_eq!(blank.validate(), Err("content cannot be empty"));
        assert_eq!(long.validate(), Err("content must be <= 280 chars"));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let req = CreatePostRequest {
            content: "é".repeat(CONTENT_MAX_CHARS),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn author_filter_is_optional_but_must_be_a_uuid() {
        assert_eq!(PostListQuery::default().author(), Ok(None));

        let blank = PostListQuery {
            user_id: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(blank.author(), Ok(None));

        let bad = PostListQuery {
            user_id: Some("bob".into()),
            ..Default::default()
        };
        assert_eq!(bad.author(), Err("invalid user_id"));
    }

    #[test]
    fn absent_content_is_not_validated() {
        assert!(UpdatePostRequest::default().validate().is_ok());
        assert_eq!(UpdatePostRequest::default().value_of("content"), None);
    }

    #[test]
    fn missing_author_profile_renders_empty_strings() {
        let row = PostRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            content: "hi".into(),
            created_at: Utc::now(),
            author_username: None,
            author_full_name: None,
            author_avatar_url: None,
        };
        let user_id = row.user_id;

        let res = PostResponse::from(row);
        assert_eq!(res.user.id, user_id);
        assert_eq!(res.user.username, "");
    }
}
