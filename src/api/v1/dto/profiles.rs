/*
 * Responsibility
 * - Profiles の request/response DTO
 * - UpdateProfileRequest is the sparse body of PUT /profile
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::tri_state;
use crate::repos::profile_repo::ProfileRow;
use crate::services::partial_update::{FieldValue, UpdateRequest};

pub const USERNAME_MAX_CHARS: usize = 50;
pub const URL_MAX_CHARS: usize = 256;

fn check_username(username: &str) -> Result<(), &'static str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err("username cannot be empty");
    }
    if trimmed.chars().count() > USERNAME_MAX_CHARS {
        return Err("username must be <= 50 chars");
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err("username cannot contain whitespace");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub username: String,
    pub full_name: Option<String>,
}

impl CreateProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_username(&self.username)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (set NULL)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "tri_state")]
    pub full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub website: Option<Option<String>>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(username) = &self.username {
            check_username(username)?;
        }
        if let Some(Some(url)) = &self.avatar_url
            && url.chars().count() > URL_MAX_CHARS
        {
            return Err("avatar_url must be <= 256 chars");
        }
        if let Some(Some(url)) = &self.website
            && url.chars().count() > URL_MAX_CHARS
        {
            return Err("website must be <= 256 chars");
        }
        Ok(())
    }
}

impl UpdateRequest for UpdateProfileRequest {
    fn value_of(&self, field: &str) -> Option<FieldValue> {
        match field {
            "username" => FieldValue::text(&self.username.as_ref().map(|u| u.trim().to_string())),
            "full_name" => FieldValue::nullable_text(&self.full_name),
            "avatar_url" => FieldValue::nullable_text(&self.avatar_url),
            "website" => FieldValue::nullable_text(&self.website),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsernameAvailability {
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            website: row.website,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::profile_repo::UPDATABLE_FIELDS;
    use crate::services::partial_update::{EmptyUpdateError, build_update_set};

    fn parse(json: &str) -> UpdateProfileRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn only_sent_fields_reach_the_update_set() {
        let set = build_update_set(&parse(r#"{"full_name": "Ann"}"#), UPDATABLE_FIELDS).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("full_name"), Some(&FieldValue::Text("Ann".into())));
    }

    #[test]
    fn empty_body_is_an_empty_update() {
        assert_eq!(
            build_update_set(&parse("{}"), UPDATABLE_FIELDS),
            Err(EmptyUpdateError)
        );
    }

    #[test]
    fn unknown_and_identifier_keys_are_ignored() {
        let req = parse(r#"{"id": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "updated_at": "2020-01-01T00:00:00Z"}"#);
        assert_eq!(build_update_set(&req, UPDATABLE_FIELDS), Err(EmptyUpdateError));
    }

    #[test]
    fn null_clears_nullable_fields_but_not_username() {
        let req = parse(r#"{"username": null, "website": null}"#);
        let set = build_update_set(&req, UPDATABLE_FIELDS).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("website"), Some(&FieldValue::Null));
    }

    #[test]
    fn username_is_trimmed_and_validated() {
        let req = parse(r#"{"username": "  ann  "}"#);
        assert!(req.validate().is_ok());
        assert_eq!(req.value_of("username"), Some(FieldValue::Text("ann".into())));

        assert!(parse(r#"{"username": "   "}"#).validate().is_err());
        assert!(parse(r#"{"username": "a b"}"#).validate().is_err());
    }

    #[test]
    fn long_urls_are_rejected() {
        let long = "x".repeat(URL_MAX_CHARS + 1);
        let req = parse(&format!(r#"{{"website": "{long}"}}"#));
        assert_eq!(req.validate(), Err("website must be <= 256 chars"));
    }

    #[test]
    fn create_requires_a_username() {
        let req: CreateProfileRequest = serde_json::from_str(r#"{"username": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
