/*
 * Responsibility
 * - Shapes shared by several endpoints: pagination, message bodies, embedded profiles
 * - serde helper for tri-state (missing / null / value) fields
 */
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::repos::profile_repo::ProfileSummaryRow;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// (limit, offset) clamped to a sane window.
    pub fn resolve(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<ProfileSummaryRow> for ProfileSummary {
    fn from(row: ProfileSummaryRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
        }
    }
}

/// Use with `#[serde(default, deserialize_with = "tri_state")]`.
///
/// `default` leaves a missing field as `None`; a present field (null included)
/// lands here and becomes `Some(..)`.
pub fn tri_state<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "tri_state")]
        website: Option<Option<String>>,
    }

    #[test]
    fn tri_state_distinguishes_missing_null_and_value() {
        let missing: Probe = serde_json::from_str("{}").unwrap();
        let null: Probe = serde_json::from_str(r#"{"website": null}"#).unwrap();
        let value: Probe = serde_json::from_str(r#"{"website": "https://x"}"#).unwrap();

        assert_eq!(missing.website, None);
        assert_eq!(null.website, Some(None));
        assert_eq!(value.website, Some(Some("https://x".into())));
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().resolve(), (50, 0));
        assert_eq!(
            Pagination {
                limit: Some(1000),
                offset: Some(-5)
            }
            .resolve(),
            (100, 0)
        );
        assert_eq!(
            Pagination {
                limit: Some(0),
                offset: Some(20)
            }
            .resolve(),
            (1, 20)
        );
    }
}
