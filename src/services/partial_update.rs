/*
 * Responsibility
 * - Turn a sparse update request into the column -> value set a repo commits
 * - Only allow-listed fields are ever copied (identifiers/timestamps never reach SQL)
 * - Absent fields are skipped, not nulled; an empty result is an error, never a no-op
 */
use thiserror::Error;

/// A value to write into one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Null,
}

impl FieldValue {
    /// Non-nullable text: `None` (missing or JSON null) means "not supplied".
    pub fn text(value: &Option<String>) -> Option<Self> {
        value.as_ref().map(|v| Self::Text(v.clone()))
    }

    /// Nullable text, tri-state:
    /// - None: field missing (do not update)
    /// - Some(None): null (set NULL)
    /// - Some(Some(v)): set value
    pub fn nullable_text(value: &Option<Option<String>>) -> Option<Self> {
        value.as_ref().map(|inner| match inner {
            Some(v) => Self::Text(v.clone()),
            None => Self::Null,
        })
    }

    pub fn bool(value: Option<bool>) -> Option<Self> {
        value.map(Self::Bool)
    }
}

/// One updatable field: the name clients send and the column it is persisted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedField {
    pub field: &'static str,
    pub column: &'static str,
}

impl AllowedField {
    pub const fn new(field: &'static str, column: &'static str) -> Self {
        Self { field, column }
    }

    pub const fn same(name: &'static str) -> Self {
        Self::new(name, name)
    }
}

/// A sparse request. Implementations answer `None` for anything the client did not send.
pub trait UpdateRequest {
    fn value_of(&self, field: &str) -> Option<FieldValue>;
}

/// Column -> value pairs, in allow-list order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSet {
    entries: Vec<(&'static str, FieldValue)>,
}

impl UpdateSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(column, value)| (*column, value))
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no fields to update")]
pub struct EmptyUpdateError;

pub fn build_update_set<R>(request: &R, allowed: &[AllowedField]) -> Result<UpdateSet, EmptyUpdateError>
where
    R: UpdateRequest + ?Sized,
{
    let entries: Vec<_> = allowed
        .iter()
        .filter_map(|f| request.value_of(f.field).map(|v| (f.column, v)))
        .collect();

    if entries.is_empty() {
        return Err(EmptyUpdateError);
    }

    Ok(UpdateSet { entries })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const PROFILE_FIELDS: &[AllowedField] =
        &[AllowedField::same("full_name"), AllowedField::same("username")];

    // Raw payload stand-in: whatever keys the client sent, allow-listed or not.
    struct RawRequest(HashMap<&'static str, FieldValue>);

    impl UpdateRequest for RawRequest {
        fn value_of(&self, field: &str) -> Option<FieldValue> {
            self.0.get(field).cloned()
        }
    }

    fn raw(pairs: &[(&'static str, FieldValue)]) -> RawRequest {
        RawRequest(pairs.iter().cloned().collect())
    }

    fn text(v: &str) -> FieldValue {
        FieldValue::Text(v.to_string())
    }

    #[test]
    fn copies_only_supplied_fields() {
        let set = build_update_set(&raw(&[("full_name", text("Ann"))]), PROFILE_FIELDS).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("full_name"), Some(&text("Ann")));
        assert!(!set.contains_column("username"));
    }

    #[test]
    fn empty_request_is_rejected() {
        assert_eq!(
            build_update_set(&raw(&[]), PROFILE_FIELDS),
            Err(EmptyUpdateError)
        );
    }

    #[test]
    fn fields_outside_the_allow_list_never_appear() {
        let request = raw(&[
            ("id", text("00000000-0000-0000-0000-000000000000")),
            ("updated_at", text("2020-01-01T00:00:00Z")),
            ("username", text("ann")),
        ]);

        let set = build_update_set(&request, PROFILE_FIELDS).unwrap();

        assert_eq!(set.len(), 1);
        assert!(set.contains_column("username"));
        assert!(!set.contains_column("id"));
        assert!(!set.contains_column("updated_at"));
    }

    #[test]
    fn only_disallowed_fields_counts_as_empty() {
        let request = raw(&[("id", text("x")), ("created_at", text("y"))]);
        assert_eq!(
            build_update_set(&request, PROFILE_FIELDS),
            Err(EmptyUpdateError)
        );
    }

    #[test]
    fn provided_empty_string_is_still_a_value() {
        let set = build_update_set(&raw(&[("full_name", text(""))]), PROFILE_FIELDS).unwrap();
        assert_eq!(set.get("full_name"), Some(&text("")));
    }

    #[test]
    fn keys_are_renamed_to_columns_in_allow_list_order() {
        let allowed = &[
            AllowedField::new("displayName", "full_name"),
            AllowedField::new("handle", "username"),
        ];
        let request = raw(&[("handle", text("ann")), ("displayName", text("Ann"))]);

        let set = build_update_set(&request, allowed).unwrap();
        let columns: Vec<_> = set.iter().map(|(c, _)| c).collect();

        assert_eq!(columns, vec!["full_name", "username"]);
    }

    #[test]
    fn tri_state_helpers() {
        assert_eq!(FieldValue::nullable_text(&None), None);
        assert_eq!(FieldValue::nullable_text(&Some(None)), Some(FieldValue::Null));
        assert_eq!(
            FieldValue::nullable_text(&Some(Some("https://x".into()))),
            Some(text("https://x"))
        );
        assert_eq!(FieldValue::text(&None), None);
        assert_eq!(FieldValue::bool(Some(false)), Some(FieldValue::Bool(false)));
    }
}
