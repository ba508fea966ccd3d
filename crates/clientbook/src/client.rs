//! Core client record types.
//!
//! This module defines the stored client record, the unvalidated candidate
//! submitted by the create/edit form, and the identifier scheme used by the
//! repository.

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Date format used for `start_date`.
pub const START_DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque, unique identifier of a stored client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Wrap an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ClientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A candidate record submitted for create or update.
///
/// Nothing about a draft is guaranteed; it must pass
/// [`validate`](crate::validate::validate) before the repository accepts it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientDraft {
    /// Client's full name.
    pub full_name: String,
    /// Age in years.
    pub age: Option<u32>,
    /// Free-form gender.
    pub gender: Option<String>,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// What the client is training for.
    pub fitness_goal: String,
    /// Date the client started, as an ISO `YYYY-MM-DD` string.
    pub start_date: String,
}

impl ClientDraft {
    /// Create a draft with the required fields set and everything else empty.
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            start_date: start_date.into(),
            ..Self::default()
        }
    }
}

/// A stored client record.
///
/// The `id` is assigned by the repository and cannot change; every other
/// field is replaced wholesale on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    id: ClientId,
    /// Client's full name.
    pub full_name: String,
    /// Age in years.
    #[serde(default)]
    pub age: Option<u32>,
    /// Free-form gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// What the client is training for.
    #[serde(default)]
    pub fitness_goal: String,
    /// Date the client started, as an ISO `YYYY-MM-DD` string.
    pub start_date: String,
}

impl Client {
    /// Build a record from a draft and an assigned identifier.
    #[must_use]
    pub fn from_draft(id: ClientId, draft: ClientDraft) -> Self {
        Self {
            id,
            full_name: draft.full_name,
            age: draft.age,
            gender: draft.gender,
            email: draft.email,
            phone: draft.phone,
            fitness_goal: draft.fitness_goal,
            start_date: draft.start_date,
        }
    }

    /// The repository-assigned identifier.
    #[must_use]
    pub fn id(&self) -> &ClientId {
        &self.id
    }

    /// Copy the editable fields back into a draft, e.g. to prefill a form.
    #[must_use]
    pub fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            full_name: self.full_name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            fitness_goal: self.fitness_goal.clone(),
            start_date: self.start_date.clone(),
        }
    }

    /// The start date as a calendar date, if it is a well-formed ISO date.
    #[must_use]
    pub fn start_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.start_date.trim(), START_DATE_FORMAT).ok()
    }
}

/// Generates client identifiers from the wall clock.
///
/// Identifiers are milliseconds since the Unix epoch. When the clock has not
/// advanced past the last issued value, the next value is `last + 1`, so
/// back-to-back calls never collide. Once `i64::MAX` has been issued or
/// observed there is nothing left to hand out.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Create a generator with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier that is already in use so it is never reissued.
    pub fn observe(&mut self, id: &ClientId) {
        if let Ok(value) = id.as_str().parse::<i64>() {
            self.last = self.last.max(value);
        }
    }

    /// Issue the next identifier, or `None` if the id space is used up.
    pub fn next_id(&mut self) -> Option<ClientId> {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_millis: i64) -> Option<ClientId> {
        let value = if now_millis > self.last {
            now_millis
        } else {
            self.last.checked_add(1)?
        };
        self.last = value;
        Some(ClientId(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ClientDraft {
        ClientDraft::new("Jane Doe", "jane@example.com", "2024-01-01")
    }

    #[test]
    fn test_client_id_display() {
        let id = ClientId::new("1700000000000");
        assert_eq!(id.to_string(), "1700000000000");
        assert_eq!(id.as_str(), "1700000000000");
    }

    #[test]
    fn test_draft_new_leaves_optionals_empty() {
        let draft = jane();
        assert_eq!(draft.full_name, "Jane Doe");
        assert!(draft.age.is_none());
        assert!(draft.gender.is_none());
        assert!(draft.phone.is_none());
        assert!(draft.fitness_goal.is_empty());
    }

    #[test]
    fn test_from_draft_and_back() {
        let mut draft = jane();
        draft.age = Some(34);
        draft.fitness_goal = "Run a marathon".to_string();

        let client = Client::from_draft(ClientId::from("42"), draft.clone());
        assert_eq!(client.id().as_str(), "42");
        assert_eq!(client.to_draft(), draft);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let client = Client::from_draft(ClientId::from("1"), jane());
        let json = serde_json::to_string(&client).unwrap();

        assert!(json.contains("\"fullName\""));
        assert!(json.contains("\"fitnessGoal\""));
        assert!(json.contains("\"startDate\""));
        assert!(json.contains("\"id\":\"1\""));
    }

    #[test]
    fn test_serialization_keeps_absent_optionals() {
        let mut draft = jane();
        draft.phone = Some("555-0100".to_string());
        let client = Client::from_draft(ClientId::from("7"), draft);

        let json = serde_json::to_string(&client).unwrap();
        let back: Client = serde_json::from_str(&json).unwrap();

        assert_eq!(back, client);
        assert!(back.age.is_none());
        assert!(back.gender.is_none());
    }

    #[test]
    fn test_deserialize_without_optional_keys() {
        let json = r#"{"id":"9","fullName":"Ana","email":"ana@example.com","startDate":"2024-02-02"}"#;
        let client: Client = serde_json::from_str(json).unwrap();

        assert_eq!(client.full_name, "Ana");
        assert!(client.fitness_goal.is_empty());
        assert!(client.phone.is_none());
    }

    #[test]
    fn test_start_date_parsed() {
        let client = Client::from_draft(ClientId::from("1"), jane());
        assert_eq!(
            client.start_date_parsed(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );

        let mut draft = jane();
        draft.start_date = "next week".to_string();
        let client = Client::from_draft(ClientId::from("2"), draft);
        assert!(client.start_date_parsed().is_none());
    }

    #[test]
    fn test_id_generator_uses_clock() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_at(1_000).unwrap().as_str(), "1000");
        assert_eq!(ids.next_at(2_000).unwrap().as_str(), "2000");
    }

    #[test]
    fn test_id_generator_same_millisecond() {
        let mut ids = IdGenerator::new();
        let a = ids.next_at(5_000).unwrap();
        let b = ids.next_at(5_000).unwrap();
        let c = ids.next_at(4_999).unwrap();

        assert_eq!(a.as_str(), "5000");
        assert_eq!(b.as_str(), "5001");
        assert_eq!(c.as_str(), "5002");
    }

    #[test]
    fn test_id_generator_rapid_calls_never_collide() {
        let mut ids = IdGenerator::new();
        let first = ids.next_id().unwrap();
        let second = ids.next_id().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_id_generator_observe_skips_used_ids() {
        let mut ids = IdGenerator::new();
        ids.observe(&ClientId::from("9000"));
        ids.observe(&ClientId::from("not-a-number"));

        assert_eq!(ids.next_at(8_000).unwrap().as_str(), "9001");
    }

    #[test]
    fn test_id_generator_stops_at_max() {
        let mut ids = IdGenerator::new();
        ids.observe(&ClientId::from((i64::MAX - 1).to_string()));

        assert_eq!(ids.next_at(1_000), Some(ClientId::from(i64::MAX.to_string())));
        assert_eq!(ids.next_at(1_000), None);
        assert_eq!(ids.next_at(2_000), None);
    }

    #[test]
    fn test_id_generator_observed_max_is_exhausted() {
        let mut ids = IdGenerator::new();
        ids.observe(&ClientId::from(i64::MAX.to_string()));
        assert!(ids.next_id().is_none());
    }
}
