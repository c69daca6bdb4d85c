use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a FAQ entry, wrapping a UUID v7 (time-sortable).
///
/// Assigned by the entry store when the entry is created and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    /// Create a new EntryId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create an EntryId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A stored FAQ record.
///
/// `query` is the top-level trigger phrase and `response` the default reply.
/// An entry without options behaves as a single-shot question and answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    pub id: EntryId,
    pub query: String,
    pub response: String,
    /// Follow-up choices, in display order.
    #[serde(default)]
    pub options: Vec<FaqOption>,
}

/// A sub-choice under a FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqOption {
    /// Identifier unique within the parent entry only.
    pub sub_id: String,
    pub option_text: String,
    pub response: String,
}

impl FaqOption {
    pub fn new(
        sub_id: impl Into<String>,
        option_text: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            sub_id: sub_id.into(),
            option_text: option_text.into(),
            response: response.into(),
        }
    }
}

/// Payload for creating or replacing a FAQ entry. The id is never part of
/// the request; the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntryRequest {
    pub query: String,
    pub response: String,
    #[serde(default)]
    pub options: Vec<FaqOption>,
}

impl FaqEntryRequest {
    pub fn new(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            options: Vec::new(),
        }
    }

    /// Append an option, keeping insertion order.
    pub fn with_option(mut self, option: FaqOption) -> Self {
        self.options.push(option);
        self
    }

    /// Materialize the request as an entry with the given id.
    pub fn into_entry(self, id: EntryId) -> FaqEntry {
        FaqEntry {
            id,
            query: self.query,
            response: self.response,
            options: self.options,
        }
    }
}

/// Bulk-create payload: `{"items": [...]}`.
///
/// `items` may be absent on the wire; the service rejects that the same way
/// as an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkFaqRequest {
    #[serde(default)]
    pub items: Vec<FaqEntryRequest>,
}
