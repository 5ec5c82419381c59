use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use std::fmt;

/// Field names a service may use for the note identifier, in priority order
pub const ID_FIELDS: [&str; 5] = ["id", "_id", "note_id", "uuid", "pk"];

/// Field wrapping the note list in object-shaped listings
pub const LISTING_FIELD: &str = "notes";

const PREVIEW_CHARS: usize = 220;

/// Opaque note identifier as handed out by the service.
///
/// Two ids are equal when their textual forms are equal, so `7` and `"7"`
/// address the same note.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NoteId {
    Number(serde_json::Number),
    Text(String),
}

impl NoteId {
    /// Reads an id out of a JSON value. Empty strings and non-scalar values
    /// are not ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn local() -> Self {
        Self::Text(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for NoteId {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for NoteId {}

impl From<i64> for NoteId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// A note as mirrored from the service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Note {
    /// Canonical identifier, taken from the first id field present
    pub id: Option<NoteId>,
    /// Note title, possibly empty
    pub title: String,
    /// Note content, possibly empty
    pub content: String,
}

impl Note {
    pub fn from_object(map: &Map<String, Value>) -> Self {
        let id = ID_FIELDS
            .iter()
            .filter_map(|field| map.get(*field))
            .find(|value| !value.is_null())
            .and_then(NoteId::from_value);

        Self {
            id,
            title: string_field(map, "title"),
            content: string_field(map, "content"),
        }
    }

    /// Returns `None` when the value is not a JSON object
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_object)
    }

    /// Copy of this note with the payload's title and content applied
    #[must_use]
    pub fn merged_with(&self, payload: &NotePayload) -> Self {
        Self {
            id: self.id.clone(),
            title: payload.title.clone(),
            content: payload.content.clone(),
        }
    }

    pub fn has_id(&self, id: &NoteId) -> bool {
        self.id.as_ref() == Some(id)
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// Content shortened for the card view, `None` when there is no content
    pub fn preview(&self) -> Option<String> {
        if self.content.is_empty() {
            return None;
        }
        if self.content.chars().count() > PREVIEW_CHARS {
            let head: String = self.content.chars().take(PREVIEW_CHARS).collect();
            Some(format!("{head}…"))
        } else {
            Some(self.content.clone())
        }
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        Ok(Self::from_object(&map))
    }
}

fn string_field(map: &Map<String, Value>, field: &str) -> String {
    map.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePayload {
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
}

/// Turns a list response into notes.
///
/// Accepts a bare array or an object carrying the array under `notes`.
/// Anything else yields an empty list.
pub fn normalize_listing(payload: Option<&Value>) -> Vec<Note> {
    let items = match payload {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => match map.get(LISTING_FIELD) {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items.iter().filter_map(Note::from_value).collect()
}
