//! Document ids for `#[serde(flatten, with = "...")]` fields.
//!
//! The backend sends `_id`, `id` or both for the same document. `_id` wins
//! when both are present; records are written back with `_id`.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
struct Keys {
    #[serde(rename = "_id")]
    document: Option<String>,
    id: Option<String>,
}

pub fn serialize<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("_id", id)?;
    map.end()
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let keys = Keys::deserialize(deserializer)?;
    keys.document
        .or(keys.id)
        .ok_or_else(|| D::Error::missing_field("_id"))
}
