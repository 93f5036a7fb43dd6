//! Object identifiers as they appear on the JSON wire: 24-char hex strings.

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serializer};

use crate::domain::error::DomainError;

pub fn parse_object_id(value: &str) -> Result<ObjectId, DomainError> {
    ObjectId::parse_str(value).map_err(|_| DomainError::InvalidId(value.to_owned()))
}

/// `#[serde(with = "hex")]` for `ObjectId` fields of JSON-facing types.
pub mod hex {
    use super::*;

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectId::parse_str(&raw).map_err(serde::de::Error::custom)
    }
}
