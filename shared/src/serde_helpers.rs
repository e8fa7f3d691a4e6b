//! Serde adapters for backend quirks
//!
//! Decimal columns may arrive either as JSON numbers or as numeric strings.
//! Outgoing payloads always carry plain JSON numbers. Optional collections
//! may arrive as an explicit `null`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serializer, de};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberOrString {
    fn into_decimal<E: de::Error>(self) -> Result<Decimal, E> {
        match self {
            NumberOrString::Int(v) => Ok(Decimal::from(v)),
            // Shortest round-trip text keeps 19.99 as 19.99
            NumberOrString::Float(v) => parse_decimal(&v.to_string()),
            NumberOrString::Text(s) => parse_decimal(s.trim()),
        }
    }
}

fn parse_decimal<E: de::Error>(s: &str) -> Result<Decimal, E> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| E::custom(format!("invalid decimal: {s}")))
}

fn write_decimal<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    match value.to_f64() {
        Some(v) => serializer.serialize_f64(v),
        None => serializer.serialize_str(&value.to_string()),
    }
}

/// `#[serde(with = "decimal")]` for required decimal fields
pub mod decimal {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        write_decimal(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        NumberOrString::deserialize(deserializer)?.into_decimal()
    }
}

/// `#[serde(with = "decimal_option")]` for optional decimal fields
pub mod decimal_option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => write_decimal(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(v) => v.into_decimal().map(Some),
            None => Ok(None),
        }
    }
}

/// Treat `""` as absent for optional string fields (the backend clears
/// thumbnails by storing an empty string)
pub mod empty_as_none {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
    }
}

/// `null` reads as the type's default (empty list or map)
pub mod null_as_default {
    use super::*;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// String-keyed map where a `null` map is empty and `null` entries are dropped
pub mod map_skip_nulls {
    use super::*;

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let raw = Option::<BTreeMap<String, Option<V>>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect())
    }
}
