//! Attribute Map - loosely typed per-request input to feature extraction

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single raw attribute value as it arrives from the request boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Str(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Str(v)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

/// Attribute key → value, keyed by the transport spelling (see `FEATURE_ALIASES`)
pub type AttributeMap = HashMap<String, AttributeValue>;

// ============================================================================
// ALIASES
// ============================================================================

/// Schema labels that are not plain identifiers, paired with the key they
/// travel under: `(transport key, schema label)`.
pub const FEATURE_ALIASES: &[(&str, &str)] = &[
    ("Childrens", "Children's"),
    ("FilmNoir", "Film-Noir"),
    ("SciFi", "Sci-Fi"),
];

/// Attribute key to read for a schema slot
pub fn attribute_key(slot: &str) -> &str {
    FEATURE_ALIASES
        .iter()
        .find(|(_, label)| *label == slot)
        .map(|(key, _)| *key)
        .unwrap_or(slot)
}

// ============================================================================
// RESOLUTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("feature `{feature}`: cannot convert {value:?} to a number")]
    NotNumeric { feature: String, value: String },

    #[error("feature `{feature}`: value {value} is not finite")]
    NotFinite { feature: String, value: f64 },
}

/// Outcome of resolving one schema slot.
///
/// Missing or null input is not an error: it resolves to the slot default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved {
    Value(f32),
    Defaulted(f32),
}

impl Resolved {
    pub fn value(self) -> f32 {
        match self {
            Resolved::Value(v) | Resolved::Defaulted(v) => v,
        }
    }

    pub fn is_default(self) -> bool {
        matches!(self, Resolved::Defaulted(_))
    }
}

/// Gender encoding: M=1, F=0.
///
/// Anything else, including a missing value, encodes as 1.0. This mirrors the
/// encoding the model was trained with and is kept for compatibility until a
/// product decision says otherwise.
const GENDER_MAP: &[(&str, f32)] = &[("M", 1.0), ("F", 0.0)];
const GENDER_FALLBACK: f32 = 1.0;

/// Resolve one schema slot against the attribute map
pub fn resolve_slot(slot: &str, attributes: &AttributeMap) -> Result<Resolved, FeatureError> {
    let raw = attributes.get(attribute_key(slot));

    if slot == "gender" {
        return Ok(resolve_gender(raw));
    }

    match raw {
        None | Some(AttributeValue::Null) => Ok(Resolved::Defaulted(MISSING_VALUE)),
        Some(value) => coerce(slot, value).map(Resolved::Value),
    }
}

fn resolve_gender(raw: Option<&AttributeValue>) -> Resolved {
    let code = match raw {
        Some(AttributeValue::Str(s)) => s.as_str(),
        _ => return Resolved::Defaulted(GENDER_FALLBACK),
    };

    GENDER_MAP
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, v)| Resolved::Value(*v))
        .unwrap_or(Resolved::Defaulted(GENDER_FALLBACK))
}

/// Rates and release year default to 0.0, counts to 0; both are 0.0 once cast.
const MISSING_VALUE: f32 = 0.0;

fn coerce(slot: &str, value: &AttributeValue) -> Result<f32, FeatureError> {
    let number = match value {
        AttributeValue::Int(i) => *i as f64,
        AttributeValue::Float(f) => *f,
        AttributeValue::Str(s) => s.trim().parse::<f64>().map_err(|_| FeatureError::NotNumeric {
            feature: slot.to_string(),
            value: s.clone(),
        })?,
        AttributeValue::Null => return Ok(MISSING_VALUE),
    };

    // finite f64 beyond f32::MAX still overflows to inf on the cast
    let narrowed = number as f32;
    if !narrowed.is_finite() {
        return Err(FeatureError::NotFinite {
            feature: slot.to_string(),
            value: number,
        });
    }

    Ok(narrowed)
}
