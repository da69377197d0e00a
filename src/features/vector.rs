//! Feature Vector - model input row
//!
//! Versioned vector with layout metadata, plus the builder that maps an
//! `AttributeMap` onto `FEATURE_LAYOUT`.

use ndarray::{Array2, ArrayView1};
use serde_json::json;

use super::attributes::{resolve_slot, AttributeMap, FeatureError};
use super::layout::{layout_hash, slot_index, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};

/// One model input row, stamped with the layout it was built against
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub layout_version: u8,
    pub layout_hash: u32,
    /// In `FEATURE_LAYOUT` order
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    fn new(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            layout_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn value_of(&self, label: &str) -> Option<f32> {
        slot_index(label).map(|i| self.values[i])
    }

    /// Slot label → value, for debug logging
    pub fn log_fields(&self) -> serde_json::Value {
        let values: serde_json::Map<String, serde_json::Value> = FEATURE_LAYOUT
            .iter()
            .zip(self.values)
            .map(|(label, value)| (label.to_string(), json!(value)))
            .collect();

        json!({
            "layout_version": self.layout_version,
            "layout_hash": self.layout_hash,
            "values": values,
        })
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Stateless mapping from attribute maps to feature vectors.
///
/// Every slot has a default, so no key is required; a present value that
/// cannot be read as a number fails the whole row.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureVectorBuilder;

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, attributes: &AttributeMap) -> Result<FeatureVector, FeatureError> {
        let mut values = [0.0f32; FEATURE_COUNT];
        let mut defaulted = 0usize;

        for (slot, name) in values.iter_mut().zip(FEATURE_LAYOUT) {
            let resolved = resolve_slot(name, attributes)?;
            if resolved.is_default() {
                defaulted += 1;
            }
            *slot = resolved.value();
        }

        tracing::trace!(defaulted, "Feature vector built");
        Ok(FeatureVector::new(values))
    }

    /// Build one vector per input, preserving input order
    pub fn build_batch(&self, batch: &[AttributeMap]) -> Result<Vec<FeatureVector>, FeatureError> {
        batch.iter().map(|attributes| self.build(attributes)).collect()
    }
}

/// Stack vectors into an `[n, FEATURE_COUNT]` matrix
pub fn to_matrix(vectors: &[FeatureVector]) -> Array2<f32> {
    let mut matrix = Array2::<f32>::zeros((vectors.len(), FEATURE_COUNT));
    for (mut row, vector) in matrix.rows_mut().into_iter().zip(vectors) {
        row.assign(&ArrayView1::from(vector.as_slice()));
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::attributes::AttributeValue;

    fn map(entries: &[(&str, AttributeValue)]) -> AttributeMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sample() -> AttributeMap {
        map(&[
            ("age", AttributeValue::Int(21)),
            ("gender", "M".into()),
            ("occupation_new", "4".into()),
            ("release_year", AttributeValue::Float(1997.0)),
            ("Adventure", AttributeValue::Int(1)),
            ("War", AttributeValue::Int(1)),
            ("user_total_ratings", AttributeValue::Int(2)),
            ("user_liked_ratings", AttributeValue::Int(2)),
            ("occupation_movie_total", AttributeValue::Int(2)),
            ("occupation_movie_liked", AttributeValue::Int(2)),
            ("user_genre_total", AttributeValue::Int(5)),
            ("user_genre_liked", AttributeValue::Int(5)),
            ("user_like_rate", AttributeValue::Float(1.0)),
            ("user_genre_like_rate", AttributeValue::Float(1.0)),
            ("movie_like_rate", AttributeValue::Null),
            ("occupation_like_rate", AttributeValue::Float(1.0)),
        ])
    }

    #[test]
    fn test_build_sample() {
        let vector = FeatureVectorBuilder::new().build(&sample()).unwrap();

        assert_eq!(vector.values.len(), FEATURE_COUNT);
        assert_eq!(vector.value_of("age"), Some(21.0));
        assert_eq!(vector.value_of("gender"), Some(1.0));
        assert_eq!(vector.value_of("Adventure"), Some(1.0));
        assert_eq!(vector.value_of("Action"), Some(0.0));
        assert_eq!(vector.value_of("occupation_new"), Some(4.0));
        assert_eq!(vector.value_of("movie_like_rate"), Some(0.0));
        assert_eq!(vector.value_of("release_year"), Some(1997.0));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = FeatureVectorBuilder::new();
        let a = builder.build(&sample()).unwrap();
        let b = builder.build(&sample()).unwrap();

        let bits_a: Vec<u32> = a.values.iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u32> = b.values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn test_empty_map_defaults() {
        let vector = FeatureVectorBuilder::new().build(&AttributeMap::new()).unwrap();

        assert_eq!(vector.values.len(), FEATURE_COUNT);
        assert_eq!(vector.values[1], 1.0, "missing gender encodes as M");
        for (i, v) in vector.values.iter().enumerate() {
            assert!(!v.is_nan());
            if i != 1 {
                assert_eq!(*v, 0.0);
            }
        }
    }

    #[test]
    fn test_gender_mapping() {
        let builder = FeatureVectorBuilder::new();
        let f = builder.build(&map(&[("gender", "F".into())])).unwrap();
        let m = builder.build(&map(&[("gender", "M".into())])).unwrap();

        assert_eq!(f.values[1], 0.0);
        assert_eq!(m.values[1], 1.0);
    }

    #[test]
    fn test_alias_resolution() {
        let builder = FeatureVectorBuilder::new();
        let vector = builder
            .build(&map(&[
                ("Childrens", AttributeValue::Int(1)),
                ("FilmNoir", AttributeValue::Int(1)),
                ("SciFi", AttributeValue::Int(1)),
            ]))
            .unwrap();

        assert_eq!(vector.value_of("Children's"), Some(1.0));
        assert_eq!(vector.value_of("Film-Noir"), Some(1.0));
        assert_eq!(vector.value_of("Sci-Fi"), Some(1.0));
        assert_eq!(vector.values[5], 1.0);
        assert_eq!(vector.values[11], 1.0);
        assert_eq!(vector.values[16], 1.0);
    }

    #[test]
    fn test_null_defaulting() {
        let vector = FeatureVectorBuilder::new()
            .build(&map(&[
                ("release_year", AttributeValue::Null),
                ("user_like_rate", AttributeValue::Null),
            ]))
            .unwrap();

        assert_eq!(vector.value_of("release_year"), Some(0.0));
        assert_eq!(vector.value_of("user_like_rate"), Some(0.0));
        assert!(vector.values.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_invalid_value_fails_row() {
        let err = FeatureVectorBuilder::new()
            .build(&map(&[("occupation_new", "student".into())]))
            .unwrap_err();
        assert!(matches!(err, FeatureError::NotNumeric { ref feature, .. } if feature == "occupation_new"));
    }

    #[test]
    fn test_overflowing_value_fails_row() {
        let err = FeatureVectorBuilder::new()
            .build(&map(&[("release_year", AttributeValue::Float(1e300))]))
            .unwrap_err();
        assert!(matches!(err, FeatureError::NotFinite { ref feature, .. } if feature == "release_year"));
    }

    #[test]
    fn test_batch_preserves_order() {
        let builder = FeatureVectorBuilder::new();
        let batch = vec![
            map(&[("age", AttributeValue::Int(10))]),
            map(&[("age", AttributeValue::Int(20)), ("gender", "F".into())]),
            map(&[("age", AttributeValue::Int(30))]),
        ];

        let vectors = builder.build_batch(&batch).unwrap();
        assert_eq!(vectors.len(), 3);
        for (attrs, vector) in batch.iter().zip(&vectors) {
            assert_eq!(&builder.build(attrs).unwrap(), vector);
        }
    }

    #[test]
    fn test_batch_fails_on_any_bad_row() {
        let batch = vec![
            map(&[("age", AttributeValue::Int(10))]),
            map(&[("age", "old".into())]),
        ];
        assert!(FeatureVectorBuilder::new().build_batch(&batch).is_err());
    }

    #[test]
    fn test_to_matrix_shape() {
        let builder = FeatureVectorBuilder::new();
        let vectors = builder
            .build_batch(&[sample(), map(&[("age", AttributeValue::Int(40))])])
            .unwrap();

        let matrix = to_matrix(&vectors);
        assert_eq!(matrix.dim(), (2, FEATURE_COUNT));
        assert_eq!(matrix[[0, 0]], 21.0);
        assert_eq!(matrix[[1, 0]], 40.0);
        assert_eq!(matrix[[0, 33]], 1997.0);
    }

    #[test]
    fn test_log_fields() {
        let vector = FeatureVectorBuilder::new().build(&sample()).unwrap();
        let log = vector.log_fields();
        assert_eq!(log["layout_version"], FEATURE_VERSION);
        assert_eq!(log["values"]["age"], 21.0);
        assert_eq!(log["values"]["Sci-Fi"], 0.0);
    }
}
