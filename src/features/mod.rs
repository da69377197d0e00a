//! Features Module - Feature Extraction Engine
//!
//! Maps a request's attribute map onto the fixed model input layout.

pub mod attributes;
pub mod layout;
pub mod vector;

pub use attributes::{AttributeMap, AttributeValue, FeatureError, Resolved};
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::{to_matrix, FeatureVector, FeatureVectorBuilder};
