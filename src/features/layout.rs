//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the model input schema**
//!
//! The order below is the exact column order the booster was trained on.
//! Add, remove or reorder a feature → increment `FEATURE_VERSION` and
//! re-export the model.

use crc32fast::Hasher;
use serde::Serialize;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === User (0-1) ===
    "age",                    // 0
    "gender",                 // 1: M=1, F=0

    // === Genre flags (2-19) ===
    "Action",                 // 2
    "Adventure",              // 3
    "Animation",              // 4
    "Children's",             // 5: transported as `Childrens`
    "Comedy",                 // 6
    "Crime",                  // 7
    "Documentary",            // 8
    "Drama",                  // 9
    "Fantasy",                // 10
    "Film-Noir",              // 11: transported as `FilmNoir`
    "Horror",                 // 12
    "Musical",                // 13
    "Mystery",                // 14
    "Romance",                // 15
    "Sci-Fi",                 // 16: transported as `SciFi`
    "Thriller",               // 17
    "War",                    // 18
    "Western",                // 19

    // === Occupation (20) ===
    "occupation_new",         // 20

    // === Aggregated counts (21-28) ===
    "user_total_ratings",     // 21
    "user_liked_ratings",     // 22
    "movie_total_ratings",    // 23
    "movie_liked_ratings",    // 24
    "occupation_movie_total", // 25
    "occupation_movie_liked", // 26
    "user_genre_total",       // 27
    "user_genre_liked",       // 28

    // === Rates (29-32) ===
    "user_like_rate",         // 29
    "user_genre_like_rate",   // 30
    "movie_like_rate",        // 31
    "occupation_like_rate",   // 32

    // === Movie (33) ===
    "release_year",           // 33
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 34;

/// CRC32 over the version byte and the NUL-terminated slot names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(b"\0");
    }
    hasher.finalize()
}

/// Position of a schema label (`Children's`, not the transport key)
pub fn slot_index(label: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == label)
}

/// Served by `GET /model/info`
#[derive(Debug, Clone, Serialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: &'static [&'static str],
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT,
        }
    }
}
