//! Prediction request/response models

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::features::{AttributeMap, AttributeValue};

/// Upper bound on rows per batch request
pub const MAX_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictionRequest {
    pub user_id: i64,
    pub movie_id: i64,

    #[validate(range(min = 1, max = 100))]
    pub age: i64,

    /// `M` or `F`
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,

    /// Occupation code; numeric strings only reach the model
    pub occupation_new: String,

    #[serde(default)]
    pub release_year: Option<f64>,

    // Genre flags (0/1)
    #[serde(rename = "Action", default)]
    #[validate(range(min = 0, max = 1))]
    pub action: i64,
    #[serde(rename = "Adventure", default)]
    #[validate(range(min = 0, max = 1))]
    pub adventure: i64,
    #[serde(rename = "Animation", default)]
    #[validate(range(min = 0, max = 1))]
    pub animation: i64,
    #[serde(rename = "Children's", alias = "Childrens", default)]
    #[validate(range(min = 0, max = 1))]
    pub childrens: i64,
    #[serde(rename = "Comedy", default)]
    #[validate(range(min = 0, max = 1))]
    pub comedy: i64,
    #[serde(rename = "Crime", default)]
    #[validate(range(min = 0, max = 1))]
    pub crime: i64,
    #[serde(rename = "Documentary", default)]
    #[validate(range(min = 0, max = 1))]
    pub documentary: i64,
    #[serde(rename = "Drama", default)]
    #[validate(range(min = 0, max = 1))]
    pub drama: i64,
    #[serde(rename = "Fantasy", default)]
    #[validate(range(min = 0, max = 1))]
    pub fantasy: i64,
    #[serde(rename = "Film-Noir", alias = "FilmNoir", default)]
    #[validate(range(min = 0, max = 1))]
    pub film_noir: i64,
    #[serde(rename = "Horror", default)]
    #[validate(range(min = 0, max = 1))]
    pub horror: i64,
    #[serde(rename = "Musical", default)]
    #[validate(range(min = 0, max = 1))]
    pub musical: i64,
    #[serde(rename = "Mystery", default)]
    #[validate(range(min = 0, max = 1))]
    pub mystery: i64,
    #[serde(rename = "Romance", default)]
    #[validate(range(min = 0, max = 1))]
    pub romance: i64,
    #[serde(rename = "Sci-Fi", alias = "SciFi", default)]
    #[validate(range(min = 0, max = 1))]
    pub sci_fi: i64,
    #[serde(rename = "Thriller", default)]
    #[validate(range(min = 0, max = 1))]
    pub thriller: i64,
    #[serde(rename = "War", default)]
    #[validate(range(min = 0, max = 1))]
    pub war: i64,
    #[serde(rename = "Western", default)]
    #[validate(range(min = 0, max = 1))]
    pub western: i64,

    // Aggregated counts
    #[serde(default)]
    #[validate(range(min = 0))]
    pub user_total_ratings: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub user_liked_ratings: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub movie_total_ratings: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub movie_liked_ratings: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub occupation_movie_total: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub occupation_movie_liked: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub user_genre_total: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub user_genre_liked: i64,

    // Rates (null when there is no history)
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub user_like_rate: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub user_genre_like_rate: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub movie_like_rate: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub occupation_like_rate: Option<f64>,
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    match gender {
        "M" | "F" => Ok(()),
        _ => Err(ValidationError::new("gender_must_be_M_or_F")),
    }
}

impl PredictionRequest {
    /// Flatten into the attribute map consumed by the feature builder.
    /// Keys use the transport spelling (`Childrens`, `FilmNoir`, `SciFi`).
    pub fn to_attributes(&self) -> AttributeMap {
        let entries: [(&str, AttributeValue); 34] = [
            ("age", self.age.into()),
            ("gender", self.gender.as_str().into()),
            ("Action", self.action.into()),
            ("Adventure", self.adventure.into()),
            ("Animation", self.animation.into()),
            ("Childrens", self.childrens.into()),
            ("Comedy", self.comedy.into()),
            ("Crime", self.crime.into()),
            ("Documentary", self.documentary.into()),
            ("Drama", self.drama.into()),
            ("Fantasy", self.fantasy.into()),
            ("FilmNoir", self.film_noir.into()),
            ("Horror", self.horror.into()),
            ("Musical", self.musical.into()),
            ("Mystery", self.mystery.into()),
            ("Romance", self.romance.into()),
            ("SciFi", self.sci_fi.into()),
            ("Thriller", self.thriller.into()),
            ("War", self.war.into()),
            ("Western", self.western.into()),
            ("occupation_new", self.occupation_new.as_str().into()),
            ("user_total_ratings", self.user_total_ratings.into()),
            ("user_liked_ratings", self.user_liked_ratings.into()),
            ("movie_total_ratings", self.movie_total_ratings.into()),
            ("movie_liked_ratings", self.movie_liked_ratings.into()),
            ("occupation_movie_total", self.occupation_movie_total.into()),
            ("occupation_movie_liked", self.occupation_movie_liked.into()),
            ("user_genre_total", self.user_genre_total.into()),
            ("user_genre_liked", self.user_genre_liked.into()),
            ("user_like_rate", self.user_like_rate.into()),
            ("user_genre_like_rate", self.user_genre_like_rate.into()),
            ("movie_like_rate", self.movie_like_rate.into()),
            ("occupation_like_rate", self.occupation_like_rate.into()),
            ("release_year", self.release_year.into()),
        ];

        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchPredictionRequest {
    #[validate(length(min = 1, max = 1000), nested)]
    pub predictions: Vec<PredictionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub user_id: i64,
    pub movie_id: i64,
    pub prediction: f32,
    pub prediction_class: u8,
    pub model_version: String,
    pub inference_time_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<PredictionResponse>,
    pub total_time_ms: f64,
    pub avg_time_per_prediction_ms: f64,
}
