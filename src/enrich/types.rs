//! Classification API response types
//!
//! Wire shapes for the three public name-classification services:
//! agify.io (age), genderize.io (gender), nationalize.io (nationality).

use serde::{Deserialize, Serialize};

/// The complete demographic triple produced by a successful enrichment
///
/// Only ever constructed whole: a value of this type is proof that all three
/// lookups succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedAttributes {
    pub age: i32,
    pub gender: String,
    pub nationality: String,
}

/// agify.io response; `age` is null for names it has never seen
#[derive(Debug, Clone, Deserialize)]
pub struct AgifyResponse {
    pub age: Option<i32>,
}

/// genderize.io response; `gender` is null for unclassifiable names
#[derive(Debug, Clone, Deserialize)]
pub struct GenderizeResponse {
    pub gender: Option<String>,
}

/// nationalize.io response; `country` is empty for unknown names
#[derive(Debug, Clone, Deserialize)]
pub struct NationalizeResponse {
    pub country: Vec<CountryCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryCandidate {
    pub country_id: String,
    #[serde(default)]
    pub probability: f64,
}
