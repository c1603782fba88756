//! Enrichment aggregator
//!
//! Fans a single name out to the three classification services concurrently
//! and joins the results into one [`EnrichedAttributes`] triple. The first
//! lookup failure fails the whole operation; the sibling lookups still in
//! flight are dropped rather than awaited, so total latency is bounded by the
//! slowest necessary call.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::client::{
    AgeClient, GenderClient, NationalityClient, AGIFY_API_URL, GENDERIZE_API_URL,
    NATIONALIZE_API_URL,
};
use super::types::EnrichedAttributes;
use crate::error::EnrichmentError;

/// Classification endpoint configuration
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub age_api_url: String,
    pub gender_api_url: String,
    pub nationality_api_url: String,
    /// Bound on each individual lookup; there is no retry on top of it
    pub lookup_timeout: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            age_api_url: std::env::var("AGIFY_API_URL").unwrap_or_else(|_| AGIFY_API_URL.into()),
            gender_api_url: std::env::var("GENDERIZE_API_URL")
                .unwrap_or_else(|_| GENDERIZE_API_URL.into()),
            nationality_api_url: std::env::var("NATIONALIZE_API_URL")
                .unwrap_or_else(|_| NATIONALIZE_API_URL.into()),
            lookup_timeout: Duration::from_secs(
                std::env::var("LOOKUP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

/// Name-based demographic enrichment
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Produce the full attribute triple for a name, or fail as a unit
    async fn enrich(&self, name: &str) -> Result<EnrichedAttributes, EnrichmentError>;
}

/// Production [`Enricher`] backed by the three public classification APIs
pub struct EnrichmentService {
    age: AgeClient,
    gender: GenderClient,
    nationality: NationalityClient,
}

impl EnrichmentService {
    pub fn new(config: EnrichmentConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.lookup_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            age: AgeClient::with_base_url(http.clone(), config.age_api_url),
            gender: GenderClient::with_base_url(http.clone(), config.gender_api_url),
            nationality: NationalityClient::with_base_url(http, config.nationality_api_url),
        })
    }
}

#[async_trait]
impl Enricher for EnrichmentService {
    async fn enrich(&self, name: &str) -> Result<EnrichedAttributes, EnrichmentError> {
        // try_join! returns on the first error and drops the other futures,
        // which cancels their in-flight requests.
        let (age, gender, nationality) = tokio::try_join!(
            self.age.lookup(name),
            self.gender.lookup(name),
            self.nationality.lookup(name),
        )?;

        debug!(name, age, %gender, %nationality, "Enriched person attributes");

        Ok(EnrichedAttributes {
            age,
            gender,
            nationality,
        })
    }
}

/// Fixed-value enricher for tests and offline runs
pub struct StubEnricher;

#[async_trait]
impl Enricher for StubEnricher {
    async fn enrich(&self, _name: &str) -> Result<EnrichedAttributes, EnrichmentError> {
        Ok(EnrichedAttributes {
            age: 30,
            gender: "male".to_string(),
            nationality: "RU".to_string(),
        })
    }
}
