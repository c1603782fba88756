//! Name-based demographic enrichment
//!
//! This module provides:
//! - API types for the three external classification services
//! - One lookup client per service (age, gender, nationality)
//! - The aggregator that fans out the lookups and joins the results

pub mod client;
pub mod enrichment;
pub mod types;

pub use client::{AgeClient, GenderClient, NationalityClient};
pub use enrichment::{Enricher, EnrichmentConfig, EnrichmentService, StubEnricher};
pub use types::EnrichedAttributes;
