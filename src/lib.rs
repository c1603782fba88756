//! People directory with name-based demographic enrichment
//!
//! This crate maintains a directory of person records. On insertion each
//! record is augmented with age, gender, and nationality inferred from the
//! person's first name by three independent external classification
//! services; queries support sparse exact-match filters and keyset
//! pagination over the immutable record id.
//!
//! ## Architecture
//! Create flow: enrichment aggregator (three concurrent lookups, joined or
//! failed as a unit) -> person repository insert.
//! List flow: filter predicate (conjunction of present fields + cursor) ->
//! paginated select.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use people_directory::api::{create_router, AppState};
//! use people_directory::database::MemoryPersonRepository;
//! use people_directory::enrich::StubEnricher;
//!
//! let state = AppState::new(
//!     Arc::new(MemoryPersonRepository::new()),
//!     Arc::new(StubEnricher),
//! );
//! let app = create_router(state);
//! ```

// Core error handling
pub mod error;

// Name-based demographic enrichment
pub mod enrich;

// Person storage, filtering, and pagination
pub mod database;

// HTTP transport
pub mod api;

// Public re-exports for the common types
pub use database::{
    MemoryPersonRepository, NewPerson, Page, PageRequest, Person, PersonFilter, PersonPatch,
    PersonRepository, PersonRepositoryTrait,
};
pub use enrich::{EnrichedAttributes, Enricher, EnrichmentService};
pub use error::{DirectoryError, DirectoryResult, EnrichmentError, ValidationError};
