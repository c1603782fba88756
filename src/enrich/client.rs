//! Classification API clients
//!
//! One small HTTP client per external service. Each client hits a single
//! endpoint with a `name` query parameter and parses the response into one
//! typed value. The shared reqwest client carries the per-lookup timeout, so
//! every call is bounded without any retry machinery.

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{AgifyResponse, GenderizeResponse, NationalizeResponse};
use crate::error::EnrichmentError;

pub(crate) const AGIFY_API_URL: &str = "https://api.agify.io/";
pub(crate) const GENDERIZE_API_URL: &str = "https://api.genderize.io/";
pub(crate) const NATIONALIZE_API_URL: &str = "https://api.nationalize.io/";

/// Estimates a person's age from their first name via agify.io
pub struct AgeClient {
    http: Client,
    base_url: String,
}

impl AgeClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, AGIFY_API_URL)
    }

    /// Point the client at a different endpoint, e.g. a local mock server
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn lookup(&self, name: &str) -> Result<i32, EnrichmentError> {
        let response: AgifyResponse =
            fetch_classification(&self.http, "agify", &self.base_url, name).await?;

        match response.age {
            Some(age) if age >= 0 => Ok(age),
            Some(age) => Err(EnrichmentError::MalformedResponse {
                service: "agify",
                message: format!("negative age estimate {} for '{}'", age, name),
            }),
            None => Err(EnrichmentError::MalformedResponse {
                service: "agify",
                message: format!("no age estimate for '{}'", name),
            }),
        }
    }
}

/// Classifies a person's gender from their first name via genderize.io
pub struct GenderClient {
    http: Client,
    base_url: String,
}

impl GenderClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, GENDERIZE_API_URL)
    }

    /// Point the client at a different endpoint, e.g. a local mock server
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn lookup(&self, name: &str) -> Result<String, EnrichmentError> {
        let response: GenderizeResponse =
            fetch_classification(&self.http, "genderize", &self.base_url, name).await?;

        // The service answers null (or occasionally "") for names it cannot
        // classify; the gender vocabulary is otherwise stored verbatim.
        match response.gender {
            Some(gender) if !gender.is_empty() => Ok(gender),
            _ => Err(EnrichmentError::MalformedResponse {
                service: "genderize",
                message: format!("no gender classification for '{}'", name),
            }),
        }
    }
}

/// Infers a person's most likely nationality from their first name via nationalize.io
pub struct NationalityClient {
    http: Client,
    base_url: String,
}

impl NationalityClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, NATIONALIZE_API_URL)
    }

    /// Point the client at a different endpoint, e.g. a local mock server
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn lookup(&self, name: &str) -> Result<String, EnrichmentError> {
        let response: NationalizeResponse =
            fetch_classification(&self.http, "nationalize", &self.base_url, name).await?;

        response
            .country
            .into_iter()
            .max_by(|a, b| {
                a.probability
                    .partial_cmp(&b.probability)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|candidate| candidate.country_id)
            .ok_or_else(|| EnrichmentError::MalformedResponse {
                service: "nationalize",
                message: format!("no nationality candidates for '{}'", name),
            })
    }
}

/// Issue one classification request and decode its JSON body
async fn fetch_classification<T: DeserializeOwned>(
    http: &Client,
    service: &'static str,
    base_url: &str,
    name: &str,
) -> Result<T, EnrichmentError> {
    let response = http
        .get(base_url)
        .query(&[("name", name)])
        .send()
        .await
        .map_err(|e| classify_request_error(service, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(EnrichmentError::Unavailable {
            service,
            message: format!("HTTP {}", status),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| classify_request_error(service, e))
}

/// Map a reqwest error onto the enrichment error taxonomy
fn classify_request_error(service: &'static str, err: reqwest::Error) -> EnrichmentError {
    if err.is_timeout() {
        EnrichmentError::Timeout { service }
    } else if err.is_decode() {
        EnrichmentError::MalformedResponse {
            service,
            message: err.to_string(),
        }
    } else {
        EnrichmentError::Unavailable {
            service,
            message: err.to_string(),
        }
    }
}
