//! Request handlers
//!
//! Error mapping: validation errors are the caller's fault (400), a failed
//! classification lookup is an upstream dependency problem and safe to retry
//! (502), storage failures are ours (500). Enrichment failures never leave a
//! row behind.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use crate::database::{NewPerson, Page, PageRequest, Person, PersonFilter, PersonPatch};
use crate::error::{DirectoryError, ValidationError};

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePersonResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListPeopleQuery {
    pub limit: i64,
    pub cursor: Option<i64>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeoplePageResponse {
    pub people: Vec<Person>,
    pub next_cursor: Option<i64>,
}

impl From<Page> for PeoplePageResponse {
    fn from(page: Page) -> Self {
        Self {
            people: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Enrich a person by name and persist the result
pub async fn create_person(
    State(state): State<AppState>,
    Json(request): Json<CreatePersonRequest>,
) -> Result<Json<CreatePersonResponse>, StatusCode> {
    match try_create_person(&state, request).await {
        Ok(id) => {
            info!(id, "Created person");
            Ok(Json(CreatePersonResponse { id }))
        }
        Err(err) => {
            warn!("Failed to create person: {}", err);
            Err(error_status(&err))
        }
    }
}

async fn try_create_person(
    state: &AppState,
    request: CreatePersonRequest,
) -> Result<i64, DirectoryError> {
    if request.name.trim().is_empty() {
        return Err(ValidationError::EmptyName.into());
    }

    // All three lookups must succeed before anything is written; a failed
    // enrichment aborts here and no row is ever inserted.
    let attrs = state.enricher.enrich(&request.name).await?;
    let person = NewPerson::from_parts(request.name, request.surname, request.patronymic, attrs);
    let id = state.store.save_person(&person).await?;
    Ok(id)
}

/// List people with optional exact-match filters and cursor pagination
pub async fn list_people(
    State(state): State<AppState>,
    Query(query): Query<ListPeopleQuery>,
) -> Result<Json<PeoplePageResponse>, StatusCode> {
    match try_list_people(&state, query).await {
        Ok(page) => Ok(Json(page.into())),
        Err(err) => {
            warn!("Failed to list people: {}", err);
            Err(error_status(&err))
        }
    }
}

async fn try_list_people(
    state: &AppState,
    query: ListPeopleQuery,
) -> Result<Page, DirectoryError> {
    if let Some(age) = query.age {
        if age < 0 {
            return Err(ValidationError::NegativeAge { got: age }.into());
        }
    }
    let page = PageRequest::new(query.cursor, query.limit)?;
    let filter = PersonFilter {
        name: query.name,
        surname: query.surname,
        patronymic: query.patronymic,
        age: query.age,
        gender: query.gender,
        nationality: query.nationality,
    };
    Ok(state.store.list_people(&filter, &page).await?)
}

pub async fn get_person(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Person>, StatusCode> {
    match state.store.get_person(id).await {
        Ok(Some(person)) => Ok(Json(person)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            warn!("Failed to get person {}: {}", id, err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Overwrite the fields present in the patch; absent fields stay as they are
pub async fn update_person(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(patch): Json<PersonPatch>,
) -> Result<StatusCode, StatusCode> {
    match try_update_person(&state, id, patch).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => {
            warn!("Failed to update person {}: {}", id, err);
            Err(error_status(&err))
        }
    }
}

async fn try_update_person(
    state: &AppState,
    id: i64,
    patch: PersonPatch,
) -> Result<(), DirectoryError> {
    if let Some(age) = patch.age {
        if age < 0 {
            return Err(ValidationError::NegativeAge { got: age }.into());
        }
    }
    Ok(state.store.update_person(id, &patch).await?)
}

pub async fn delete_person(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, StatusCode> {
    match state.store.delete_person(id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => {
            warn!("Failed to delete person {}: {}", id, err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn error_status(err: &DirectoryError) -> StatusCode {
    match err {
        DirectoryError::Validation(_) => StatusCode::BAD_REQUEST,
        DirectoryError::Enrichment(_) => StatusCode::BAD_GATEWAY,
        DirectoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
