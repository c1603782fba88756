//! Filter predicate and keyset pagination
//!
//! [`PersonFilter`] is a sparse set of optional exact-match constraints.
//! Present fields contribute one equality term each to the generated WHERE
//! conjunction; absent fields contribute nothing. `Some("")` and `None` are
//! distinct states, so callers can filter for genuinely empty values.
//!
//! Pagination is keyset-based on the immutable, monotonically assigned `id`:
//! the cursor is the last id a previous page returned, applied as an
//! exclusive lower bound. Placeholders are numbered in push order and the
//! repository binds parameters in that same order.

use serde::{Deserialize, Serialize};

use super::person_repository::Person;
use crate::error::ValidationError;

/// Hard cap on page size, enforced before any query reaches storage
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sparse exact-match filter over person fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFilter {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl PersonFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.patronymic.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.nationality.is_none()
    }

    /// Whether a person satisfies every present constraint
    pub fn matches(&self, person: &Person) -> bool {
        self.name.as_ref().map_or(true, |v| *v == person.name)
            && self.surname.as_ref().map_or(true, |v| *v == person.surname)
            && self
                .patronymic
                .as_ref()
                .map_or(true, |v| *v == person.patronymic)
            && self.age.map_or(true, |v| v == person.age)
            && self.gender.as_ref().map_or(true, |v| *v == person.gender)
            && self
                .nationality
                .as_ref()
                .map_or(true, |v| *v == person.nationality)
    }
}

/// Validated pagination parameters
///
/// Construction is the only validation point: a `PageRequest` in hand means
/// the limit is within bounds and the cursor, if any, is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    cursor: Option<i64>,
    limit: i64,
}

impl PageRequest {
    pub fn new(cursor: Option<i64>, limit: i64) -> Result<Self, ValidationError> {
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ValidationError::LimitOutOfRange {
                got: limit,
                max: MAX_PAGE_SIZE,
            });
        }
        if let Some(cursor) = cursor {
            if cursor < 0 {
                return Err(ValidationError::NegativeCursor { got: cursor });
            }
        }
        Ok(Self { cursor, limit })
    }

    pub fn cursor(&self) -> Option<i64> {
        self.cursor
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

/// One page of people in ascending id order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Person>,
    /// Id of the last returned row, present iff the page was full
    pub next_cursor: Option<i64>,
}

impl Page {
    /// Derive the next cursor from a fetched batch: a full page means more
    /// rows may exist, a short page means the listing is exhausted.
    pub fn from_rows(items: Vec<Person>, limit: i64) -> Self {
        let next_cursor = if items.len() as i64 == limit {
            items.last().map(|p| p.id)
        } else {
            None
        };
        Self { items, next_cursor }
    }
}

/// Build the SELECT for a filtered, cursor-paginated listing
///
/// Bind order: present filter fields (name, surname, patronymic, age, gender,
/// nationality), then the cursor if present, then the limit.
pub(crate) fn build_list_query(filter: &PersonFilter, page: &PageRequest) -> String {
    let mut terms: Vec<String> = Vec::new();
    let mut bind_count = 0;

    for (present, column) in [
        (filter.name.is_some(), "name"),
        (filter.surname.is_some(), "surname"),
        (filter.patronymic.is_some(), "patronymic"),
        (filter.age.is_some(), "age"),
        (filter.gender.is_some(), "gender"),
        (filter.nationality.is_some(), "nationality"),
    ] {
        if present {
            bind_count += 1;
            terms.push(format!("{} = ${}", column, bind_count));
        }
    }

    if page.cursor().is_some() {
        bind_count += 1;
        terms.push(format!("id > ${}", bind_count));
    }

    let mut query = String::from(
        "SELECT id, name, surname, patronymic, age, gender, nationality FROM people",
    );
    if !terms.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&terms.join(" AND "));
    }
    bind_count += 1;
    query.push_str(&format!(" ORDER BY id LIMIT ${}", bind_count));

    query
}
