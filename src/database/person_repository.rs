//! Person persistence
//!
//! Types for the person entity plus the storage seam the API layer depends
//! on. The Postgres implementation keeps every operation a single atomic
//! statement, so no in-process locking or transactions are needed on top.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tracing::debug;

use super::filter::{build_list_query, Page, PageRequest, PersonFilter};
use crate::enrich::EnrichedAttributes;

// ============================================================================
// Types
// ============================================================================

/// A stored person record
///
/// `id` is assigned by the database, strictly increasing over the table's
/// lifetime and never reused, which is what makes it safe as a pagination
/// cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
}

/// A fully enriched person ready for insertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
}

impl NewPerson {
    /// Assemble an insertable record from the request fields and a completed
    /// enrichment. [`EnrichedAttributes`] only exists when all three lookups
    /// succeeded, so the insert never sees a partially-enriched record.
    pub fn from_parts(
        name: String,
        surname: String,
        patronymic: String,
        attrs: EnrichedAttributes,
    ) -> Self {
        Self {
            name,
            surname,
            patronymic,
            age: attrs.age,
            gender: attrs.gender,
            nationality: attrs.nationality,
        }
    }
}

/// Sparse field-by-field update
///
/// `Some(v)` overwrites the column, `None` leaves it untouched. As with
/// filters, `Some("")` is a real value and distinct from absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.patronymic.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.nationality.is_none()
    }

    /// Apply the present fields to a person in place
    pub(crate) fn apply(&self, person: &mut Person) {
        if let Some(ref name) = self.name {
            person.name = name.clone();
        }
        if let Some(ref surname) = self.surname {
            person.surname = surname.clone();
        }
        if let Some(ref patronymic) = self.patronymic {
            person.patronymic = patronymic.clone();
        }
        if let Some(age) = self.age {
            person.age = age;
        }
        if let Some(ref gender) = self.gender {
            person.gender = gender.clone();
        }
        if let Some(ref nationality) = self.nationality {
            person.nationality = nationality.clone();
        }
    }
}

// ============================================================================
// Storage seam
// ============================================================================

/// Storage operations the API layer depends on
#[async_trait]
pub trait PersonRepositoryTrait: Send + Sync {
    /// Insert a fully enriched person and return the assigned id
    async fn save_person(&self, person: &NewPerson) -> Result<i64, sqlx::Error>;

    /// Point read by id
    async fn get_person(&self, id: i64) -> Result<Option<Person>, sqlx::Error>;

    /// Overwrite the columns present in the patch; a missing id is a no-op
    /// success, matching delete's idempotence
    async fn update_person(&self, id: i64, patch: &PersonPatch) -> Result<(), sqlx::Error>;

    /// Remove a person; deleting an already-absent id succeeds silently
    async fn delete_person(&self, id: i64) -> Result<(), sqlx::Error>;

    /// Filtered, cursor-paginated listing in ascending id order
    async fn list_people(
        &self,
        filter: &PersonFilter,
        page: &PageRequest,
    ) -> Result<Page, sqlx::Error>;
}

// ============================================================================
// Postgres repository
// ============================================================================

/// Postgres-backed person repository
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepositoryTrait for PersonRepository {
    async fn save_person(&self, person: &NewPerson) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            r#"INSERT INTO people (name, surname, patronymic, age, gender, nationality)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(&person.name)
        .bind(&person.surname)
        .bind(&person.patronymic)
        .bind(person.age)
        .bind(&person.gender)
        .bind(&person.nationality)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.get("id");
        debug!(id, "Saved person");
        Ok(id)
    }

    async fn get_person(&self, id: i64) -> Result<Option<Person>, sqlx::Error> {
        sqlx::query_as::<_, Person>(
            r#"SELECT id, name, surname, patronymic, age, gender, nationality
               FROM people
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_person(&self, id: i64, patch: &PersonPatch) -> Result<(), sqlx::Error> {
        let Some(query) = build_update_query(patch) else {
            // Nothing to change; an all-absent patch never touches storage.
            return Ok(());
        };

        let mut db_query = sqlx::query(&query);
        if let Some(ref name) = patch.name {
            db_query = db_query.bind(name);
        }
        if let Some(ref surname) = patch.surname {
            db_query = db_query.bind(surname);
        }
        if let Some(ref patronymic) = patch.patronymic {
            db_query = db_query.bind(patronymic);
        }
        if let Some(age) = patch.age {
            db_query = db_query.bind(age);
        }
        if let Some(ref gender) = patch.gender {
            db_query = db_query.bind(gender);
        }
        if let Some(ref nationality) = patch.nationality {
            db_query = db_query.bind(nationality);
        }
        db_query = db_query.bind(id);

        // rows_affected of zero means the id does not exist; still a success.
        db_query.execute(&self.pool).await?;
        Ok(())
    }

    async fn delete_person(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_people(
        &self,
        filter: &PersonFilter,
        page: &PageRequest,
    ) -> Result<Page, sqlx::Error> {
        let query = build_list_query(filter, page);
        debug!(%query, "Listing people");

        let mut db_query = sqlx::query_as::<_, Person>(&query);
        if let Some(ref name) = filter.name {
            db_query = db_query.bind(name);
        }
        if let Some(ref surname) = filter.surname {
            db_query = db_query.bind(surname);
        }
        if let Some(ref patronymic) = filter.patronymic {
            db_query = db_query.bind(patronymic);
        }
        if let Some(age) = filter.age {
            db_query = db_query.bind(age);
        }
        if let Some(ref gender) = filter.gender {
            db_query = db_query.bind(gender);
        }
        if let Some(ref nationality) = filter.nationality {
            db_query = db_query.bind(nationality);
        }
        if let Some(cursor) = page.cursor() {
            db_query = db_query.bind(cursor);
        }
        db_query = db_query.bind(page.limit());

        let items = db_query.fetch_all(&self.pool).await?;
        Ok(Page::from_rows(items, page.limit()))
    }
}

/// Build the dynamic UPDATE for a patch; None when the patch is empty
///
/// Bind order: present patch fields (name, surname, patronymic, age, gender,
/// nationality), then the id.
fn build_update_query(patch: &PersonPatch) -> Option<String> {
    let mut assignments: Vec<String> = Vec::new();
    let mut bind_count = 0;

    for (present, column) in [
        (patch.name.is_some(), "name"),
        (patch.surname.is_some(), "surname"),
        (patch.patronymic.is_some(), "patronymic"),
        (patch.age.is_some(), "age"),
        (patch.gender.is_some(), "gender"),
        (patch.nationality.is_some(), "nationality"),
    ] {
        if present {
            bind_count += 1;
            assignments.push(format!("{} = ${}", column, bind_count));
        }
    }

    if assignments.is_empty() {
        return None;
    }

    Some(format!(
        "UPDATE people SET {} WHERE id = ${}",
        assignments.join(", "),
        bind_count + 1
    ))
}
