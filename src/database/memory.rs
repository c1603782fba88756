//! In-memory person repository
//!
//! Same observable semantics as the Postgres repository, held in a BTreeMap
//! keyed by id. Ids are assigned from a counter that never goes backwards,
//! even across deletes, matching BIGSERIAL behavior so cursor pagination
//! works identically. Used by API tests and anywhere a database is not worth
//! standing up.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::filter::{Page, PageRequest, PersonFilter};
use super::person_repository::{NewPerson, Person, PersonPatch, PersonRepositoryTrait};

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    rows: BTreeMap<i64, Person>,
}

/// In-memory [`PersonRepositoryTrait`] implementation
#[derive(Default)]
pub struct MemoryPersonRepository {
    inner: Mutex<MemoryInner>,
}

impl MemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored people, for test assertions
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PersonRepositoryTrait for MemoryPersonRepository {
    async fn save_person(&self, person: &NewPerson) -> Result<i64, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.insert(
            id,
            Person {
                id,
                name: person.name.clone(),
                surname: person.surname.clone(),
                patronymic: person.patronymic.clone(),
                age: person.age,
                gender: person.gender.clone(),
                nationality: person.nationality.clone(),
            },
        );
        Ok(id)
    }

    async fn get_person(&self, id: i64) -> Result<Option<Person>, sqlx::Error> {
        Ok(self.inner.lock().unwrap().rows.get(&id).cloned())
    }

    async fn update_person(&self, id: i64, patch: &PersonPatch) -> Result<(), sqlx::Error> {
        if patch.is_empty() {
            return Ok(());
        }
        if let Some(person) = self.inner.lock().unwrap().rows.get_mut(&id) {
            patch.apply(person);
        }
        Ok(())
    }

    async fn delete_person(&self, id: i64) -> Result<(), sqlx::Error> {
        self.inner.lock().unwrap().rows.remove(&id);
        Ok(())
    }

    async fn list_people(
        &self,
        filter: &PersonFilter,
        page: &PageRequest,
    ) -> Result<Page, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let lower_bound = page.cursor().map(|c| c + 1).unwrap_or(i64::MIN);
        let items: Vec<Person> = inner
            .rows
            .range(lower_bound..)
            .map(|(_, person)| person)
            .filter(|person| filter.matches(person))
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(Page::from_rows(items, page.limit()))
    }
}
