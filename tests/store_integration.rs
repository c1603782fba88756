//! Postgres integration tests for the person repository
//!
//! These run against a live database and are ignored by default. They
//! truncate the people table, so point them at a scratch database:
//!
//!   DATABASE_URL=postgresql://localhost:5432/people_test \
//!     cargo test --test store_integration -- --ignored --test-threads=1

use anyhow::Result;
use people_directory::database::{
    DatabaseConfig, DatabaseManager, NewPerson, PageRequest, PersonFilter, PersonPatch,
    PersonRepository, PersonRepositoryTrait,
};

struct TestDb {
    db: DatabaseManager,
}

impl TestDb {
    async fn new() -> Result<Self> {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "postgresql://localhost:5432/people_test".to_string());

        let db = DatabaseManager::new(DatabaseConfig {
            database_url,
            ..DatabaseConfig::default()
        })
        .await?;
        db.run_migrations().await?;

        sqlx::query("TRUNCATE people RESTART IDENTITY")
            .execute(db.pool())
            .await?;

        Ok(Self { db })
    }

    fn repository(&self) -> PersonRepository {
        self.db.person_repository()
    }
}

fn person(
    name: &str,
    surname: &str,
    patronymic: &str,
    age: i32,
    gender: &str,
    nationality: &str,
) -> NewPerson {
    NewPerson {
        name: name.to_string(),
        surname: surname.to_string(),
        patronymic: patronymic.to_string(),
        age,
        gender: gender.to_string(),
        nationality: nationality.to_string(),
    }
}

/// Twelve people where ids 6, 10 and 12 get surname Ivanova
async fn seed_twelve(repo: &PersonRepository) -> Result<()> {
    let fixtures = [
        ("Ivan", "Petrov", "Sergeevich", 35, "male", "russian"),
        ("Maria", "Kuznetsova", "Andreevna", 28, "female", "ukrainian"),
        ("Dmitry", "Smirnov", "Alexeevich", 42, "male", "russian"),
        ("Svetlana", "Popova", "Ivanovna", 22, "female", "belarusian"),
        ("Alexei", "Vasiliev", "Dmitrievich", 50, "male", "russian"),
        ("Elena", "Ivanova", "", 61, "female", "kazakh"),
        ("Sergei", "Mikhailov", "Nikolaevich", 29, "male", "russian"),
        ("Olga", "Fedorova", "Petrovna", 45, "female", "ukrainian"),
        ("Nikolai", "Morozov", "Ivanovich", 61, "male", "belarusian"),
        ("Tatiana", "Ivanova", "Sergeevna", 25, "female", "russian"),
        ("Andrei", "Novikov", "Vladimirovich", 38, "male", "georgian"),
        ("Anna", "Ivanova", "Alexeevna", 29, "female", "kazakh"),
    ];
    for (i, (name, surname, patronymic, age, gender, nationality)) in
        fixtures.into_iter().enumerate()
    {
        let id = repo
            .save_person(&person(name, surname, patronymic, age, gender, nationality))
            .await?;
        assert_eq!(id, (i + 1) as i64);
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_save_person_returns_increasing_ids() -> Result<()> {
    let db = TestDb::new().await?;
    let repo = db.repository();

    let first = repo
        .save_person(&person("Ivan", "Ivanov", "Ivanovich", 30, "male", "russian"))
        .await?;
    let second = repo
        .save_person(&person("Maria", "Kuznetsova", "", 28, "female", "ukrainian"))
        .await?;
    assert!(second > first);

    let stored = repo.get_person(first).await?.expect("person must exist");
    assert_eq!(stored.name, "Ivan");
    assert_eq!(stored.age, 30);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_filtered_listing_and_pagination() -> Result<()> {
    let db = TestDb::new().await?;
    let repo = db.repository();
    seed_twelve(&repo).await?;

    // Surname filter with a cursor at 1: exactly the three Ivanovas, short
    // page, no next cursor.
    let page = repo
        .list_people(
            &PersonFilter {
                surname: Some("Ivanova".to_string()),
                ..Default::default()
            },
            &PageRequest::new(Some(1), 12)?,
        )
        .await?;
    let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![6, 10, 12]);
    assert_eq!(page.next_cursor, None);

    // Age filter.
    let page = repo
        .list_people(
            &PersonFilter {
                age: Some(61),
                ..Default::default()
            },
            &PageRequest::new(None, 12)?,
        )
        .await?;
    assert_eq!(
        page.items.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![6, 9]
    );

    // Every field at once.
    let page = repo
        .list_people(
            &PersonFilter {
                name: Some("Andrei".to_string()),
                surname: Some("Novikov".to_string()),
                patronymic: Some("Vladimirovich".to_string()),
                age: Some(38),
                gender: Some("male".to_string()),
                nationality: Some("georgian".to_string()),
            },
            &PageRequest::new(Some(1), 12)?,
        )
        .await?;
    assert_eq!(
        page.items.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![11]
    );

    // Empty-string patronymic is a real constraint, not "unset".
    let page = repo
        .list_people(
            &PersonFilter {
                patronymic: Some(String::new()),
                ..Default::default()
            },
            &PageRequest::new(None, 12)?,
        )
        .await?;
    assert_eq!(
        page.items.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![6]
    );

    // Pagination consistency: 5 then 7 chained equals one fetch of 12.
    let all = repo
        .list_people(&PersonFilter::default(), &PageRequest::new(None, 12)?)
        .await?;
    assert_eq!(all.items.len(), 12);
    assert_eq!(all.next_cursor, Some(12));

    let first = repo
        .list_people(&PersonFilter::default(), &PageRequest::new(None, 5)?)
        .await?;
    let cursor = first.next_cursor.expect("full page must issue a cursor");
    let second = repo
        .list_people(&PersonFilter::default(), &PageRequest::new(Some(cursor), 7)?)
        .await?;

    let chained: Vec<i64> = first
        .items
        .iter()
        .chain(second.items.iter())
        .map(|p| p.id)
        .collect();
    assert_eq!(chained, all.items.iter().map(|p| p.id).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_update_person_patches_present_fields() -> Result<()> {
    let db = TestDb::new().await?;
    let repo = db.repository();

    let id = repo
        .save_person(&person("Ivan", "Ivanov", "Ivanovich", 30, "male", "russian"))
        .await?;

    repo.update_person(
        id,
        &PersonPatch {
            age: Some(1),
            nationality: Some("american".to_string()),
            ..Default::default()
        },
    )
    .await?;

    let updated = repo.get_person(id).await?.expect("person must exist");
    assert_eq!(updated.age, 1);
    assert_eq!(updated.nationality, "american");
    assert_eq!(updated.name, "Ivan");
    assert_eq!(updated.surname, "Ivanov");

    // An all-absent patch leaves the row byte-for-byte unchanged.
    repo.update_person(id, &PersonPatch::default()).await?;
    let unchanged = repo.get_person(id).await?.expect("person must exist");
    assert_eq!(unchanged, updated);

    // Updating a missing id is a quiet no-op.
    repo.update_person(
        id + 1000,
        &PersonPatch {
            age: Some(99),
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_delete_person_is_idempotent() -> Result<()> {
    let db = TestDb::new().await?;
    let repo = db.repository();

    let id = repo
        .save_person(&person("Ivan", "Ivanov", "Ivanovich", 30, "male", "russian"))
        .await?;

    repo.delete_person(id).await?;
    assert!(repo.get_person(id).await?.is_none());

    // Second delete succeeds silently.
    repo.delete_person(id).await?;
    Ok(())
}
