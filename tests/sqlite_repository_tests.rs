use anyhow::Result;
use chrono::NaiveDate;
use funko_api::db::SqliteFunkoRepository;
use funko_api::models::{Category, FunkoArgs, FunkoChanges};
use funko_api::repository::{FunkoFilter, FunkoRepository};
use tempfile::tempdir;
use uuid::Uuid;

fn args(name: &str, price: f64, category: Category, date: (i32, u32, u32)) -> FunkoArgs {
    FunkoArgs {
        name: name.to_string(),
        price,
        category,
        release_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
    }
}

#[tokio::test]
async fn crud_round_trip() -> Result<()> {
    let repo = SqliteFunkoRepository::open_in_memory()?;

    let created = repo
        .insert(args("Spider-Man Classic", 19.99, Category::Comics, (2020, 5, 12)))
        .await?;
    assert_eq!(created.id, 1);

    let fetched = repo.get(created.id).await?.expect("figure should exist");
    assert_eq!(fetched, created);

    let updated = repo
        .update(
            created.id,
            args("Spider-Man Renewed", 21.50, Category::Movies, (2022, 1, 1)),
        )
        .await?
        .expect("figure should exist");
    assert_eq!(updated.name, "Spider-Man Renewed");
    assert_eq!(updated.category, Category::Movies);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let patched = repo
        .patch(
            created.id,
            FunkoChanges {
                price: Some(25.0),
                ..Default::default()
            },
        )
        .await?
        .expect("figure should exist");
    assert_eq!(patched.price, 25.0);
    assert_eq!(patched.name, "Spider-Man Renewed");

    let deleted = repo.delete(created.id).await?.expect("figure should exist");
    assert_eq!(deleted.id, created.id);
    assert!(repo.get(created.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn missing_ids_return_none() -> Result<()> {
    let repo = SqliteFunkoRepository::open_in_memory()?;

    assert!(repo.get(99).await?.is_none());
    assert!(repo
        .update(99, args("X", 1.0, Category::Other, (2020, 1, 1)))
        .await?
        .is_none());
    assert!(repo.patch(99, FunkoChanges::default()).await?.is_none());
    assert!(repo.delete(99).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn uuid_lookup_finds_the_figure() -> Result<()> {
    let repo = SqliteFunkoRepository::open_in_memory()?;
    let created = repo
        .insert(args("Pikachu Limited Edition", 24.50, Category::VideoGames, (2021, 7, 21)))
        .await?;

    let found = repo.find_by_uuid(created.uuid).await?;
    assert_eq!(found, Some(created));
    assert!(repo.find_by_uuid(Uuid::new_v4()).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn filters_are_applied_in_sql() -> Result<()> {
    let repo = SqliteFunkoRepository::open_in_memory()?;
    repo.insert(args("Spider-Man Classic", 19.99, Category::Comics, (2020, 5, 12)))
        .await?;
    repo.insert(args("Pikachu Limited Edition", 24.50, Category::VideoGames, (2021, 7, 21)))
        .await?;
    repo.insert(args("Freddy Krueger Vintage", 18.00, Category::Movies, (2018, 10, 31)))
        .await?;

    let by_name = repo
        .all(&FunkoFilter {
            name_contains: Some("SPIDER".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Spider-Man Classic");

    let by_category = repo
        .all(&FunkoFilter {
            category: Some(Category::VideoGames),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_category.len(), 1);

    let by_price = repo
        .all(&FunkoFilter {
            max_price: Some(20.0),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_price.len(), 2);

    let combined = repo
        .all(&FunkoFilter {
            name_contains: Some("e".to_string()),
            category: Some(Category::Movies),
            max_price: Some(19.0),
        })
        .await?;
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].name, "Freddy Krueger Vintage");

    Ok(())
}

#[tokio::test]
async fn data_persists_across_reopen() -> Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("funkos.db");

    let created = {
        let repo = SqliteFunkoRepository::open(&db_path)?;
        repo.insert(args("Freddy Krueger Vintage", 18.00, Category::Movies, (2018, 10, 31)))
            .await?
    };

    let repo = SqliteFunkoRepository::open(&db_path)?;
    let fetched = repo.get(created.id).await?.expect("figure should persist");
    assert_eq!(fetched, created);

    Ok(())
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() -> Result<()> {
    let repo = SqliteFunkoRepository::open_in_memory()?;

    let first = repo
        .insert(args("First", 10.0, Category::Other, (2020, 1, 1)))
        .await?;
    repo.delete(first.id).await?;

    let second = repo
        .insert(args("Second", 11.0, Category::Other, (2020, 1, 2)))
        .await?;
    assert_eq!(second.id, 2);

    Ok(())
}
