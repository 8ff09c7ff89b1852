use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, Funko, FunkoArgs, FunkoChanges};

/// Filters applied to the list operation. All filters are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct FunkoFilter {
    /// Case-insensitive substring match on the name.
    pub name_contains: Option<String>,
    pub category: Option<Category>,
    /// Keep only figures priced strictly below this bound.
    pub max_price: Option<f64>,
}

impl FunkoFilter {
    pub fn matches(&self, funko: &Funko) -> bool {
        if let Some(name) = &self.name_contains {
            if !funko.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if funko.category != category {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if funko.price >= max_price {
                return false;
            }
        }
        true
    }
}

/// Storage abstraction for the funko catalog.
#[async_trait]
pub trait FunkoRepository: Send + Sync {
    /// List figures matching the filter, ordered by ascending id.
    async fn all(&self, filter: &FunkoFilter) -> Result<Vec<Funko>>;

    async fn get(&self, id: i64) -> Result<Option<Funko>>;

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Funko>>;

    /// Store a new figure, assigning id, uuid and timestamps.
    async fn insert(&self, args: FunkoArgs) -> Result<Funko>;

    /// Replace every user-editable field. `None` when the id is unknown.
    async fn update(&self, id: i64, args: FunkoArgs) -> Result<Option<Funko>>;

    /// Apply only the fields present in the change set. `None` when the id
    /// is unknown.
    async fn patch(&self, id: i64, changes: FunkoChanges) -> Result<Option<Funko>>;

    /// Remove a figure, returning it. `None` when the id is unknown.
    async fn delete(&self, id: i64) -> Result<Option<Funko>>;
}

/// In-memory repository for development and tests.
pub struct InMemoryFunkoRepository {
    funkos: Mutex<HashMap<i64, Funko>>,
    next_id: Mutex<i64>,
}

impl InMemoryFunkoRepository {
    pub fn new() -> Self {
        Self {
            funkos: Mutex::new(HashMap::new()),
            next_id: Mutex::new(0),
        }
    }
}

impl Default for InMemoryFunkoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FunkoRepository for InMemoryFunkoRepository {
    async fn all(&self, filter: &FunkoFilter) -> Result<Vec<Funko>> {
        let funkos = self.funkos.lock().unwrap();
        let mut result: Vec<Funko> = funkos
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        result.sort_by_key(|f| f.id);
        Ok(result)
    }

    async fn get(&self, id: i64) -> Result<Option<Funko>> {
        Ok(self.funkos.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Funko>> {
        let funkos = self.funkos.lock().unwrap();
        Ok(funkos.values().find(|f| f.uuid == uuid).cloned())
    }

    async fn insert(&self, args: FunkoArgs) -> Result<Funko> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let now = Utc::now();
        let funko = Funko {
            id,
            uuid: Uuid::new_v4(),
            name: args.name,
            price: args.price,
            category: args.category,
            release_date: args.release_date,
            created_at: now,
            updated_at: now,
        };
        self.funkos.lock().unwrap().insert(id, funko.clone());
        debug!("stored funko {} with id {}", funko.name, id);
        Ok(funko)
    }

    async fn update(&self, id: i64, args: FunkoArgs) -> Result<Option<Funko>> {
        let mut funkos = self.funkos.lock().unwrap();
        let Some(existing) = funkos.get_mut(&id) else {
            warn!("no funko with id {} to update", id);
            return Ok(None);
        };
        existing.name = args.name;
        existing.price = args.price;
        existing.category = args.category;
        existing.release_date = args.release_date;
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn patch(&self, id: i64, changes: FunkoChanges) -> Result<Option<Funko>> {
        let mut funkos = self.funkos.lock().unwrap();
        let Some(existing) = funkos.get_mut(&id) else {
            warn!("no funko with id {} to patch", id);
            return Ok(None);
        };
        if let Some(name) = changes.name {
            existing.name = name;
        }
        if let Some(price) = changes.price {
            existing.price = price;
        }
        if let Some(category) = changes.category {
            existing.category = category;
        }
        if let Some(release_date) = changes.release_date {
            existing.release_date = release_date;
        }
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Funko>> {
        let removed = self.funkos.lock().unwrap().remove(&id);
        if removed.is_none() {
            warn!("no funko with id {} to delete", id);
        }
        Ok(removed)
    }
}

/// Sample catalog used by the `seed` command and the dev seed flag.
pub fn sample_catalog() -> Vec<FunkoArgs> {
    vec![
        FunkoArgs {
            name: "Spider-Man Classic".to_string(),
            price: 19.99,
            category: Category::Comics,
            release_date: NaiveDate::from_ymd_opt(2020, 5, 12).unwrap(),
        },
        FunkoArgs {
            name: "Pikachu Limited Edition".to_string(),
            price: 24.50,
            category: Category::VideoGames,
            release_date: NaiveDate::from_ymd_opt(2021, 7, 21).unwrap(),
        },
        FunkoArgs {
            name: "Freddy Krueger Vintage".to_string(),
            price: 18.00,
            category: Category::Movies,
            release_date: NaiveDate::from_ymd_opt(2018, 10, 31).unwrap(),
        },
    ]
}

/// Insert the sample catalog unless the store already has entries, so
/// repeated startups don't duplicate it. Returns how many were inserted.
pub async fn seed_sample_data(repository: &dyn FunkoRepository) -> Result<usize> {
    let existing = repository.all(&FunkoFilter::default()).await?;
    if !existing.is_empty() {
        debug!("catalog already has {} entries, skipping seed", existing.len());
        return Ok(0);
    }
    let catalog = sample_catalog();
    let count = catalog.len();
    for args in catalog {
        repository.insert(args).await?;
    }
    Ok(count)
}
