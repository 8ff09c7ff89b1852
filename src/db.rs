use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, Funko, FunkoArgs, FunkoChanges, ParseCategoryError};
use crate::repository::{FunkoFilter, FunkoRepository};

const COLUMNS: &str = "id, uuid, name, price, category, release_date, created_at, updated_at";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository backed by an embedded SQLite database. The connection is
/// behind a mutex; catalog queries are short enough that serializing them
/// is not a concern.
pub struct SqliteFunkoRepository {
    conn: Mutex<Connection>,
}

impl SqliteFunkoRepository {
    /// Open (or create) the database file and apply migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        info!("opening catalog database at {}", path.display());
        let conn = Connection::open(path)?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.run_migrations()?;
        Ok(repo)
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.run_migrations()?;
        Ok(repo)
    }

    pub fn run_migrations(&self) -> Result<()> {
        info!("applying database migrations");
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(include_str!("../migrations/001_create_funkos.sql"))?;
        Ok(())
    }
}

fn conversion_error(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

fn row_to_funko(row: &Row<'_>) -> rusqlite::Result<Funko> {
    let uuid_text: String = row.get(1)?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|e| conversion_error(1, e))?;

    let category_text: String = row.get(4)?;
    let category: Category = category_text
        .parse()
        .map_err(|e: ParseCategoryError| conversion_error(4, e))?;

    let release_date_text: String = row.get(5)?;
    let release_date = NaiveDate::parse_from_str(&release_date_text, DATE_FORMAT)
        .map_err(|e| conversion_error(5, e))?;

    let created_at_text: String = row.get(6)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_text)
        .map_err(|e| conversion_error(6, e))?
        .with_timezone(&Utc);

    let updated_at_text: String = row.get(7)?;
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_text)
        .map_err(|e| conversion_error(7, e))?
        .with_timezone(&Utc);

    Ok(Funko {
        id: row.get(0)?,
        uuid,
        name: row.get(2)?,
        price: row.get(3)?,
        category,
        release_date,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl FunkoRepository for SqliteFunkoRepository {
    async fn all(&self, filter: &FunkoFilter) -> Result<Vec<Funko>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!("SELECT {COLUMNS} FROM funkos");
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(name) = &filter.name_contains {
            clauses.push("LOWER(name) LIKE '%' || LOWER(?) || '%'");
            values.push(Value::Text(name.clone()));
        }
        if let Some(category) = filter.category {
            clauses.push("category = ?");
            values.push(Value::Text(category.as_str().to_string()));
        }
        if let Some(max_price) = filter.max_price {
            clauses.push("price < ?");
            values.push(Value::Real(max_price));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id ASC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), row_to_funko)?;
        let mut result = Vec::new();
        for funko in rows {
            result.push(funko?);
        }
        Ok(result)
    }

    async fn get(&self, id: i64) -> Result<Option<Funko>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM funkos WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_funko(row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Funko>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM funkos WHERE uuid = ?1"))?;
        let mut rows = stmt.query(params![uuid.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_funko(row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, args: FunkoArgs) -> Result<Funko> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let uuid = Uuid::new_v4();
        conn.execute(
            "INSERT INTO funkos (uuid, name, price, category, release_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                uuid.to_string(),
                args.name,
                args.price,
                args.category.as_str(),
                args.release_date.format(DATE_FORMAT).to_string(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("stored funko {} with id {}", args.name, id);

        Ok(Funko {
            id,
            uuid,
            name: args.name,
            price: args.price,
            category: args.category,
            release_date: args.release_date,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: i64, args: FunkoArgs) -> Result<Option<Funko>> {
        let changed = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE funkos
                 SET name = ?1, price = ?2, category = ?3, release_date = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    args.name,
                    args.price,
                    args.category.as_str(),
                    args.release_date.format(DATE_FORMAT).to_string(),
                    Utc::now().to_rfc3339(),
                    id,
                ],
            )?
        };
        if changed == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn patch(&self, id: i64, changes: FunkoChanges) -> Result<Option<Funko>> {
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(name) = changes.name {
            sets.push(format!("name = ?{}", values.len() + 1));
            values.push(Value::Text(name));
        }
        if let Some(price) = changes.price {
            sets.push(format!("price = ?{}", values.len() + 1));
            values.push(Value::Real(price));
        }
        if let Some(category) = changes.category {
            sets.push(format!("category = ?{}", values.len() + 1));
            values.push(Value::Text(category.as_str().to_string()));
        }
        if let Some(release_date) = changes.release_date {
            sets.push(format!("release_date = ?{}", values.len() + 1));
            values.push(Value::Text(release_date.format(DATE_FORMAT).to_string()));
        }
        // A patch always refreshes updated_at, even when no field changed
        sets.push(format!("updated_at = ?{}", values.len() + 1));
        values.push(Value::Text(Utc::now().to_rfc3339()));

        let sql = format!(
            "UPDATE funkos SET {} WHERE id = ?{}",
            sets.join(", "),
            values.len() + 1
        );
        values.push(Value::Integer(id));

        let changed = {
            let conn = self.conn.lock().unwrap();
            conn.execute(&sql, params_from_iter(values))?
        };
        if changed == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<Option<Funko>> {
        let existing = self.get(id).await?;
        if existing.is_some() {
            let conn = self.conn.lock().unwrap();
            conn.execute("DELETE FROM funkos WHERE id = ?1", params![id])?;
            debug!("deleted funko with id {}", id);
        }
        Ok(existing)
    }
}
