use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Categories a figure can belong to. Stored in the database and sent over
/// the wire as SCREAMING_SNAKE_CASE strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Movies,
    Series,
    VideoGames,
    Comics,
    Music,
    Sports,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movies => "MOVIES",
            Category::Series => "SERIES",
            Category::VideoGames => "VIDEO_GAMES",
            Category::Comics => "COMICS",
            Category::Music => "MUSIC",
            Category::Sports => "SPORTS",
            Category::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MOVIES" => Ok(Category::Movies),
            "SERIES" => Ok(Category::Series),
            "VIDEO_GAMES" => Ok(Category::VideoGames),
            "COMICS" => Ok(Category::Comics),
            "MUSIC" => Ok(Category::Music),
            "SPORTS" => Ok(Category::Sports),
            "OTHER" => Ok(Category::Other),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

/// A figure as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funko {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub release_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Arguments for creating or fully replacing a figure. The storage layer
/// assigns id, uuid and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct FunkoArgs {
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub release_date: NaiveDate,
}

/// Partial change set for a figure; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunkoChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<Category>,
    pub release_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&Category::VideoGames).unwrap();
        assert_eq!(json, "\"VIDEO_GAMES\"");

        let parsed: Category = serde_json::from_str("\"COMICS\"").unwrap();
        assert_eq!(parsed, Category::Comics);
    }

    #[test]
    fn category_round_trips_through_str() {
        for category in [
            Category::Movies,
            Category::Series,
            Category::VideoGames,
            Category::Comics,
            Category::Music,
            Category::Sports,
            Category::Other,
        ] {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn unknown_category_fails_to_parse() {
        let err = "GADGETS".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("GADGETS"));
    }

    #[test]
    fn unknown_category_fails_to_deserialize() {
        assert!(serde_json::from_str::<Category>("\"GADGETS\"").is_err());
    }
}
