use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::{Category, Funko, FunkoArgs, FunkoChanges};

/// Longest name the catalog accepts.
pub const MAX_NAME_LEN: usize = 100;

/// Per-field validation messages, keyed by the wire name of the field.
pub type FieldErrors = BTreeMap<String, String>;

/// Incoming payload for create (POST) and full update (PUT).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunkoRequest {
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub release_date: NaiveDate,
}

impl FunkoRequest {
    pub fn validate(&self) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_name(&self.name, &mut errors);
        check_price(self.price, &mut errors);
        check_release_date(self.release_date, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn into_args(self) -> FunkoArgs {
        FunkoArgs {
            name: self.name,
            price: self.price,
            category: self.category,
            release_date: self.release_date,
        }
    }
}

/// Incoming payload for partial update (PATCH). Absent fields keep their
/// stored values, so every field is optional and only present ones are
/// validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunkoPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<Category>,
    pub release_date: Option<NaiveDate>,
}

impl FunkoPatch {
    pub fn validate(&self) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        if let Some(price) = self.price {
            check_price(price, &mut errors);
        }
        if let Some(release_date) = self.release_date {
            check_release_date(release_date, &mut errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn into_changes(self) -> FunkoChanges {
        FunkoChanges {
            name: self.name,
            price: self.price,
            category: self.category,
            release_date: self.release_date,
        }
    }
}

/// Outgoing representation of a stored figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunkoResponse {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub release_date: NaiveDate,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<&Funko> for FunkoResponse {
    fn from(funko: &Funko) -> Self {
        Self {
            id: funko.id,
            uuid: funko.uuid,
            name: funko.name.clone(),
            price: funko.price,
            category: funko.category,
            release_date: funko.release_date,
            created_at: funko.created_at,
            updated_at: funko.updated_at,
        }
    }
}

fn check_name(name: &str, errors: &mut FieldErrors) {
    if name.trim().is_empty() {
        errors.insert("name".to_string(), "name must not be blank".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.insert(
            "name".to_string(),
            format!("name must not exceed {} characters", MAX_NAME_LEN),
        );
    }
}

fn check_price(price: f64, errors: &mut FieldErrors) {
    if price <= 0.0 {
        errors.insert("price".to_string(), "price must be greater than 0".to_string());
    }
}

fn check_release_date(release_date: NaiveDate, errors: &mut FieldErrors) {
    if release_date > Utc::now().date_naive() {
        errors.insert(
            "releaseDate".to_string(),
            "release date must not be in the future".to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn valid_request() -> FunkoRequest {
        FunkoRequest {
            name: "Spider-Man Classic".to_string(),
            price: 19.99,
            category: Category::Comics,
            release_date: NaiveDate::from_ymd_opt(2020, 5, 12).unwrap(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut request = valid_request();
        request.name = "   ".to_string();
        let errors = request.validate().unwrap_err();
        assert_eq!(errors["name"], "name must not be blank");
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut request = valid_request();
        request.name = "x".repeat(MAX_NAME_LEN + 1);
        let errors = request.validate().unwrap_err();
        assert!(errors["name"].contains("100"));
    }

    #[test]
    fn name_at_limit_is_accepted() {
        let mut request = valid_request();
        request.name = "x".repeat(MAX_NAME_LEN);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let mut request = valid_request();
        request.price = 0.0;
        assert!(request.validate().unwrap_err().contains_key("price"));

        request.price = -3.5;
        assert!(request.validate().unwrap_err().contains_key("price"));
    }

    #[test]
    fn future_release_date_is_rejected() {
        let mut request = valid_request();
        request.release_date = Utc::now().date_naive() + Days::new(1);
        let errors = request.validate().unwrap_err();
        assert!(errors.contains_key("releaseDate"));
    }

    #[test]
    fn today_is_a_valid_release_date() {
        let mut request = valid_request();
        request.release_date = Utc::now().date_naive();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn multiple_failures_are_collected() {
        let request = FunkoRequest {
            name: "".to_string(),
            price: -1.0,
            category: Category::Other,
            release_date: Utc::now().date_naive() + Days::new(7),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(FunkoPatch::default().validate().is_ok());
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = FunkoPatch {
            price: Some(-2.0),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("price"));
    }

    #[test]
    fn request_deserializes_camel_case() {
        let request: FunkoRequest = serde_json::from_str(
            r#"{"name":"Pikachu","price":24.5,"category":"VIDEO_GAMES","releaseDate":"2021-07-21"}"#,
        )
        .unwrap();
        assert_eq!(request.category, Category::VideoGames);
        assert_eq!(
            request.release_date,
            NaiveDate::from_ymd_opt(2021, 7, 21).unwrap()
        );
    }
}
