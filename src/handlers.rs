use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::dto::{FunkoPatch, FunkoRequest, FunkoResponse};
use crate::error::FunkoApiError;
use crate::models::Category;
use crate::repository::FunkoFilter;
use crate::server::AppState;

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub max_price: Option<f64>,
}

impl ListParams {
    fn into_filter(self) -> FunkoFilter {
        FunkoFilter {
            name_contains: self.name,
            category: self.category,
            max_price: self.max_price,
        }
    }
}

pub async fn list_funkos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<FunkoResponse>>, FunkoApiError> {
    let funkos = state.service.list(&params.into_filter()).await?;
    Ok(Json(funkos.iter().map(FunkoResponse::from).collect()))
}

pub async fn get_funko(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FunkoResponse>, FunkoApiError> {
    let funko = state.service.get(id).await?;
    Ok(Json(FunkoResponse::from(&funko)))
}

pub async fn create_funko(
    State(state): State<AppState>,
    Json(request): Json<FunkoRequest>,
) -> Result<Response, FunkoApiError> {
    let funko = state.service.create(request).await?;
    let location = format!("/funkos/{}", funko.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(FunkoResponse::from(&funko)),
    )
        .into_response())
}

pub async fn update_funko(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<FunkoRequest>,
) -> Result<Json<FunkoResponse>, FunkoApiError> {
    let funko = state.service.update(id, request).await?;
    Ok(Json(FunkoResponse::from(&funko)))
}

pub async fn patch_funko(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<FunkoPatch>,
) -> Result<Json<FunkoResponse>, FunkoApiError> {
    let funko = state.service.patch(id, patch).await?;
    Ok(Json(FunkoResponse::from(&funko)))
}

pub async fn delete_funko(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, FunkoApiError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
