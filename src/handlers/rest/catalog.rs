//! Category and product handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{errmsg, ApiError, AppState};
use crate::models::{Category, CategoryInput, Product, ProductInput, ProductWithCategory};
use crate::storage::ProductFilter;
use crate::validation::parse_id;

// ============================================================================
// Categories
// ============================================================================

pub(super) async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.catalog.list_categories().await?))
}

pub(super) async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(input) = payload?;
    let category = state.catalog.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub(super) async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, "category")?;
    Ok(Json(state.catalog.get_category(id).await?))
}

pub(super) async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_id(&id, "category")?;
    let Json(input) = payload?;
    Ok(Json(state.catalog.update_category(id, input).await?))
}

pub(super) async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "category")?;
    state.catalog.delete_category(id).await?;
    Ok(Json(json!({ "message": errmsg::CATEGORY_DELETED })))
}

pub(super) async fn list_category_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductWithCategory>>, ApiError> {
    let id = parse_id(&id, "category")?;
    Ok(Json(state.catalog.list_products_in_category(id).await?))
}

// ============================================================================
// Products
// ============================================================================

/// Query string for product listing. Values arrive as strings so a bad
/// `category_id` yields the JSON error envelope instead of a plain rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ProductQuery {
    name: Option<String>,
    category_id: Option<String>,
}

impl ProductQuery {
    fn into_filter(self) -> Result<ProductFilter, ApiError> {
        let category_id = match self.category_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| ApiError::bad_request(errmsg::CATEGORY_FILTER_INVALID))?,
            ),
        };
        let name = self.name.filter(|n| !n.trim().is_empty());
        Ok(ProductFilter { name, category_id })
    }
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductWithCategory>>, ApiError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    Ok(Json(state.catalog.list_products(&filter).await?))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(input) = payload?;
    let product = state.catalog.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductWithCategory>, ApiError> {
    let id = parse_id(&id, "product")?;
    Ok(Json(state.catalog.get_product(id).await?))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id, "product")?;
    let Json(input) = payload?;
    Ok(Json(state.catalog.update_product(id, input).await?))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "product")?;
    state.catalog.delete_product(id).await?;
    Ok(Json(json!({ "message": errmsg::PRODUCT_DELETED })))
}
