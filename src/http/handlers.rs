//! Request handlers. Each one builds a command or query, dispatches it with
//! a per-request cancellation token, and returns the result as JSON.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::error::ApiResult;
use super::AppState;
use crate::domain::ProductDto;
use crate::product::{
    CreateProductCommand, DeleteProductCommand, GetAllProductsQuery, GetProductByIdQuery,
    UpdateProductCommand,
};

/// `?id=` parameter. Left optional so a missing id reaches the validators.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<i32>,
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<ProductDto>> {
    let cancel = state.request_token();
    let product = state
        .mediator
        .send(GetProductByIdQuery { id: query.id }, &cancel)
        .await?;
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn get_all_products(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Option<ProductDto>>>> {
    let cancel = state.request_token();
    let products = state.mediator.send(GetAllProductsQuery, &cancel).await?;
    debug!(count = products.len(), "Returning products");
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(product): Json<Option<ProductDto>>,
) -> ApiResult<Json<ProductDto>> {
    let cancel = state.request_token();
    let created = state
        .mediator
        .send(CreateProductCommand { product }, &cancel)
        .await?;
    Ok(Json(created))
}

#[instrument(skip(state))]
pub async fn update_product(
    State(state): State<AppState>,
    Json(product): Json<Option<ProductDto>>,
) -> ApiResult<Json<Option<ProductDto>>> {
    let cancel = state.request_token();
    let updated = state
        .mediator
        .send(UpdateProductCommand { product }, &cancel)
        .await?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<Option<ProductDto>>> {
    let cancel = state.request_token();
    let deleted = state
        .mediator
        .send(DeleteProductCommand { id: query.id }, &cancel)
        .await?;
    Ok(Json(deleted))
}
