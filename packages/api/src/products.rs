// ABOUTME: HTTP request handlers for product operations
// ABOUTME: Public catalogue listing plus admin CRUD

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use storefront_catalog::{Product, ProductFilter, ProductInput};
use storefront_core::PaginatedResponse;
use tracing::info;

use crate::error::{ApiJson, ApiQuery, ApiResult};
use crate::response::{ApiResponse, Listing, PageQuery};
use crate::state::AppState;

/// Public catalogue: every product, filtered by category and search
pub async fn list_public_products(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> ApiResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.products.list_products(&filter).await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResult<Json<ApiResponse<Listing<Product>>>> {
    let listing = match page.params() {
        Some(params) => {
            info!("Listing products (page: {})", params.page());
            let (products, total) = state
                .products
                .list_products_paginated(&filter, &params)
                .await?;
            Listing::Page(PaginatedResponse::new(products, &params, total))
        }
        None => Listing::All(state.products.list_products(&filter).await?),
    };

    Ok(Json(ApiResponse::success(listing)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let product = state.products.get_product(&id).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    info!("Creating product '{}'", input.name);

    let product = state.products.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    info!("Updating product: {}", id);

    let product = state.products.update_product(&id, input).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<String>>> {
    info!("Deleting product: {}", id);

    state.products.delete_product(&id).await?;
    Ok(Json(ApiResponse::success(id)))
}
