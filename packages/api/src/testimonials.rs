// ABOUTME: HTTP request handlers for testimonial operations
// ABOUTME: Public listing plus admin CRUD

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use storefront_catalog::{Testimonial, TestimonialFilter, TestimonialInput};
use storefront_core::PaginatedResponse;
use tracing::info;

use crate::error::{ApiJson, ApiQuery, ApiResult};
use crate::response::{ApiResponse, Listing, PageQuery};
use crate::state::AppState;

pub async fn list_public_testimonials(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TestimonialFilter>,
) -> ApiResult<Json<ApiResponse<Vec<Testimonial>>>> {
    let testimonials = state.testimonials.list_testimonials(&filter).await?;
    Ok(Json(ApiResponse::success(testimonials)))
}

pub async fn list_testimonials(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TestimonialFilter>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResult<Json<ApiResponse<Listing<Testimonial>>>> {
    let listing = match page.params() {
        Some(params) => {
            let (testimonials, total) = state
                .testimonials
                .list_testimonials_paginated(&filter, &params)
                .await?;
            Listing::Page(PaginatedResponse::new(testimonials, &params, total))
        }
        None => Listing::All(state.testimonials.list_testimonials(&filter).await?),
    };

    Ok(Json(ApiResponse::success(listing)))
}

pub async fn get_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Testimonial>>> {
    let testimonial = state.testimonials.get_testimonial(&id).await?;
    Ok(Json(ApiResponse::success(testimonial)))
}

pub async fn create_testimonial(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TestimonialInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Testimonial>>)> {
    info!("Creating testimonial from '{}'", input.client_name);

    let testimonial = state.testimonials.create_testimonial(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(testimonial))))
}

pub async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TestimonialInput>,
) -> ApiResult<Json<ApiResponse<Testimonial>>> {
    info!("Updating testimonial: {}", id);

    let testimonial = state.testimonials.update_testimonial(&id, input).await?;
    Ok(Json(ApiResponse::success(testimonial)))
}

pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<String>>> {
    info!("Deleting testimonial: {}", id);

    state.testimonials.delete_testimonial(&id).await?;
    Ok(Json(ApiResponse::success(id)))
}
