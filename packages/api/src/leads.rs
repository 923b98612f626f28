// ABOUTME: HTTP request handlers for lead operations
// ABOUTME: Public catalogue-access form plus admin triage and WhatsApp follow-up

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use storefront_core::PaginatedResponse;
use storefront_leads::{ContactLink, Lead, LeadFilter, LeadStatus, LeadSubmission, Panggilan};
use tracing::info;

use crate::error::{ApiJson, ApiQuery, ApiResult};
use crate::response::{ApiResponse, Listing, PageQuery};
use crate::state::AppState;

/// Catalogue-access form. Validation messages are returned per field.
pub async fn submit_lead(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<LeadSubmission>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Lead>>)> {
    let lead = state.leads.create_lead(submission).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(lead))))
}

pub async fn list_leads(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<LeadFilter>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResult<Json<ApiResponse<Listing<Lead>>>> {
    let listing = match page.params() {
        Some(params) => {
            info!("Listing leads (page: {})", params.page());
            let (leads, total) = state.leads.list_leads_paginated(&filter, &params).await?;
            Listing::Page(PaginatedResponse::new(leads, &params, total))
        }
        None => Listing::All(state.leads.list_leads(&filter).await?),
    };

    Ok(Json(ApiResponse::success(listing)))
}

pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Lead>>> {
    let lead = state.leads.get_lead(&id).await?;
    Ok(Json(ApiResponse::success(lead)))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: LeadStatus,
}

pub async fn update_lead_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<StatusRequest>,
) -> ApiResult<Json<ApiResponse<Lead>>> {
    let lead = state.leads.update_status(&id, request.status).await?;
    Ok(Json(ApiResponse::success(lead)))
}

#[derive(Deserialize)]
pub struct PanggilanRequest {
    pub panggilan: Panggilan,
}

pub async fn update_lead_panggilan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PanggilanRequest>,
) -> ApiResult<Json<ApiResponse<Lead>>> {
    let lead = state.leads.update_panggilan(&id, request.panggilan).await?;
    Ok(Json(ApiResponse::success(lead)))
}

/// Returns the wa.me link; a `new` lead becomes `contacted`
pub async fn contact_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ContactLink>>> {
    info!("Opening WhatsApp contact for lead: {}", id);

    let link = state
        .leads
        .contact_via_whatsapp(&id, &state.whatsapp)
        .await?;
    Ok(Json(ApiResponse::success(link)))
}
