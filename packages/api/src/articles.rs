// ABOUTME: HTTP request handlers for article operations
// ABOUTME: Admin CRUD with publish/unpublish, and the public published-only views

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use storefront_articles::{Article, ArticleCategory, ArticleFilter, ArticleInput};
use storefront_core::PaginatedResponse;
use tracing::info;

use crate::error::{ApiJson, ApiQuery, ApiResult};
use crate::response::{ApiResponse, Listing, PageQuery};
use crate::state::AppState;

/// Query for the public article listing. The page size is fixed.
#[derive(Debug, Default, Deserialize)]
pub struct PublicArticleQuery {
    pub page: Option<i64>,
    pub category: Option<ArticleCategory>,
    pub q: Option<String>,
}

pub async fn list_public_articles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PublicArticleQuery>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Article>>>> {
    let filter = ArticleFilter {
        status: None,
        category: query.category,
        search: query.q,
    };

    let page = state.articles.list_published(&filter, query.page).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_public_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiResponse<Article>>> {
    let article = state.articles.get_published_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(article)))
}

pub async fn list_articles(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ArticleFilter>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResult<Json<ApiResponse<Listing<Article>>>> {
    let listing = match page.params() {
        Some(params) => {
            info!("Listing articles (page: {})", params.page());
            let (articles, total) = state
                .articles
                .list_articles_paginated(&filter, &params)
                .await?;
            Listing::Page(PaginatedResponse::new(articles, &params, total))
        }
        None => Listing::All(state.articles.list_articles(&filter).await?),
    };

    Ok(Json(ApiResponse::success(listing)))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Article>>> {
    let article = state.articles.get_article(&id).await?;
    Ok(Json(ApiResponse::success(article)))
}

pub async fn create_article(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ArticleInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Article>>)> {
    info!("Creating article '{}' ({})", input.title, input.status);

    let article = state.articles.create_article(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(article))))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ArticleInput>,
) -> ApiResult<Json<ApiResponse<Article>>> {
    info!("Updating article: {}", id);

    let article = state.articles.update_article(&id, input).await?;
    Ok(Json(ApiResponse::success(article)))
}

pub async fn publish_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Article>>> {
    info!("Publishing article: {}", id);

    let article = state.articles.publish_article(&id).await?;
    Ok(Json(ApiResponse::success(article)))
}

pub async fn unpublish_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Article>>> {
    info!("Unpublishing article: {}", id);

    let article = state.articles.unpublish_article(&id).await?;
    Ok(Json(ApiResponse::success(article)))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<String>>> {
    info!("Deleting article: {}", id);

    state.articles.delete_article(&id).await?;
    Ok(Json(ApiResponse::success(id)))
}
