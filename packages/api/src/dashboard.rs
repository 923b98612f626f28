use axum::{extract::State, Json};
use serde::Serialize;
use storefront_articles::ArticleStatus;
use storefront_catalog::ProductCategory;
use storefront_leads::LeadStatus;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProductCounts {
    pub total: i64,
    pub clothing: i64,
    pub safety: i64,
}

#[derive(Debug, Serialize)]
pub struct ArticleCounts {
    pub total: i64,
    pub draft: i64,
    pub published: i64,
}

#[derive(Debug, Serialize)]
pub struct LeadCounts {
    pub total: i64,
    pub new: i64,
    pub contacted: i64,
    pub closed: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub products: ProductCounts,
    pub articles: ArticleCounts,
    pub testimonials: i64,
    pub leads: LeadCounts,
}

/// Record counts for the admin landing page
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<DashboardSummary>>> {
    let products = ProductCounts {
        total: state.products.count_products(None).await?,
        clothing: state
            .products
            .count_products(Some(ProductCategory::Clothing))
            .await?,
        safety: state
            .products
            .count_products(Some(ProductCategory::Safety))
            .await?,
    };

    let articles = ArticleCounts {
        total: state.articles.count_by_status(None).await?,
        draft: state
            .articles
            .count_by_status(Some(ArticleStatus::Draft))
            .await?,
        published: state
            .articles
            .count_by_status(Some(ArticleStatus::Published))
            .await?,
    };

    let leads = LeadCounts {
        total: state.leads.count_by_status(None).await?,
        new: state.leads.count_by_status(Some(LeadStatus::New)).await?,
        contacted: state
            .leads
            .count_by_status(Some(LeadStatus::Contacted))
            .await?,
        closed: state.leads.count_by_status(Some(LeadStatus::Closed)).await?,
    };

    Ok(Json(ApiResponse::success(DashboardSummary {
        products,
        articles,
        testimonials: state.testimonials.count_testimonials().await?,
        leads,
    })))
}
