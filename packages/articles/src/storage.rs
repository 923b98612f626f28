// ABOUTME: Article storage layer using SQLite
// ABOUTME: CRUD plus the draft/published transitions and unique slug allocation

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use storefront_core::{
    generate_id, like_pattern, PaginatedResponse, PaginationParams, ARTICLES_PER_PAGE,
};
use storefront_storage::{is_unique_violation, StorageError, StorageResult};

use crate::slug::{slugify, with_suffix};
use crate::types::{Article, ArticleFilter, ArticleInput, ArticleStatus, UnpublishPolicy};
use crate::validation::validate_article;

/// Upper bound on suffixed slug attempts before giving up
const MAX_SLUG_ATTEMPTS: i64 = 5;

pub struct ArticleStorage {
    pool: SqlitePool,
    unpublish_policy: UnpublishPolicy,
}

impl ArticleStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_policy(pool, UnpublishPolicy::default())
    }

    pub fn with_policy(pool: SqlitePool, unpublish_policy: UnpublishPolicy) -> Self {
        Self {
            pool,
            unpublish_policy,
        }
    }

    pub fn unpublish_policy(&self) -> UnpublishPolicy {
        self.unpublish_policy
    }

    /// List articles, most recently published (or created) first
    pub async fn list_articles(&self, filter: &ArticleFilter) -> StorageResult<Vec<Article>> {
        let (articles, _) = self.query_articles(filter, None).await?;
        Ok(articles)
    }

    pub async fn list_articles_paginated(
        &self,
        filter: &ArticleFilter,
        params: &PaginationParams,
    ) -> StorageResult<(Vec<Article>, i64)> {
        self.query_articles(filter, Some(params)).await
    }

    /// Public listing: published articles only, fixed page size
    pub async fn list_published(
        &self,
        filter: &ArticleFilter,
        page: Option<i64>,
    ) -> StorageResult<PaginatedResponse<Article>> {
        let filter = ArticleFilter {
            status: Some(ArticleStatus::Published),
            ..filter.clone()
        };
        let params = PaginationParams::fixed(page, ARTICLES_PER_PAGE);
        let (articles, total) = self.query_articles(&filter, Some(&params)).await?;

        Ok(PaginatedResponse::new(articles, &params, total))
    }

    async fn query_articles(
        &self,
        filter: &ArticleFilter,
        page: Option<&PaginationParams>,
    ) -> StorageResult<(Vec<Article>, i64)> {
        debug!(
            "Fetching articles (status: {:?}, category: {:?}, search: {:?})",
            filter.status, filter.category, filter.search
        );

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM articles");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM articles");
        push_filter(&mut query, filter);
        query.push(" ORDER BY COALESCE(published_at, created_at) DESC, rowid DESC");
        if let Some(params) = page {
            query
                .push(" LIMIT ")
                .push_bind(params.limit())
                .push(" OFFSET ")
                .push_bind(params.offset());
        }

        let rows = query.build().fetch_all(&self.pool).await?;
        let articles = rows
            .iter()
            .map(row_to_article)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((articles, total))
    }

    pub async fn get_article(&self, id: &str) -> StorageResult<Article> {
        debug!("Fetching article: {}", id);

        let row = sqlx::query("SELECT * FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound("Article"))?;

        row_to_article(&row)
    }

    /// Drafts are invisible to this lookup
    pub async fn get_published_by_slug(&self, slug: &str) -> StorageResult<Article> {
        debug!("Fetching published article by slug: {}", slug);

        let row = sqlx::query("SELECT * FROM articles WHERE slug = ? AND status = ?")
            .bind(slug)
            .bind(ArticleStatus::Published.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound("Article"))?;

        row_to_article(&row)
    }

    pub async fn create_article(&self, input: ArticleInput) -> StorageResult<Article> {
        let input = validate_article(input)?;
        let id = generate_id("art");
        let now = Utc::now();
        let published_at = (input.status == ArticleStatus::Published).then_some(now);

        let base = slugify(&input.title);
        let mut slug = base.clone();
        let mut attempt = 0;

        loop {
            if !self.slug_exists(&slug).await? {
                match self
                    .insert_article(&id, &slug, &input, published_at, now)
                    .await
                {
                    Ok(()) => break,
                    Err(e) if is_unique_violation(&e) => {
                        debug!("Slug '{}' taken concurrently, retrying", slug);
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            if attempt >= MAX_SLUG_ATTEMPTS {
                return Err(StorageError::Conflict(format!(
                    "could not allocate a unique slug for '{}'",
                    base
                )));
            }
            slug = with_suffix(&base, Utc::now().timestamp_millis() + attempt);
            attempt += 1;
        }

        info!("Created article {} with slug '{}'", id, slug);
        self.get_article(&id).await
    }

    async fn slug_exists(&self, slug: &str) -> StorageResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn insert_article(
        &self,
        id: &str,
        slug: &str,
        input: &ArticleInput,
        published_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO articles (
                id, title, slug, content, excerpt, cover_image, category, status,
                published_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(slug)
        .bind(&input.content)
        .bind(&input.excerpt)
        .bind(&input.cover_image)
        .bind(input.category.as_str())
        .bind(input.status.as_str())
        .bind(published_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace the editable fields. The slug never changes; a status change
    /// follows the same timestamp rules as publish/unpublish.
    pub async fn update_article(&self, id: &str, input: ArticleInput) -> StorageResult<Article> {
        let input = validate_article(input)?;
        let current = self.get_article(id).await?;
        let now = Utc::now();
        let published_at = self.published_at_after(&current, input.status, now);

        debug!("Updating article: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE articles
            SET title = ?, content = ?, excerpt = ?, cover_image = ?, category = ?,
                status = ?, published_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.excerpt)
        .bind(&input.cover_image)
        .bind(input.category.as_str())
        .bind(input.status.as_str())
        .bind(published_at)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Article"));
        }

        self.get_article(id).await
    }

    pub async fn publish_article(&self, id: &str) -> StorageResult<Article> {
        let current = self.get_article(id).await?;
        if current.status == ArticleStatus::Published {
            return Err(StorageError::InvalidTransition(
                "Article is already published".to_string(),
            ));
        }

        info!("Publishing article: {}", id);
        self.set_status(&current, ArticleStatus::Published).await
    }

    pub async fn unpublish_article(&self, id: &str) -> StorageResult<Article> {
        let current = self.get_article(id).await?;
        if current.status == ArticleStatus::Draft {
            return Err(StorageError::InvalidTransition(
                "Article is not published".to_string(),
            ));
        }

        info!("Unpublishing article: {}", id);
        self.set_status(&current, ArticleStatus::Draft).await
    }

    async fn set_status(&self, current: &Article, status: ArticleStatus) -> StorageResult<Article> {
        let now = Utc::now();
        let published_at = self.published_at_after(current, status, now);

        let result = sqlx::query(
            "UPDATE articles SET status = ?, published_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(published_at)
        .bind(now)
        .bind(&current.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Article"));
        }

        self.get_article(&current.id).await
    }

    fn published_at_after(
        &self,
        current: &Article,
        status: ArticleStatus,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match (current.status, status) {
            (ArticleStatus::Draft, ArticleStatus::Published) => Some(now),
            (ArticleStatus::Published, ArticleStatus::Draft) => match self.unpublish_policy {
                UnpublishPolicy::Retain => current.published_at,
                UnpublishPolicy::Clear => None,
            },
            _ => current.published_at,
        }
    }

    pub async fn delete_article(&self, id: &str) -> StorageResult<()> {
        debug!("Deleting article: {}", id);

        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Article"));
        }

        Ok(())
    }

    pub async fn count_by_status(&self, status: Option<ArticleStatus>) -> StorageResult<i64> {
        let filter = ArticleFilter {
            status,
            ..Default::default()
        };
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM articles");
        push_filter(&mut query, &filter);

        Ok(query.build_query_scalar().fetch_one(&self.pool).await?)
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &ArticleFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(category) = filter.category {
        query.push(" AND category = ").push_bind(category.as_str());
    }

    if let Some(pattern) = filter.search.as_deref().and_then(like_pattern) {
        query
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR content LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR excerpt LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

fn row_to_article(row: &SqliteRow) -> StorageResult<Article> {
    let category: String = row.try_get("category")?;
    let status: String = row.try_get("status")?;

    Ok(Article {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        content: row.try_get("content")?,
        excerpt: row.try_get("excerpt")?,
        cover_image: row.try_get("cover_image")?,
        category: category.parse().map_err(StorageError::InvalidData)?,
        status: status.parse().map_err(StorageError::InvalidData)?,
        published_at: row.try_get("published_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
