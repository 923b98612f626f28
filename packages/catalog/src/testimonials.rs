// ABOUTME: Testimonial storage layer using SQLite
// ABOUTME: Handles CRUD operations for client testimonials

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use storefront_core::{generate_id, like_pattern, PaginationParams};
use storefront_storage::{StorageError, StorageResult};

use crate::types::{Testimonial, TestimonialFilter, TestimonialInput};
use crate::validation::validate_testimonial;

pub struct TestimonialStorage {
    pool: SqlitePool,
}

impl TestimonialStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_testimonials(
        &self,
        filter: &TestimonialFilter,
    ) -> StorageResult<Vec<Testimonial>> {
        let (testimonials, _) = self.query_testimonials(filter, None).await?;
        Ok(testimonials)
    }

    pub async fn list_testimonials_paginated(
        &self,
        filter: &TestimonialFilter,
        params: &PaginationParams,
    ) -> StorageResult<(Vec<Testimonial>, i64)> {
        self.query_testimonials(filter, Some(params)).await
    }

    async fn query_testimonials(
        &self,
        filter: &TestimonialFilter,
        page: Option<&PaginationParams>,
    ) -> StorageResult<(Vec<Testimonial>, i64)> {
        debug!("Fetching testimonials (search: {:?})", filter.search);

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM testimonials");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM testimonials");
        push_filter(&mut query, filter);
        query.push(" ORDER BY created_at DESC, rowid DESC");
        if let Some(params) = page {
            query
                .push(" LIMIT ")
                .push_bind(params.limit())
                .push(" OFFSET ")
                .push_bind(params.offset());
        }

        let rows = query.build().fetch_all(&self.pool).await?;
        let testimonials = rows
            .iter()
            .map(row_to_testimonial)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((testimonials, total))
    }

    pub async fn get_testimonial(&self, id: &str) -> StorageResult<Testimonial> {
        debug!("Fetching testimonial: {}", id);

        let row = sqlx::query("SELECT * FROM testimonials WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound("Testimonial"))?;

        row_to_testimonial(&row)
    }

    pub async fn create_testimonial(&self, input: TestimonialInput) -> StorageResult<Testimonial> {
        let input = validate_testimonial(input)?;
        let id = generate_id("tsm");

        debug!("Creating testimonial: {} (client: {})", id, input.client_name);

        sqlx::query(
            r#"
            INSERT INTO testimonials (id, client_name, content, image, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.client_name)
        .bind(&input.content)
        .bind(&input.image)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get_testimonial(&id).await
    }

    pub async fn update_testimonial(
        &self,
        id: &str,
        input: TestimonialInput,
    ) -> StorageResult<Testimonial> {
        let input = validate_testimonial(input)?;

        debug!("Updating testimonial: {}", id);

        let result = sqlx::query(
            "UPDATE testimonials SET client_name = ?, content = ?, image = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&input.client_name)
        .bind(&input.content)
        .bind(&input.image)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Testimonial"));
        }

        self.get_testimonial(id).await
    }

    pub async fn delete_testimonial(&self, id: &str) -> StorageResult<()> {
        debug!("Deleting testimonial: {}", id);

        let result = sqlx::query("DELETE FROM testimonials WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Testimonial"));
        }

        Ok(())
    }

    pub async fn count_testimonials(&self) -> StorageResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM testimonials")
            .fetch_one(&self.pool)
            .await?)
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &TestimonialFilter) {
    if let Some(pattern) = filter.search.as_deref().and_then(like_pattern) {
        query
            .push(" WHERE client_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR content LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\'");
    }
}

fn row_to_testimonial(row: &SqliteRow) -> StorageResult<Testimonial> {
    Ok(Testimonial {
        id: row.try_get("id")?,
        client_name: row.try_get("client_name")?,
        content: row.try_get("content")?,
        image: row.try_get("image")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
