// ABOUTME: Product storage layer using SQLite
// ABOUTME: Whole-document CRUD with category filter and substring search

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use storefront_core::{generate_id, like_pattern, PaginationParams};
use storefront_storage::{StorageError, StorageResult};

use crate::types::{Product, ProductCategory, ProductFilter, ProductInput};
use crate::validation::validate_product;

pub struct ProductStorage {
    pool: SqlitePool,
}

impl ProductStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List products, newest first
    pub async fn list_products(&self, filter: &ProductFilter) -> StorageResult<Vec<Product>> {
        let (products, _) = self.query_products(filter, None).await?;
        Ok(products)
    }

    /// List one page of products plus the total number of matches
    pub async fn list_products_paginated(
        &self,
        filter: &ProductFilter,
        params: &PaginationParams,
    ) -> StorageResult<(Vec<Product>, i64)> {
        self.query_products(filter, Some(params)).await
    }

    async fn query_products(
        &self,
        filter: &ProductFilter,
        page: Option<&PaginationParams>,
    ) -> StorageResult<(Vec<Product>, i64)> {
        debug!(
            "Fetching products (category: {:?}, search: {:?})",
            filter.category, filter.search
        );

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM products");
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
        let products = rows
            .iter()
            .map(row_to_product)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((products, total))
    }

    pub async fn get_product(&self, id: &str) -> StorageResult<Product> {
        debug!("Fetching product: {}", id);

        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound("Product"))?;

        row_to_product(&row)
    }

    pub async fn create_product(&self, input: ProductInput) -> StorageResult<Product> {
        let input = validate_product(input)?;
        let id = generate_id("prod");
        let images = serde_json::to_string(&input.images)?;

        debug!("Creating product: {} (name: {})", id, input.name);

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, category, images, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category.as_str())
        .bind(images)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get_product(&id).await
    }

    /// Replace every editable field; last write wins
    pub async fn update_product(&self, id: &str, input: ProductInput) -> StorageResult<Product> {
        let input = validate_product(input)?;
        let images = serde_json::to_string(&input.images)?;

        debug!("Updating product: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, category = ?, images = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category.as_str())
        .bind(images)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Product"));
        }

        self.get_product(id).await
    }

    pub async fn delete_product(&self, id: &str) -> StorageResult<()> {
        debug!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Product"));
        }

        Ok(())
    }

    pub async fn count_products(&self, category: Option<ProductCategory>) -> StorageResult<i64> {
        let filter = ProductFilter {
            category,
            search: None,
        };
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut query, &filter);

        Ok(query.build_query_scalar().fetch_one(&self.pool).await?)
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(category) = filter.category {
        query.push(" AND category = ").push_bind(category.as_str());
    }

    if let Some(pattern) = filter.search.as_deref().and_then(like_pattern) {
        query
            .push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR description LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

fn row_to_product(row: &SqliteRow) -> StorageResult<Product> {
    let category: String = row.try_get("category")?;
    let images: String = row.try_get("images")?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: category.parse().map_err(StorageError::InvalidData)?,
        images: serde_json::from_str(&images)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
