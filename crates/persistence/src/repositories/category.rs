//! Category repository for database operations.

use domain::models::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CategoryEntity;
use crate::metrics::QueryTimer;

/// Repository for menu category database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List categories of a business in display order.
    pub async fn list_by_business(&self, business_id: Uuid) -> Result<Vec<Category>, sqlx::Error> {
        let timer = QueryTimer::new("list_categories");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            SELECT id, business_id, name, description, position, created_at, updated_at
            FROM categories
            WHERE business_id = $1
            ORDER BY position, created_at
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result?.into_iter().map(Into::into).collect())
    }

    /// Find a category scoped to its business.
    pub async fn find(
        &self,
        business_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, sqlx::Error> {
        let timer = QueryTimer::new("find_category");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            SELECT id, business_id, name, description, position, created_at, updated_at
            FROM categories
            WHERE id = $1 AND business_id = $2
            "#,
        )
        .bind(category_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Create a category. Without a position it goes last.
    pub async fn create(
        &self,
        business_id: Uuid,
        request: &CreateCategoryRequest,
    ) -> Result<Category, sqlx::Error> {
        let timer = QueryTimer::new("create_category");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            INSERT INTO categories (business_id, name, description, position)
            VALUES (
                $1, $2, $3,
                COALESCE($4, (SELECT COALESCE(MAX(position) + 1, 0) FROM categories WHERE business_id = $1))
            )
            RETURNING id, business_id, name, description, position, created_at, updated_at
            "#,
        )
        .bind(business_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.position)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?.into())
    }

    /// Update a category.
    pub async fn update(
        &self,
        business_id: Uuid,
        category_id: Uuid,
        request: &UpdateCategoryRequest,
    ) -> Result<Option<Category>, sqlx::Error> {
        let timer = QueryTimer::new("update_category");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"
            UPDATE categories
            SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                position = COALESCE($5, position),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING id, business_id, name, description, position, created_at, updated_at
            "#,
        )
        .bind(category_id)
        .bind(business_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.position)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Delete a category and, by cascade, its items.
    pub async fn delete(&self, business_id: Uuid, category_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_category");
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND business_id = $2")
            .bind(category_id)
            .bind(business_id)
            .execute(&self.pool)
            .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }
}
