//! Menu item repository for database operations.

use domain::models::{CreateMenuItemRequest, MenuItem, UpdateMenuItemRequest};
use shared::validation::clearable;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MenuItemEntity;
use crate::metrics::QueryTimer;

const ITEM_COLUMNS: &str = "id, category_id, business_id, name, description, price::TEXT AS price, \
     image_url, is_available, position, created_at, updated_at";

/// Repository for menu item database operations.
#[derive(Clone)]
pub struct MenuItemRepository {
    pool: PgPool,
}

impl MenuItemRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List items of a business in display order.
    pub async fn list_by_business(
        &self,
        business_id: Uuid,
        only_available: bool,
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        let timer = QueryTimer::new("list_menu_items");
        let result = sqlx::query_as::<_, MenuItemEntity>(&format!(
            r#"
            SELECT {}
            FROM menu_items
            WHERE business_id = $1 AND (NOT $2 OR is_available)
            ORDER BY position, created_at
            "#,
            ITEM_COLUMNS
        ))
        .bind(business_id)
        .bind(only_available)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result?.into_iter().map(Into::into).collect())
    }

    /// Create an item in a category. Without a position it goes last.
    pub async fn create(
        &self,
        business_id: Uuid,
        category_id: Uuid,
        request: &CreateMenuItemRequest,
    ) -> Result<MenuItem, sqlx::Error> {
        let timer = QueryTimer::new("create_menu_item");
        let result = sqlx::query_as::<_, MenuItemEntity>(&format!(
            r#"
            INSERT INTO menu_items (category_id, business_id, name, description, price, image_url, is_available, position)
            VALUES (
                $1, $2, $3, $4, $5::NUMERIC, $6, COALESCE($7, true),
                COALESCE($8, (SELECT COALESCE(MAX(position) + 1, 0) FROM menu_items WHERE category_id = $1))
            )
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(category_id)
        .bind(business_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.price)
        .bind(&request.image_url)
        .bind(request.is_available)
        .bind(request.position)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?.into())
    }

    /// Update an item. A new category must belong to the same business.
    /// Blank description, price or image URL clears the field.
    pub async fn update(
        &self,
        business_id: Uuid,
        item_id: Uuid,
        request: &UpdateMenuItemRequest,
    ) -> Result<Option<MenuItem>, sqlx::Error> {
        let description = clearable(&request.description);
        let price = clearable(&request.price);
        let image_url = clearable(&request.image_url);

        let timer = QueryTimer::new("update_menu_item");
        let result = sqlx::query_as::<_, MenuItemEntity>(&format!(
            r#"
            UPDATE menu_items
            SET
                name = COALESCE($3, name),
                description = CASE WHEN $4::boolean THEN $5 ELSE description END,
                price = CASE WHEN $6::boolean THEN $7::NUMERIC ELSE price END,
                image_url = CASE WHEN $8::boolean THEN $9 ELSE image_url END,
                is_available = COALESCE($10, is_available),
                position = COALESCE($11, position),
                category_id = COALESCE($12, category_id),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
              AND ($12::UUID IS NULL OR EXISTS (
                  SELECT 1 FROM categories c WHERE c.id = $12 AND c.business_id = $2
              ))
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .bind(business_id)
        .bind(&request.name)
        .bind(description.is_some())
        .bind(description.flatten())
        .bind(price.is_some())
        .bind(price.flatten())
        .bind(image_url.is_some())
        .bind(image_url.flatten())
        .bind(request.is_available)
        .bind(request.position)
        .bind(request.category_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Delete an item.
    pub async fn delete(&self, business_id: Uuid, item_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_menu_item");
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1 AND business_id = $2")
            .bind(item_id)
            .bind(business_id)
            .execute(&self.pool)
            .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }
}
