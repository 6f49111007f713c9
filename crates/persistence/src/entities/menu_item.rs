//! Menu item entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::MenuItem;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the menu_items table.
///
/// `price` is selected as `price::TEXT`.
#[derive(Debug, Clone, FromRow)]
pub struct MenuItemEntity {
    pub id: Uuid,
    pub category_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItemEntity> for MenuItem {
    fn from(entity: MenuItemEntity) -> Self {
        Self {
            id: entity.id,
            category_id: entity.category_id,
            business_id: entity.business_id,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            image_url: entity.image_url,
            is_available: entity.is_available,
            position: entity.position,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
