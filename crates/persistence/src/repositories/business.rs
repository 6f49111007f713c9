//! Business repository for database operations.

use chrono::{DateTime, Utc};
use domain::error::DomainResult;
use domain::models::{
    AdminBusinessSummary, Business, BusinessStatus, DesignDocument, ListBusinessesQuery,
    NewBusiness, UpdateBusinessRequest,
};
use domain::services::BusinessDesignStore;
use shared::validation::clearable;
use sqlx::PgPool;
use uuid::Uuid;

use super::store_error;
use crate::entities::{AdminBusinessSummaryEntity, BusinessEntity, BusinessStatusDb};
use crate::metrics::QueryTimer;

const BUSINESS_COLUMNS: &str = "id, owner_id, slug, name, description, phone, address, logo_url, \
     design, qr_design_version_id, status, expires_at, created_at, updated_at";

/// Repository for business database operations.
#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a business.
    pub async fn create(&self, business: &NewBusiness) -> Result<Business, sqlx::Error> {
        let timer = QueryTimer::new("create_business");
        let result = sqlx::query_as::<_, BusinessEntity>(&format!(
            r#"
            INSERT INTO businesses (owner_id, slug, name, description, phone, address, logo_url, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            BUSINESS_COLUMNS
        ))
        .bind(business.owner_id)
        .bind(&business.slug)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.phone)
        .bind(&business.address)
        .bind(&business.logo_url)
        .bind(business.expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?.into())
    }

    /// Find business by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Business>, sqlx::Error> {
        let timer = QueryTimer::new("find_business_by_id");
        let result = sqlx::query_as::<_, BusinessEntity>(&format!(
            "SELECT {} FROM businesses WHERE id = $1",
            BUSINESS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Find the business owned by a user.
    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Business>, sqlx::Error> {
        let timer = QueryTimer::new("find_business_by_owner");
        let result = sqlx::query_as::<_, BusinessEntity>(&format!(
            "SELECT {} FROM businesses WHERE owner_id = $1",
            BUSINESS_COLUMNS
        ))
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Find business by public slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, sqlx::Error> {
        let timer = QueryTimer::new("find_business_by_slug");
        let result = sqlx::query_as::<_, BusinessEntity>(&format!(
            "SELECT {} FROM businesses WHERE slug = $1",
            BUSINESS_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Check if slug is already taken.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM businesses WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
    }

    /// Update the owner-editable profile fields. Blank optional fields are
    /// cleared.
    pub async fn update_profile(
        &self,
        id: Uuid,
        request: &UpdateBusinessRequest,
    ) -> Result<Option<Business>, sqlx::Error> {
        let description = clearable(&request.description);
        let phone = clearable(&request.phone);
        let address = clearable(&request.address);
        let logo_url = clearable(&request.logo_url);

        let timer = QueryTimer::new("update_business");
        let result = sqlx::query_as::<_, BusinessEntity>(&format!(
            r#"
            UPDATE businesses
            SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4::boolean THEN $5 ELSE description END,
                phone = CASE WHEN $6::boolean THEN $7 ELSE phone END,
                address = CASE WHEN $8::boolean THEN $9 ELSE address END,
                logo_url = CASE WHEN $10::boolean THEN $11 ELSE logo_url END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BUSINESS_COLUMNS
        ))
        .bind(id)
        .bind(&request.name)
        .bind(&request.slug)
        .bind(description.is_some())
        .bind(description.flatten())
        .bind(phone.is_some())
        .bind(phone.flatten())
        .bind(address.is_some())
        .bind(address.flatten())
        .bind(logo_url.is_some())
        .bind(logo_url.flatten())
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Set or clear the QR design pointer.
    pub async fn update_qr_pointer(
        &self,
        id: Uuid,
        version_id: Option<Uuid>,
    ) -> Result<Option<Business>, sqlx::Error> {
        let timer = QueryTimer::new("update_business_qr_pointer");
        let result = sqlx::query_as::<_, BusinessEntity>(&format!(
            r#"
            UPDATE businesses
            SET qr_design_version_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BUSINESS_COLUMNS
        ))
        .bind(id)
        .bind(version_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Overwrite the legacy inline design.
    pub async fn update_inline_design(
        &self,
        id: Uuid,
        design: &DesignDocument,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_business_design");
        let result = sqlx::query(
            "UPDATE businesses SET design = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(design.to_json())
        .execute(&self.pool)
        .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }

    /// Set status and expiry together.
    pub async fn set_window(
        &self,
        id: Uuid,
        status: BusinessStatus,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Business>, sqlx::Error> {
        let timer = QueryTimer::new("set_business_window");
        let result = sqlx::query_as::<_, BusinessEntity>(&format!(
            r#"
            UPDATE businesses
            SET status = $2, expires_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BUSINESS_COLUMNS
        ))
        .bind(id)
        .bind(BusinessStatusDb::from(status))
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Set the stored status, leaving the expiry untouched.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: BusinessStatus,
    ) -> Result<Option<Business>, sqlx::Error> {
        let timer = QueryTimer::new("set_business_status");
        let result = sqlx::query_as::<_, BusinessEntity>(&format!(
            r#"
            UPDATE businesses
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BUSINESS_COLUMNS
        ))
        .bind(id)
        .bind(BusinessStatusDb::from(status))
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Delete a business. Versions and menu rows cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_business");
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }

    /// Write `status = paused` for active rows whose expiry has passed.
    ///
    /// Returns the number of rows paused.
    pub async fn pause_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("pause_expired_businesses");
        let result = sqlx::query(
            r#"
            UPDATE businesses
            SET status = 'paused', updated_at = NOW()
            WHERE status = 'active' AND expires_at IS NOT NULL AND expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await;
        timer.record();

        Ok(result?.rows_affected())
    }

    /// List businesses for the super-admin view.
    pub async fn list_for_admin(
        &self,
        query: &ListBusinessesQuery,
        now: DateTime<Utc>,
    ) -> Result<(Vec<AdminBusinessSummary>, i64), sqlx::Error> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")));

        let timer = QueryTimer::new("count_businesses_admin");
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM businesses b
            WHERE $1::TEXT IS NULL OR b.name ILIKE $1 OR b.slug ILIKE $1
            "#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        let total = total?;

        let timer = QueryTimer::new("list_businesses_admin");
        let rows = sqlx::query_as::<_, AdminBusinessSummaryEntity>(
            r#"
            SELECT
                b.id, b.owner_id, p.email AS owner_email, b.slug, b.name, b.status,
                b.expires_at, b.created_at,
                (SELECT COUNT(*) FROM design_versions dv WHERE dv.business_id = b.id) AS version_count
            FROM businesses b
            LEFT JOIN profiles p ON p.id = b.owner_id
            WHERE $1::TEXT IS NULL OR b.name ILIKE $1 OR b.slug ILIKE $1
            ORDER BY b.created_at DESC, b.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&search)
        .bind(query.per_page())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await;
        timer.record();

        let data = rows?
            .into_iter()
            .map(|row| row.into_summary(now))
            .collect();

        Ok((data, total))
    }
}

#[async_trait::async_trait]
impl BusinessDesignStore for BusinessRepository {
    async fn set_qr_pointer(
        &self,
        business_id: Uuid,
        version_id: Option<Uuid>,
    ) -> DomainResult<Option<Business>> {
        self.update_qr_pointer(business_id, version_id)
            .await
            .map_err(store_error)
    }

    async fn set_inline_design(
        &self,
        business_id: Uuid,
        design: &DesignDocument,
    ) -> DomainResult<()> {
        self.update_inline_design(business_id, design)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}
