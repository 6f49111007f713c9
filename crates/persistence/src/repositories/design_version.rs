//! Design version repository for database operations.

use domain::error::DomainResult;
use domain::models::{
    DesignVersion, DesignVersionChanges, DesignVersionSummary, NewDesignVersion,
};
use domain::services::DesignVersionStore;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::store_error;
use crate::entities::{DesignVersionEntity, DesignVersionSummaryEntity};
use crate::metrics::QueryTimer;

const VERSION_COLUMNS: &str =
    "id, business_id, name, description, design, is_active, created_at, updated_at";

/// Repository for design version database operations.
#[derive(Clone)]
pub struct DesignVersionRepository {
    pool: PgPool,
}

impl DesignVersionRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List versions of a business, newest first.
    pub async fn list_by_business(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<DesignVersionSummary>, sqlx::Error> {
        let timer = QueryTimer::new("list_design_versions");
        let result = sqlx::query_as::<_, DesignVersionSummaryEntity>(
            r#"
            SELECT id, business_id, name, description, is_active, created_at, updated_at
            FROM design_versions
            WHERE business_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result?.into_iter().map(Into::into).collect())
    }

    /// Count versions of a business.
    pub async fn count_by_business(&self, business_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_design_versions");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM design_versions WHERE business_id = $1",
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a version scoped to its business.
    pub async fn find(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> Result<Option<DesignVersion>, sqlx::Error> {
        let timer = QueryTimer::new("find_design_version");
        let result = sqlx::query_as::<_, DesignVersionEntity>(&format!(
            "SELECT {} FROM design_versions WHERE id = $1 AND business_id = $2",
            VERSION_COLUMNS
        ))
        .bind(version_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Insert a version. An active insert clears the other active flags in
    /// the same transaction.
    pub async fn insert(&self, version: &NewDesignVersion) -> Result<DesignVersion, sqlx::Error> {
        let timer = QueryTimer::new("insert_design_version");
        let mut tx = self.pool.begin().await?;

        if version.is_active {
            lock_business(&mut tx, version.business_id).await?;

            sqlx::query(
                r#"
                UPDATE design_versions
                SET is_active = false, updated_at = NOW()
                WHERE business_id = $1 AND is_active
                "#,
            )
            .bind(version.business_id)
            .execute(&mut *tx)
            .await?;
        }

        let entity = sqlx::query_as::<_, DesignVersionEntity>(&format!(
            r#"
            INSERT INTO design_versions (business_id, name, description, design, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            VERSION_COLUMNS
        ))
        .bind(version.business_id)
        .bind(&version.name)
        .bind(&version.description)
        .bind(version.design.to_json())
        .bind(version.is_active)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(entity.into())
    }

    /// Apply field changes to a version.
    pub async fn update(
        &self,
        business_id: Uuid,
        version_id: Uuid,
        changes: &DesignVersionChanges,
    ) -> Result<Option<DesignVersion>, sqlx::Error> {
        let timer = QueryTimer::new("update_design_version");
        let result = sqlx::query_as::<_, DesignVersionEntity>(&format!(
            r#"
            UPDATE design_versions
            SET
                name = COALESCE($3, name),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                design = COALESCE($6, design),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {}
            "#,
            VERSION_COLUMNS
        ))
        .bind(version_id)
        .bind(business_id)
        .bind(&changes.name)
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.design.as_ref().map(|d| d.to_json()))
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Clear the other active flags of the business, then set the target, in
    /// one transaction. Nothing is written when the target is not in the
    /// business.
    pub async fn activate(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> Result<Option<DesignVersion>, sqlx::Error> {
        let timer = QueryTimer::new("activate_design_version");
        let mut tx = self.pool.begin().await?;
        lock_business(&mut tx, business_id).await?;

        let exists = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM design_versions WHERE id = $1 AND business_id = $2 FOR UPDATE",
        )
        .bind(version_id)
        .bind(business_id)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE design_versions
            SET is_active = false, updated_at = NOW()
            WHERE business_id = $1 AND id != $2 AND is_active
            "#,
        )
        .bind(business_id)
        .bind(version_id)
        .execute(&mut *tx)
        .await?;

        let entity = sqlx::query_as::<_, DesignVersionEntity>(&format!(
            r#"
            UPDATE design_versions
            SET is_active = true, updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {}
            "#,
            VERSION_COLUMNS
        ))
        .bind(version_id)
        .bind(business_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(Some(entity.into()))
    }

    /// Clear the active flag on one version.
    pub async fn deactivate(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> Result<Option<DesignVersion>, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_design_version");
        let result = sqlx::query_as::<_, DesignVersionEntity>(&format!(
            r#"
            UPDATE design_versions
            SET is_active = false, updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {}
            "#,
            VERSION_COLUMNS
        ))
        .bind(version_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Delete a version only while it is inactive.
    pub async fn delete_inactive(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_design_version");
        let result = sqlx::query(
            r#"
            DELETE FROM design_versions
            WHERE id = $1 AND business_id = $2 AND NOT is_active
            "#,
        )
        .bind(version_id)
        .bind(business_id)
        .execute(&self.pool)
        .await;
        timer.record();

        Ok(result?.rows_affected() > 0)
    }
}

/// Serializes writers of the active flag per business. The last writer to
/// commit keeps its version active.
async fn lock_business(
    tx: &mut Transaction<'_, Postgres>,
    business_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT id FROM businesses WHERE id = $1 FOR UPDATE")
        .bind(business_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait::async_trait]
impl DesignVersionStore for DesignVersionRepository {
    async fn list_versions(&self, business_id: Uuid) -> DomainResult<Vec<DesignVersionSummary>> {
        self.list_by_business(business_id).await.map_err(store_error)
    }

    async fn count_versions(&self, business_id: Uuid) -> DomainResult<i64> {
        self.count_by_business(business_id).await.map_err(store_error)
    }

    async fn find_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>> {
        self.find(business_id, version_id).await.map_err(store_error)
    }

    async fn insert_version(&self, version: NewDesignVersion) -> DomainResult<DesignVersion> {
        self.insert(&version).await.map_err(store_error)
    }

    async fn update_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
        changes: &DesignVersionChanges,
    ) -> DomainResult<Option<DesignVersion>> {
        self.update(business_id, version_id, changes)
            .await
            .map_err(store_error)
    }

    async fn activate_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>> {
        self.activate(business_id, version_id)
            .await
            .map_err(store_error)
    }

    async fn deactivate_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>> {
        self.deactivate(business_id, version_id)
            .await
            .map_err(store_error)
    }

    async fn delete_inactive_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<bool> {
        self.delete_inactive(business_id, version_id)
            .await
            .map_err(store_error)
    }
}
