//! Profile repository for database operations.

use domain::models::Profile;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for profile database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by auth provider user id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            "SELECT id, email, role, created_at FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Return the profile for a user, creating it with role owner on first
    /// sight. A known email is refreshed, the role is never changed here.
    pub async fn ensure(&self, id: Uuid, email: Option<&str>) -> Result<Profile, sqlx::Error> {
        let timer = QueryTimer::new("ensure_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
                SET email = COALESCE(EXCLUDED.email, profiles.email)
            RETURNING id, email, role, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?.into())
    }
}
