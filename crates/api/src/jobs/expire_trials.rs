//! Background job that writes `paused` for businesses whose trial expired.
//!
//! Readers already derive the effective status from `expires_at`; this keeps
//! the stored column in step.

use chrono::Utc;
use persistence::repositories::BusinessRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_businesses_paused;

pub struct ExpireTrialsJob {
    repo: BusinessRepository,
    interval_minutes: u64,
}

impl ExpireTrialsJob {
    pub fn new(pool: PgPool, interval_minutes: u64) -> Self {
        Self {
            repo: BusinessRepository::new(pool),
            interval_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for ExpireTrialsJob {
    fn name(&self) -> &'static str {
        "expire_trials"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let paused = self
            .repo
            .pause_expired(Utc::now())
            .await
            .map_err(|e| format!("Failed to pause expired businesses: {}", e))?;

        if paused > 0 {
            record_businesses_paused(paused);
            info!(paused, "Paused expired businesses");
        }
        Ok(())
    }
}
