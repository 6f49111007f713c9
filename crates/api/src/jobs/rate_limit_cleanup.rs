//! Background job to prune per-user rate limiter state.

use std::sync::Arc;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::RateLimiterState;

/// Drops limiter entries of users that are back under their quota.
pub struct RateLimitCleanupJob {
    limiter: Arc<RateLimiterState>,
}

impl RateLimitCleanupJob {
    pub fn new(limiter: Arc<RateLimiterState>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for RateLimitCleanupJob {
    fn name(&self) -> &'static str {
        "rate_limit_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        let before = self.limiter.tracked_users();
        self.limiter.retain_recent();
        let after = self.limiter.tracked_users();
        if before > after {
            tracing::debug!(pruned = before - after, remaining = after, "Pruned rate limiter state");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_execute_prunes_idle_users() {
        let limiter = Arc::new(RateLimiterState::new(60_000).unwrap());
        let job = RateLimitCleanupJob::new(limiter.clone());
        assert_eq!(job.name(), "rate_limit_cleanup");

        assert!(limiter.check(Uuid::new_v4()).is_ok());
        assert_eq!(limiter.tracked_users(), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(job.execute().await.is_ok());
        assert_eq!(limiter.tracked_users(), 0);
    }

    #[tokio::test]
    async fn test_execute_keeps_limited_users() {
        let limiter = Arc::new(RateLimiterState::new(1).unwrap());
        let job = RateLimitCleanupJob::new(limiter.clone());
        let user = Uuid::new_v4();

        assert!(limiter.check(user).is_ok());
        assert!(limiter.check(user).is_err());
        assert!(job.execute().await.is_ok());
        assert_eq!(limiter.tracked_users(), 1);
        assert!(limiter.check(user).is_err());
    }
}
