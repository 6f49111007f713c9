//! Background job to record connection pool metrics.

use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};

/// Records pool gauges every few seconds.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(15)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::db::{create_lazy_pool, DatabaseConfig};

    fn lazy_pool() -> PgPool {
        create_lazy_pool(&DatabaseConfig {
            url: "postgres://localhost:1/unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_secs: 1,
            idle_timeout_secs: 60,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_job_metadata() {
        let job = PoolMetricsJob::new(lazy_pool());
        assert_eq!(job.name(), "pool_metrics");
        assert_eq!(job.frequency(), JobFrequency::Seconds(15));
    }

    #[tokio::test]
    async fn test_execute_without_connections() {
        let job = PoolMetricsJob::new(lazy_pool());
        assert!(job.execute().await.is_ok());
    }
}
