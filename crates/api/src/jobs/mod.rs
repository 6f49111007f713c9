//! Background job scheduler and job implementations.

mod expire_trials;
mod pool_metrics;
mod rate_limit_cleanup;
mod scheduler;

pub use expire_trials::ExpireTrialsJob;
pub use pool_metrics::PoolMetricsJob;
pub use rate_limit_cleanup::RateLimitCleanupJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
