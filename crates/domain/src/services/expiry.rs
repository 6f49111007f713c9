//! Trial/expiry windowing.
//!
//! `status` and `expires_at` are the source of truth. The effective status
//! shown to diners is recomputed on every read; a stored `paused` written by
//! the expiry sweep is an optimization, never something reads depend on.

use chrono::{DateTime, Duration, Utc};

use crate::error::{DomainError, DomainResult};
use crate::models::{Business, BusinessStatus, TimeWindowRequest};

/// Minutes per day for the legacy `days` input.
pub const MINUTES_PER_DAY: i64 = 1440;

/// Returns true once `expires_at` has been reached.
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(expires_at, Some(at) if at <= now)
}

/// Computes the effective display status.
///
/// Precedence: stored `paused` wins, then an elapsed `expires_at`, else active.
pub fn effective_status(
    status: BusinessStatus,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> BusinessStatus {
    match status {
        BusinessStatus::Paused => BusinessStatus::Paused,
        BusinessStatus::Active if is_expired(expires_at, now) => BusinessStatus::Paused,
        BusinessStatus::Active => BusinessStatus::Active,
    }
}

impl Business {
    /// Effective status of this business at `now`.
    pub fn effective_status(&self, now: DateTime<Utc>) -> BusinessStatus {
        effective_status(self.status, self.expires_at, now)
    }
}

/// Stored `status`/`expires_at` pair produced by a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialWindow {
    pub status: BusinessStatus,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TrialWindow {
    /// No expiry.
    pub fn unlimited() -> Self {
        Self {
            status: BusinessStatus::Active,
            expires_at: None,
        }
    }

    /// Paused with no expiry.
    pub fn paused() -> Self {
        Self {
            status: BusinessStatus::Paused,
            expires_at: None,
        }
    }

    /// Maps a minutes value to a window.
    ///
    /// `-1` and `0` both pause immediately, `None` is unlimited, positive
    /// values expire that many minutes from `now`.
    pub fn from_minutes(minutes: Option<i64>, now: DateTime<Utc>) -> DomainResult<Self> {
        match minutes {
            None => Ok(Self::unlimited()),
            Some(-1) | Some(0) => Ok(Self::paused()),
            Some(m) if m > 0 => {
                let expires_at = Duration::try_minutes(m)
                    .and_then(|d| now.checked_add_signed(d))
                    .ok_or_else(|| {
                        DomainError::InvalidInput("Time window is too large".to_string())
                    })?;
                Ok(Self {
                    status: BusinessStatus::Active,
                    expires_at: Some(expires_at),
                })
            }
            Some(m) => Err(DomainError::InvalidInput(format!(
                "Invalid time window: {} minutes",
                m
            ))),
        }
    }

    /// Maps an admin request, where `minutes` takes precedence over `days`.
    pub fn from_request(request: &TimeWindowRequest, now: DateTime<Utc>) -> DomainResult<Self> {
        let minutes = match (request.minutes, request.days) {
            (Some(minutes), _) => Some(minutes),
            // -1 and 0 keep their pause meaning when given in days
            (None, Some(days)) if days <= 0 => Some(days),
            (None, Some(days)) => Some(days.checked_mul(MINUTES_PER_DAY).ok_or_else(|| {
                DomainError::InvalidInput("Time window is too large".to_string())
            })?),
            (None, None) => None,
        };
        Self::from_minutes(minutes, now)
    }

    /// Window for a newly created business. `trial_days == 0` means unlimited.
    pub fn trial(trial_days: u32, now: DateTime<Utc>) -> Self {
        if trial_days == 0 {
            return Self::unlimited();
        }
        Self {
            status: BusinessStatus::Active,
            expires_at: Some(now + Duration::days(i64::from(trial_days))),
        }
    }
}
