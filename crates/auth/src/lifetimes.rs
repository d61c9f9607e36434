//! Token lifetimes issued by the directory client.

use std::ops::RangeInclusive;

use chrono::Duration;
use thiserror::Error;

use projovo_core::{DomainError, DomainResult, ValueObject};

/// Accepted access and id token lifetimes, in minutes.
pub const SHORT_LIVED_MINUTES: RangeInclusive<i64> = 5..=24 * 60;

/// Accepted refresh token lifetimes, in minutes (one hour to ten years).
pub const REFRESH_MINUTES: RangeInclusive<i64> = 60..=3650 * 24 * 60;

/// Access, id and refresh token lifetimes for a client.
///
/// Each lifetime is a positive whole number of minutes inside the range the
/// directory accepts for its token kind. Ordering between them is *not*
/// enforced here; see [`TokenLifetimes::findings`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TokenLifetimes {
    access: Duration,
    id: Duration,
    refresh: Duration,
}

impl ValueObject for TokenLifetimes {}

/// Soft problem with a set of lifetimes.
///
/// These do not make the client invalid, but once the short-lived tokens
/// expire the client can no longer refresh them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifetimeFinding {
    #[error("refresh token lifetime ({refresh}) is shorter than the access token lifetime ({access})")]
    RefreshShorterThanAccess { refresh: Duration, access: Duration },

    #[error("refresh token lifetime ({refresh}) is shorter than the id token lifetime ({id})")]
    RefreshShorterThanId { refresh: Duration, id: Duration },
}

impl TokenLifetimes {
    pub fn new(access: Duration, id: Duration, refresh: Duration) -> DomainResult<Self> {
        for (name, value, range) in [
            ("access", access, &SHORT_LIVED_MINUTES),
            ("id", id, &SHORT_LIVED_MINUTES),
            ("refresh", refresh, &REFRESH_MINUTES),
        ] {
            check(name, value, range)?;
        }
        Ok(Self { access, id, refresh })
    }

    /// Build lifetimes from whole seconds, as they appear in configuration.
    pub fn from_secs(access: i64, id: i64, refresh: i64) -> DomainResult<Self> {
        Self::new(seconds("access", access)?, seconds("id", id)?, seconds("refresh", refresh)?)
    }

    pub fn access(&self) -> Duration {
        self.access
    }

    pub fn id(&self) -> Duration {
        self.id
    }

    pub fn refresh(&self) -> Duration {
        self.refresh
    }

    /// Deterministically list soft problems with these lifetimes.
    pub fn findings(&self) -> Vec<LifetimeFinding> {
        let mut findings = Vec::new();
        if self.refresh < self.access {
            findings.push(LifetimeFinding::RefreshShorterThanAccess {
                refresh: self.refresh,
                access: self.access,
            });
        }
        if self.refresh < self.id {
            findings.push(LifetimeFinding::RefreshShorterThanId {
                refresh: self.refresh,
                id: self.id,
            });
        }
        findings
    }
}

impl Default for TokenLifetimes {
    /// One hour access/id tokens, thirty day refresh tokens.
    fn default() -> Self {
        Self {
            access: Duration::hours(1),
            id: Duration::hours(1),
            refresh: Duration::days(30),
        }
    }
}

fn check(name: &str, value: Duration, range: &RangeInclusive<i64>) -> DomainResult<()> {
    if value <= Duration::zero() {
        return Err(DomainError::validation(format!(
            "{name} token lifetime must be positive (got {value})"
        )));
    }
    // Rendered in minutes; anything finer would be truncated.
    if value.subsec_nanos() != 0 || value.num_seconds() % 60 != 0 {
        return Err(DomainError::validation(format!(
            "{name} token lifetime must be a whole number of minutes (got {value})"
        )));
    }
    let minutes = value.num_minutes();
    if !range.contains(&minutes) {
        return Err(DomainError::validation(format!(
            "{name} token lifetime must be within {}..={} minutes (got {minutes})",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

fn seconds(name: &str, secs: i64) -> DomainResult<Duration> {
    Duration::try_seconds(secs).ok_or_else(|| {
        DomainError::validation(format!("{name} token lifetime out of range ({secs}s)"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_lifetimes_have_no_findings() {
        let lifetimes = TokenLifetimes::default();
        assert_eq!(lifetimes.access(), Duration::hours(1));
        assert_eq!(lifetimes.refresh(), Duration::days(30));
        assert!(lifetimes.findings().is_empty());
    }

    #[test]
    fn non_positive_lifetime_is_rejected() {
        let err = TokenLifetimes::from_secs(3600, 0, 86_400).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("id token")));

        assert!(TokenLifetimes::from_secs(-1, 3600, 86_400).is_err());
    }

    #[test]
    fn fractional_minutes_are_rejected() {
        let err = TokenLifetimes::from_secs(30, 3600, 86_400).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(msg) if msg.starts_with("access token") && msg.contains("whole number of minutes")
        ));

        let err = TokenLifetimes::from_secs(3600, 90, 86_400).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("id token")));

        let err = TokenLifetimes::new(
            Duration::hours(1),
            Duration::hours(1),
            Duration::days(1) + Duration::milliseconds(500),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("refresh token")));
    }

    #[test]
    fn lifetimes_outside_the_accepted_range_are_rejected() {
        // four minutes: below the access/id minimum
        let err = TokenLifetimes::from_secs(240, 3600, 86_400).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("5..=1440")));

        // two days: above the access/id maximum
        assert!(TokenLifetimes::from_secs(3600, 2 * 86_400, 86_400).is_err());

        // thirty minutes: below the refresh minimum
        let err = TokenLifetimes::from_secs(3600, 3600, 1800).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("refresh token")));

        // bounds are inclusive
        assert!(TokenLifetimes::from_secs(5 * 60, 24 * 3600, 3600).is_ok());
        assert!(TokenLifetimes::new(Duration::hours(1), Duration::hours(1), Duration::days(3650)).is_ok());
        assert!(TokenLifetimes::new(Duration::hours(1), Duration::hours(1), Duration::days(3651)).is_err());
    }

    #[test]
    fn short_refresh_is_reported_not_rejected() {
        let lifetimes = TokenLifetimes::from_secs(7200, 10_800, 3600).unwrap();
        let findings = lifetimes.findings();
        assert_eq!(findings.len(), 2);
        assert!(matches!(findings[0], LifetimeFinding::RefreshShorterThanAccess { .. }));
        assert!(matches!(findings[1], LifetimeFinding::RefreshShorterThanId { .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: findings are empty exactly when refresh outlives both
        /// access and id tokens.
        #[test]
        fn findings_empty_iff_refresh_is_longest(
            access in SHORT_LIVED_MINUTES,
            id in SHORT_LIVED_MINUTES,
            refresh in 60i64..=3000,
        ) {
            let lifetimes = TokenLifetimes::from_secs(access * 60, id * 60, refresh * 60).unwrap();
            prop_assert_eq!(lifetimes.findings().is_empty(), refresh >= access.max(id));
        }
    }
}
