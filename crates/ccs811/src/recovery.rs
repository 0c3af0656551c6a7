//! Fault recovery with two-level backoff.
//!
//! While a device is faulted, re-initialization is attempted at most once per
//! `retry_interval`. After `max_retries` consecutive failures at one interval
//! the count starts over and the interval doubles, up to
//! `max_backoff_interval`. Any successful re-initialization restores the
//! initial interval.
//!
//! The bookkeeping in [`RetryState`] is pure; [`maybe_recover`] and
//! [`maybe_bring_up`] wrap it around a call to [`Sensor::init`].

use embassy_time::{Duration, Instant};

use crate::record::{DeviceState, SensorRecord};
use crate::Sensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecoveryPolicy {
    /// Cooldown after a success, and the floor of the backoff.
    pub initial_interval: Duration,
    /// Ceiling of the backoff.
    pub max_backoff_interval: Duration,
    /// Failures tolerated at one interval before it doubles.
    pub max_retries: u8,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(15), Duration::from_secs(8 * 60), 4)
    }
}

impl RecoveryPolicy {
    /// A ceiling below `initial_interval` is raised to it.
    pub const fn new(
        initial_interval: Duration,
        max_backoff_interval: Duration,
        max_retries: u8,
    ) -> Self {
        let max_backoff_interval =
            if max_backoff_interval.as_ticks() < initial_interval.as_ticks() {
                initial_interval
            } else {
                max_backoff_interval
            };
        Self { initial_interval, max_backoff_interval, max_retries }
    }

    /// The interval that follows `interval` once its retry budget is spent.
    ///
    /// Always within `[initial_interval, max_backoff_interval]`, with the
    /// floor taking precedence for a policy built with inverted bounds.
    pub fn backoff(&self, interval: Duration) -> Duration {
        interval
            .checked_mul(2)
            .map_or(self.max_backoff_interval, |doubled| {
                doubled.min(self.max_backoff_interval)
            })
            .max(self.initial_interval)
    }
}

/// Result of one re-initialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Recovered,
    Failed,
}

/// Backoff bookkeeping carried by a [`SensorRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryState {
    pub retry_count: u8,
    pub retry_interval: Duration,
    pub last_attempt: Instant,
}

impl RetryState {
    pub fn new(policy: &RecoveryPolicy) -> Self {
        Self {
            retry_count: 0,
            retry_interval: policy.initial_interval,
            last_attempt: Instant::from_ticks(0),
        }
    }

    /// Time since the last attempt, clamped at zero if `now` is behind it.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_attempt)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.retry_interval
    }

    /// Time left until the next attempt is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.retry_interval
            .checked_sub(self.elapsed(now))
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Restarts the cooldown clock. Applied before the attempt runs, whatever
    /// its outcome.
    #[must_use]
    pub fn begin_attempt(self, now: Instant) -> Self {
        Self { last_attempt: now, ..self }
    }

    /// Clears the count and restores the initial interval.
    #[must_use]
    pub fn reset(self, policy: &RecoveryPolicy) -> Self {
        Self {
            retry_count: 0,
            retry_interval: policy.initial_interval,
            ..self
        }
    }

    #[must_use]
    pub fn after(self, outcome: Outcome, policy: &RecoveryPolicy) -> Self {
        match outcome {
            Outcome::Recovered => self.reset(policy),
            Outcome::Failed => {
                let retry_count = self.retry_count.saturating_add(1);
                if retry_count >= policy.max_retries {
                    Self {
                        retry_count: 0,
                        retry_interval: policy.backoff(self.retry_interval),
                        ..self
                    }
                } else {
                    Self { retry_count, ..self }
                }
            }
        }
    }
}

/// What a call to [`maybe_recover`] or [`maybe_bring_up`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoveryAttempt {
    /// The record is not in a state this entry point handles.
    NotNeeded,
    /// An attempt is not due yet.
    CoolingDown { remaining: Duration },
    Recovered,
    Failed { retry_count: u8, retry_interval: Duration },
}

/// Re-initializes a faulted device if its cooldown has expired.
pub async fn maybe_recover<S: Sensor>(
    sensor: &mut S,
    record: &mut SensorRecord,
    now: Instant,
) -> RecoveryAttempt {
    if !record.state().is_faulted() {
        return RecoveryAttempt::NotNeeded;
    }
    attempt(sensor, record, now).await
}

/// Retries the first bring-up of a device that never got past bus init,
/// on the same cadence as [`maybe_recover`].
pub async fn maybe_bring_up<S: Sensor>(
    sensor: &mut S,
    record: &mut SensorRecord,
    now: Instant,
) -> RecoveryAttempt {
    if record.state() != DeviceState::Uninitialized {
        return RecoveryAttempt::NotNeeded;
    }
    attempt(sensor, record, now).await
}

async fn attempt<S: Sensor>(
    sensor: &mut S,
    record: &mut SensorRecord,
    now: Instant,
) -> RecoveryAttempt {
    if !record.retry.is_due(now) {
        return RecoveryAttempt::CoolingDown {
            remaining: record.retry.remaining(now),
        };
    }

    record.retry = record.retry.begin_attempt(now);
    info!("Attempting CCS811 recovery from {:?}", record.state());

    let outcome = match sensor.init(record).await {
        Ok(()) => Outcome::Recovered,
        Err(_) => Outcome::Failed,
    };

    let policy = *record.policy();
    record.retry = record.retry.after(outcome, &policy);

    match outcome {
        Outcome::Recovered => {
            record.mark_ready();
            info!("CCS811 recovered");
            RecoveryAttempt::Recovered
        }
        Outcome::Failed => {
            warn!(
                "CCS811 recovery failed (retry {}, next attempt in {} ms)",
                record.retry.retry_count,
                record.retry.retry_interval.as_millis()
            );
            RecoveryAttempt::Failed {
                retry_count: record.retry.retry_count,
                retry_interval: record.retry.retry_interval,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RecoveryPolicy {
        RecoveryPolicy::default()
    }

    #[test]
    fn failures_below_budget_only_count() {
        let policy = policy();
        let mut state = RetryState::new(&policy);

        for expected in 1..policy.max_retries {
            state = state.after(Outcome::Failed, &policy);
            assert_eq!(state.retry_count, expected);
            assert_eq!(state.retry_interval, policy.initial_interval);
        }
    }

    #[test]
    fn exhausted_budget_doubles_interval() {
        let policy = policy();
        let mut state = RetryState::new(&policy);

        for _ in 0..policy.max_retries {
            state = state.after(Outcome::Failed, &policy);
        }

        assert_eq!(state.retry_count, 0);
        assert_eq!(state.retry_interval, Duration::from_secs(30));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = policy();
        let mut state = RetryState::new(&policy);

        for _ in 0..(policy.max_retries as usize * 16) {
            state = state.after(Outcome::Failed, &policy);
            assert!(state.retry_interval >= policy.initial_interval);
            assert!(state.retry_interval <= policy.max_backoff_interval);
        }

        assert_eq!(state.retry_interval, policy.max_backoff_interval);
    }

    #[test]
    fn backoff_clamps_to_ceiling() {
        let policy = policy();

        assert_eq!(
            policy.backoff(Duration::from_secs(4 * 60)),
            policy.max_backoff_interval
        );
        assert_eq!(
            policy.backoff(Duration::from_secs(5 * 60)),
            policy.max_backoff_interval
        );
        assert_eq!(policy.backoff(Duration::MAX), policy.max_backoff_interval);
    }

    #[test]
    fn new_raises_ceiling_below_initial_interval() {
        let policy = RecoveryPolicy::new(
            Duration::from_secs(60),
            Duration::from_secs(10),
            4,
        );

        assert_eq!(policy.max_backoff_interval, Duration::from_secs(60));
        assert_eq!(
            policy.backoff(policy.initial_interval),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn backoff_never_drops_below_initial_interval() {
        // Bounds set directly through the public fields.
        let policy = RecoveryPolicy {
            initial_interval: Duration::from_secs(60),
            max_backoff_interval: Duration::from_secs(10),
            max_retries: 1,
        };
        let mut state = RetryState::new(&policy);

        for _ in 0..4 {
            state = state.after(Outcome::Failed, &policy);
            assert_eq!(state.retry_interval, policy.initial_interval);
        }
    }

    #[test]
    fn success_resets_accumulated_backoff() {
        let policy = policy();
        let state = RetryState {
            retry_count: 2,
            retry_interval: Duration::from_secs(120),
            last_attempt: Instant::from_secs(500),
        };

        let state = state.after(Outcome::Recovered, &policy);

        assert_eq!(state.retry_count, 0);
        assert_eq!(state.retry_interval, policy.initial_interval);
        assert_eq!(state.last_attempt, Instant::from_secs(500));
    }

    #[test]
    fn cooldown_uses_saturating_elapsed_time() {
        let policy = policy();
        let state =
            RetryState::new(&policy).begin_attempt(Instant::from_secs(100));

        assert!(!state.is_due(Instant::from_secs(114)));
        assert!(state.is_due(Instant::from_secs(115)));
        assert_eq!(
            state.remaining(Instant::from_secs(105)),
            Duration::from_secs(10)
        );
        assert_eq!(
            state.remaining(Instant::from_secs(200)),
            Duration::from_ticks(0)
        );

        // A clock reading behind the last attempt never counts as elapsed.
        assert_eq!(
            state.elapsed(Instant::from_secs(50)),
            Duration::from_ticks(0)
        );
        assert!(!state.is_due(Instant::from_secs(50)));
    }

    #[test]
    fn zero_budget_doubles_on_every_failure() {
        let policy = RecoveryPolicy { max_retries: 0, ..policy() };
        let state = RetryState::new(&policy).after(Outcome::Failed, &policy);

        assert_eq!(state.retry_count, 0);
        assert_eq!(state.retry_interval, Duration::from_secs(30));
    }
}
