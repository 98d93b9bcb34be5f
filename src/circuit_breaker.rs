//! # Circuit Breaker Module
//!
//! Stops calling the text-generation service after repeated failures so a
//! struggling endpoint is not hammered while the deterministic estimators
//! carry the load.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::RecoveryConfig;

/// Circuit breaker for text-generation calls
///
/// # State Machine
///
/// - **Closed**: calls pass through
/// - **Open**: failure threshold reached, calls are skipped
/// - **Half-Open**: reset timeout elapsed, the next call is let through
///
/// Uses `circuit_breaker_threshold` and `circuit_breaker_reset_secs` from
/// [`RecoveryConfig`].
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    config: RecoveryConfig,
}

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nutrition_coach::config::RecoveryConfig;
    /// use nutrition_coach::circuit_breaker::CircuitBreaker;
    ///
    /// let breaker = CircuitBreaker::new(RecoveryConfig::default());
    /// assert!(!breaker.is_open());
    /// ```
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    // A panic while holding the lock leaves plain counters behind, which are
    // still meaningful.
    fn lock_state(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check if the circuit is open (calls should be skipped)
    ///
    /// Resets to closed once the reset timeout has elapsed since the last
    /// failure.
    pub fn is_open(&self) -> bool {
        let mut state = self.lock_state();

        if state.failure_count >= self.config.circuit_breaker_threshold {
            if let Some(last_time) = state.last_failure_time {
                if last_time.elapsed() < Duration::from_secs(self.config.circuit_breaker_reset_secs) {
                    return true;
                }
                *state = BreakerState::default();
            }
        }
        false
    }

    /// Record a failed call
    pub fn record_failure(&self) {
        let mut state = self.lock_state();
        state.failure_count = state.failure_count.saturating_add(1);
        state.last_failure_time = Some(Instant::now());
    }

    /// Record a successful call, closing the circuit
    pub fn record_success(&self) {
        *self.lock_state() = BreakerState::default();
    }

    /// Consecutive failures since the last success or reset
    pub fn failure_count(&self) -> u32 {
        self.lock_state().failure_count
    }
}
