//! Search budget configuration.
//!
//! The engine itself only knows continuation predicates; [`EngineConfig`]
//! is the usual way of building one from an iteration count and an optional
//! wall-clock limit.

use std::time::{Duration, Instant};

/// Engine configuration parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Maximum number of search iterations per call.
    pub iterations: usize,

    /// Optional wall-clock limit per call.
    /// Checked between iterations, so the last iteration may overrun it.
    pub time_limit: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            time_limit: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with the specified number of iterations.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Create a config bounded by a time limit as well as the default
    /// iteration count.
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self {
            time_limit: Some(time_limit),
            ..Default::default()
        }
    }

    /// Continuation predicate for [`crate::Engine::run_while`].
    ///
    /// The clock starts when this is called. Each `true` answer accounts for
    /// one iteration.
    pub fn budget(&self) -> impl FnMut() -> bool {
        let limit = self.iterations;
        let deadline = self.time_limit.map(|limit| Instant::now() + limit);
        let mut started = 0usize;

        move || {
            if started >= limit {
                return false;
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return false;
                }
            }
            started += 1;
            true
        }
    }
}
