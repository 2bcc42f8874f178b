//! Search budgets and deadline tracking.
//!
//! A budget bounds one scoring call:
//! - Fixed depth (the only limit that keeps in-process scores reproducible)
//! - Movetime and node hints, forwarded to external engines
//! - A hard timeout after which the call fails

use std::time::{Duration, Instant};

/// Limits for one scoring call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBudget {
    /// Search depth in plies
    pub depth: u32,
    /// Engine thinking time per call (ms), external engines only
    pub movetime_ms: Option<u64>,
    /// Node limit per call, external engines only
    pub nodes: Option<u64>,
    /// Hard wall-clock limit for the whole call
    pub timeout: Duration,
}

impl SearchBudget {
    pub fn depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            depth: 6,
            movetime_ms: None,
            nodes: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Wall-clock deadline for a search
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn start(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    #[inline]
    pub fn limit(&self) -> Duration {
        self.limit
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }

    /// Time left, zero once expired
    #[inline]
    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.start.elapsed())
    }
}
