// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Injectable time source (§4 "Clock abstraction"). The executor and stage
//! modules record `started_at`/`finished_at`/`duration_seconds` through
//! this trait instead of calling `Utc::now()` directly, so tests can pin
//! the clock.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn elapsed(&self, since: DateTime<Utc>) -> Duration {
        self.now_utc() - since
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant, for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub type SharedClock = Arc<dyn Clock>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_never_advances() {
        let t = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = FixedClock(t);
        assert_eq!(clock.now_utc(), t);
        assert_eq!(clock.elapsed(t), Duration::zero());
    }
}
