//! Wall-clock time source

use crate::core::traits::Clock;
use chrono::{DateTime, Utc};

/// UTC system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
