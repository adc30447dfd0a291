//! Millisecond timestamps

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Milliseconds since the Unix epoch, as produced by `Date.now()` on clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Current wall-clock time
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Wrap a raw millisecond value
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Raw millisecond value
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
