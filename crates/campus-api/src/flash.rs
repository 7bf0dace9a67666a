use std::time::{Duration, Instant};

/// How long an inline notice stays visible.
pub const FLASH_TTL: Duration = Duration::from_secs(3);

/// A transient inline message that reads as cleared once `FLASH_TTL` has passed.
#[derive(Debug, Clone)]
pub struct Flash {
    message: String,
    raised_at: Instant,
}

impl Flash {
    pub fn new(message: impl Into<String>) -> Self {
        Self::raised_at(message, Instant::now())
    }

    pub fn raised_at(message: impl Into<String>, raised_at: Instant) -> Self {
        Self {
            message: message.into(),
            raised_at,
        }
    }

    pub fn visible_at(&self, now: Instant) -> Option<&str> {
        (now.saturating_duration_since(self.raised_at) < FLASH_TTL).then_some(self.message.as_str())
    }
}
