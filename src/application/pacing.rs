use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(150);

/// Delays applied by a batch run. The upstream quota is per minute, so
/// every request is spaced by at least `request_delay`, across cities too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    pub request_delay: Duration,
    pub city_pause: Duration,
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            request_delay: Duration::ZERO,
            city_pause: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            request_delay: DEFAULT_REQUEST_DELAY,
            city_pause: Duration::ZERO,
        }
    }
}

/// Enforces a minimum gap between consecutive requests.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    /// Sleep until `delay` has passed since the previous call, then mark now.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            tokio::time::sleep_until(last + self.delay).await;
        }
        self.last = Some(Instant::now());
    }
}
