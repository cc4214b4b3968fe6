/// Per-loop gate that turns the per-frame heartbeat into a coarse
/// wall-clock timer: a tick is accepted only when the configured interval
/// has elapsed since the last accepted tick. Rejected ticks are dropped,
/// never queued.
#[derive(Debug)]
pub(crate) struct ThrottleGate {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl ThrottleGate {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    pub(crate) fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}
