use crate::data::trip::{sync_fingerprint, Trip};
use crate::remote::{StoreError, StoreResult, TripStore};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Fires at most once per interval, driven by the caller's clock.
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_due: Instant,
}

impl PollTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        PollTimer {
            interval,
            next_due: now + interval,
        }
    }

    /// True when due; the next deadline is then counted from `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Loop cancelled or interval not yet elapsed.
    Idle,
    Unchanged,
    Updated,
    /// Background failure; callers should not show it.
    Failed(StoreError),
}

/// Read-only refresh of the trip list while not editing.
///
/// The timer exists only while the loop runs: `cancel` drops it, so
/// nothing is left ticking during edit mode.
#[derive(Debug)]
pub struct SyncLoop {
    interval: Duration,
    timer: Option<PollTimer>,
    fingerprint: Option<String>,
}

impl SyncLoop {
    pub fn new(interval: Duration) -> Self {
        SyncLoop {
            interval,
            timer: None,
            fingerprint: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        debug!("sync loop started ({}s)", self.interval.as_secs());
        self.timer = Some(PollTimer::new(self.interval, now));
    }

    pub fn cancel(&mut self) {
        if self.timer.take().is_some() {
            debug!("sync loop cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Remembers `trips` as the last applied state.
    pub fn record(&mut self, trips: &[Trip]) {
        self.fingerprint = Some(sync_fingerprint(trips));
    }

    /// Unconditional fetch used on first load and manual refresh.
    /// On failure `current` is left as it was.
    pub fn load<S: TripStore + ?Sized>(&mut self, store: &S, current: &mut Vec<Trip>) -> StoreResult<()> {
        let fetched = store.fetch_all()?;
        info!("loaded {} trip(s)", fetched.len());
        self.record(&fetched);
        *current = fetched;
        Ok(())
    }

    /// Replaces `current` only when the fingerprint moved.
    pub fn apply(&mut self, fetched: Vec<Trip>, current: &mut Vec<Trip>) -> SyncOutcome {
        let incoming = sync_fingerprint(&fetched);
        if self.fingerprint.as_deref() == Some(incoming.as_str()) {
            return SyncOutcome::Unchanged;
        }
        info!("trip list changed in the background ({} trip(s))", fetched.len());
        self.fingerprint = Some(incoming);
        *current = fetched;
        SyncOutcome::Updated
    }

    /// One scheduler tick: fetch and apply if the timer fired.
    pub fn tick<S: TripStore + ?Sized>(
        &mut self,
        store: &S,
        current: &mut Vec<Trip>,
        now: Instant,
    ) -> SyncOutcome {
        let fired = self.timer.as_mut().is_some_and(|t| t.fire(now));
        if !fired {
            return SyncOutcome::Idle;
        }
        match store.poll() {
            Ok(fetched) => self.apply(fetched, current),
            Err(e) => {
                warn!("background refresh failed: {e}");
                SyncOutcome::Failed(e)
            }
        }
    }
}
