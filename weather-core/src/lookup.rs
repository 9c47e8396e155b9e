//! Lookup state machine.
//!
//! Every submission moves the machine to `InFlight`, issues one provider call
//! and later settles into `Succeeded` or `Failed`. Submissions are numbered;
//! only the most recent one may settle the outcome or close the transition
//! window, so an older request that answers late cannot overwrite a newer one.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    config::DEFAULT_TRANSITION_MS,
    model::{LOOKUP_FAILED_REASON, LookupOutcome, LookupRequest, LookupState, WeatherReading},
    provider::{LookupError, WeatherProvider},
};

#[derive(Debug, Clone)]
pub struct LookupMachine {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    provider: Arc<dyn WeatherProvider>,
    state: watch::Sender<LookupState>,
    /// Sequence number of the newest submission. Only touched while holding
    /// the watch channel's write lock.
    latest: AtomicU64,
    window: Duration,
}

impl LookupMachine {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self::with_transition_window(provider, Duration::from_millis(DEFAULT_TRANSITION_MS))
    }

    pub fn with_transition_window(provider: Arc<dyn WeatherProvider>, window: Duration) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self {
            inner: Arc::new(Inner { provider, state, latest: AtomicU64::new(0), window }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LookupState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.inner.state.subscribe()
    }

    /// Start a lookup for `query` and return immediately.
    ///
    /// The outcome arrives through [`state`](Self::state) and
    /// [`subscribe`](Self::subscribe). Must be called from within a tokio
    /// runtime.
    pub fn submit_location(&self, query: impl Into<String>) {
        let request = LookupRequest::new(query);
        let mut seq = 0;

        self.inner.state.send_modify(|state| {
            seq = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;

            // Keep whatever reading is on screen; drop any error.
            let stale = match std::mem::take(&mut state.outcome) {
                LookupOutcome::Succeeded(reading) => Some(reading),
                LookupOutcome::InFlight => state.stale.take(),
                LookupOutcome::Idle | LookupOutcome::Failed(_) => None,
            };

            state.outcome = LookupOutcome::InFlight;
            state.stale = stale;
            state.submitted = true;
        });

        debug!(seq, query = %request.location_query, "weather lookup submitted");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.window).await;
            inner.close_window(seq);
        });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.provider.current(&request.location_query).await;
            inner.settle(seq, &request, result);
        });
    }

    /// Wait until the newest submission has settled. Returns the idle state
    /// right away if nothing was ever submitted.
    pub async fn settled(&self) -> LookupState {
        let mut rx = self.subscribe();
        let ready = |state: &LookupState| {
            state.outcome.is_settled() || state.outcome == LookupOutcome::Idle
        };
        match rx.wait_for(ready).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl Inner {
    fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    fn settle(&self, seq: u64, request: &LookupRequest, result: Result<WeatherReading, LookupError>) {
        let outcome = match result {
            Ok(reading) => {
                debug!(seq, category = ?reading.condition_category, "weather lookup succeeded");
                LookupOutcome::Succeeded(reading)
            }
            Err(err) => {
                warn!(seq, query = %request.location_query, error = %err, "weather lookup failed");
                LookupOutcome::Failed(LOOKUP_FAILED_REASON.to_string())
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if !self.is_latest(seq) {
                return false;
            }
            state.outcome = outcome;
            state.stale = None;
            true
        });

        if !applied {
            debug!(seq, "discarding result of superseded lookup");
        }
    }

    fn close_window(&self, seq: u64) {
        self.state.send_if_modified(|state| {
            if !self.is_latest(seq) || !state.submitted {
                return false;
            }
            state.submitted = false;
            true
        });
    }
}
