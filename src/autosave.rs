//! Debounced commits for free-text fields that change on every keystroke.
//!
//! A [`Debouncer`] holds at most one pending value. Each [`Debouncer::push`]
//! restarts the quiet period and replaces whatever was pending; once the
//! period elapses without another push, the value is delivered on the
//! receiver returned by the constructor. Dropping the debouncer discards a
//! pending value, so call [`Debouncer::flush`] first if it must be kept.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub const AUTOSAVE_QUIET_PERIOD: Duration = Duration::from_millis(1500);

pub struct Debouncer<T> {
    quiet_period: Duration,
    tx: UnboundedSender<T>,
    pending: Option<Pending<T>>,
}

struct Pending<T> {
    value: T,
    timer: JoinHandle<()>,
    /// Set once the value is delivered or discarded.
    claimed: Arc<AtomicBool>,
}

impl<T> Pending<T> {
    fn claim(&self) -> bool {
        !self.claimed.swap(true, Ordering::AcqRel)
    }
}

impl<T> Debouncer<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        Self::with_quiet_period(AUTOSAVE_QUIET_PERIOD)
    }

    pub fn with_quiet_period(quiet_period: Duration) -> (Self, UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            quiet_period,
            tx,
            pending: None,
        };
        (debouncer, rx)
    }

    /// Schedules `value` for delivery, superseding any pending value.
    /// Must be called from within a tokio runtime.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let tx = self.tx.clone();
        let quiet_period = self.quiet_period;
        let delivered = value.clone();
        let claimed = Arc::new(AtomicBool::new(false));
        let timer_claimed = Arc::clone(&claimed);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if !timer_claimed.swap(true, Ordering::AcqRel) {
                let _ = tx.send(delivered);
            }
        });
        self.pending = Some(Pending {
            value,
            timer,
            claimed,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.claimed.load(Ordering::Acquire))
    }

    /// Delivers the pending value now. Returns `false` if nothing was
    /// waiting or the timer already delivered it; a value is never sent twice.
    pub fn flush(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        pending.timer.abort();
        if !pending.claim() {
            return false;
        }
        self.tx.send(pending.value).is_ok()
    }

    /// Drops the pending value without delivering it.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.claim();
            pending.timer.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            if pending.claim() {
                tracing::debug!("discarding unsaved autosave edit");
            }
            pending.timer.abort();
        }
    }
}
