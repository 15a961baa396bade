use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const COMPLETE: f64 = 100.0;

/// Highest value the simulated ticking may reach on its own; only
/// resolution of the request moves the indicator to `COMPLETE`.
pub const SIMULATED_CEILING: f64 = 95.0;

const DEFAULT_TICK: Duration = Duration::from_millis(500);
const MAX_STEP: f64 = 20.0;

/// Cosmetic progress for one in-flight request. There is no real progress
/// signal from the server; the value only advances on a timer.
#[derive(Clone)]
pub struct ProgressIndicator {
    tx: Arc<watch::Sender<f64>>,
    tick: Duration,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self::with_tick(DEFAULT_TICK)
    }

    pub fn with_tick(tick: Duration) -> Self {
        let (tx, _rx) = watch::channel(0.0);
        Self {
            tx: Arc::new(tx),
            tick,
        }
    }

    pub fn value(&self) -> f64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }

    /// Resets to 0 and starts ticking. Must be called from within a Tokio
    /// runtime. Dropping the guard stops the ticker and sets `COMPLETE`.
    pub fn start(&self) -> ProgressGuard {
        self.tx.send_replace(0.0);

        let tx = Arc::clone(&self.tx);
        let tick = self.tick;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !advance(&tx) {
                    break;
                }
            }
        });

        ProgressGuard {
            tx: Arc::clone(&self.tx),
            task,
        }
    }
}

/// One simulated step. Never lowers a value at or past the ceiling, so a
/// tick racing with `ProgressGuard::drop` cannot overwrite `COMPLETE`.
/// Returns whether ticking should continue.
fn advance(tx: &watch::Sender<f64>) -> bool {
    let mut below_ceiling = false;
    tx.send_if_modified(|value| {
        if *value >= SIMULATED_CEILING {
            return false;
        }
        *value = (*value + fastrand::f64() * MAX_STEP).min(SIMULATED_CEILING);
        below_ceiling = *value < SIMULATED_CEILING;
        true
    });
    below_ceiling
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ProgressGuard {
    tx: Arc<watch::Sender<f64>>,
    task: JoinHandle<()>,
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.task.abort();
        self.tx.send_replace(COMPLETE);
    }
}
