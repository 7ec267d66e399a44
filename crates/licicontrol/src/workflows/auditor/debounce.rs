use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use super::rules::{audit_text, AuditReport, MINIMUM_AUDIT_LENGTH};

pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(800);

/// Latest published audit plus whether a recomputation is pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditState {
    pub report: AuditReport,
    pub analyzing: bool,
}

/// Reruns the audit once the draft has been quiet for the debounce delay.
///
/// Each [`update`](Self::update) cancels the pending computation, so only the last buffer of
/// a burst is scored. A computation that already woke up still checks its generation before
/// publishing, so it can never overwrite a newer buffer's state. Must be driven from inside a
/// tokio runtime.
pub struct AuditDebouncer {
    delay: Duration,
    state: Arc<watch::Sender<AuditState>>,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl AuditDebouncer {
    pub fn new() -> Self {
        Self::with_delay(DEBOUNCE_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        let (state, _) = watch::channel(AuditState::default());
        Self {
            delay,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuditState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> AuditState {
        self.state.borrow().clone()
    }

    pub fn update(&self, text: impl Into<String>) {
        let text = text.into();
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Bumped before any publish below so a woken task sees it inside the watch lock.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        if text.chars().count() < MINIMUM_AUDIT_LENGTH {
            self.state.send_replace(AuditState::default());
            return;
        }

        self.state.send_modify(|state| state.analyzing = true);

        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let report = audit_text(&text);
            let published = state.send_if_modified(|slot| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *slot = AuditState {
                    report,
                    analyzing: false,
                };
                true
            });
            trace!(generation, published, "audit recomputed");
        }));
    }
}

impl Default for AuditDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AuditDebouncer {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
