//! Transient notifications. Each toast removes itself after the configured TTL when a
//! tokio runtime is available; the CLI drains and prints whatever is pending after
//! every command.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

struct Inner {
    next_id: AtomicU64,
    ttl: Duration,
    tx: watch::Sender<Vec<Toast>>,
}

impl Inner {
    fn remove(&self, id: u64) {
        self.tx.send_if_modified(|list| {
            let before = list.len();
            list.retain(|t| t.id != id);
            before != list.len()
        });
    }
}

/// Cheap to clone; all clones share one queue.
#[derive(Clone)]
pub struct Toasts {
    inner: Arc<Inner>,
}

impl Toasts {
    /// A zero `ttl` keeps toasts until dismissed or drained.
    pub fn new(ttl: Duration) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self { inner: Arc::new(Inner { next_id: AtomicU64::new(1), ttl, tx }) }
    }

    pub fn success<M: Into<String>>(&self, message: M) -> u64 { self.push(ToastKind::Success, message.into()) }

    pub fn error<M: Into<String>>(&self, message: M) -> u64 { self.push(ToastKind::Error, message.into()) }

    pub fn info<M: Into<String>>(&self, message: M) -> u64 { self.push(ToastKind::Info, message.into()) }

    fn push(&self, kind: ToastKind, message: String) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(target: "carro_admin::notify", id, ?kind, %message, "toast");
        self.inner.tx.send_modify(|list| list.push(Toast { id, kind, message }));
        if !self.inner.ttl.is_zero() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let weak: Weak<Inner> = Arc::downgrade(&self.inner);
                let ttl = self.inner.ttl;
                handle.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    if let Some(inner) = weak.upgrade() {
                        trace!(target: "carro_admin::notify", id, "toast expired");
                        inner.remove(id);
                    }
                });
            }
        }
        id
    }

    pub fn dismiss(&self, id: u64) { self.inner.remove(id); }

    pub fn clear(&self) {
        self.inner.tx.send_if_modified(|list| {
            let changed = !list.is_empty();
            list.clear();
            changed
        });
    }

    pub fn current(&self) -> Vec<Toast> { self.inner.tx.borrow().clone() }

    /// Take every pending toast, leaving the queue empty.
    pub fn drain(&self) -> Vec<Toast> {
        let mut out = Vec::new();
        self.inner.tx.send_if_modified(|list| {
            out = std::mem::take(list);
            !out.is_empty()
        });
        out
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> { self.inner.tx.subscribe() }
}

impl Default for Toasts {
    fn default() -> Self { Self::new(Duration::from_millis(crate::config::DEFAULT_TOAST_TTL_MS)) }
}
