//! Notification center — transient success/error banners.
//!
//! Each notice gets an independent timer task that removes it after
//! [`AUTO_DISMISS`]. Manual dismissal aborts the timer; removal is keyed by
//! unique id and idempotent, so a timer firing after a manual dismissal (or
//! the other way around) is a no-op.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::debug;

/// How long a notice stays up before automatic dismissal.
pub const AUTO_DISMISS: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

pub type NoticeId = u64;

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: NoticeId,
    pub severity: Severity,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

/// Render seam: the center pushes lifecycle events here and never touches
/// the terminal itself.
pub trait NoticeSink: Send + Sync {
    fn posted(&self, notice: &Notice);
    fn removed(&self, notice: &Notice);
}

struct Entry {
    notice: Notice,
    timer: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Inner {
    next_id: NoticeId,
    active: Vec<Entry>,
}

pub struct NotificationCenter {
    inner: Arc<Mutex<Inner>>,
    sink: Arc<dyn NoticeSink>,
}

impl NotificationCenter {
    pub fn new(sink: Arc<dyn NoticeSink>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            sink,
        }
    }

    /// Posts a banner and schedules its automatic removal.
    pub fn post(&self, severity: Severity, message: impl Into<String>) -> NoticeId {
        let notice = {
            let mut inner = self.inner.lock().expect("notice table poisoned");
            let id = inner.next_id;
            inner.next_id += 1;
            let notice = Notice {
                id,
                severity,
                message: message.into(),
                posted_at: Utc::now(),
            };
            inner.active.push(Entry {
                notice: notice.clone(),
                timer: None,
            });
            notice
        };
        self.sink.posted(&notice);

        let timer = tokio::spawn({
            let inner = Arc::clone(&self.inner);
            let sink = Arc::clone(&self.sink);
            let id = notice.id;
            async move {
                tokio::time::sleep(AUTO_DISMISS).await;
                if let Some(entry) = remove_entry(&inner, id) {
                    debug!(id, "notice expired");
                    sink.removed(&entry.notice);
                }
            }
        });

        let mut inner = self.inner.lock().expect("notice table poisoned");
        match inner.active.iter_mut().find(|e| e.notice.id == notice.id) {
            Some(entry) => entry.timer = Some(timer),
            // Already gone (dismissed or expired before the handle landed).
            None => timer.abort(),
        }
        notice.id
    }

    /// Dismisses a notice before its timer fires. Returns false when the id
    /// is unknown — already expired or already dismissed.
    pub fn dismiss(&self, id: NoticeId) -> bool {
        match remove_entry(&self.inner, id) {
            Some(entry) => {
                if let Some(timer) = entry.timer {
                    timer.abort();
                }
                debug!(id, "notice dismissed manually");
                self.sink.removed(&entry.notice);
                true
            }
            None => false,
        }
    }

    /// Currently visible notices, oldest first.
    pub fn active(&self) -> Vec<Notice> {
        let inner = self.inner.lock().expect("notice table poisoned");
        inner.active.iter().map(|e| e.notice.clone()).collect()
    }
}

fn remove_entry(inner: &Mutex<Inner>, id: NoticeId) -> Option<Entry> {
    let mut inner = inner.lock().expect("notice table poisoned");
    let index = inner.active.iter().position(|e| e.notice.id == id)?;
    Some(inner.active.remove(index))
}
