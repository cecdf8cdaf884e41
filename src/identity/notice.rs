use parking_lot::Mutex;
use tracing::{info, warn};

/// User-visible outcome notifications emitted by the session store, one per
/// completed operation. The view layer renders these as toasts or banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn info<T: Into<String>, D: Into<String>>(title: T, detail: D) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn error<T: Into<String>, D: Into<String>>(title: T, detail: D) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default sink: forwards notices to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotices;

impl NoticeSink for TracingNotices {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            NoticeSeverity::Info => {
                info!(target: "anteroom::notice", title = %notice.title, detail = %notice.detail)
            }
            NoticeSeverity::Error => {
                warn!(target: "anteroom::notice", title = %notice.title, detail = %notice.detail)
            }
        }
    }
}

/// Collecting sink for tests and headless harnesses.
#[derive(Debug, Default)]
pub struct MemoryNotices {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notices.lock().iter().map(|n| n.title.clone()).collect()
    }

    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl NoticeSink for MemoryNotices {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
