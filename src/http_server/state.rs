//! Shared handler state

use crate::executor::SqliteExecutor;

use super::config::ReleaseInfo;

/// Default number of molecules fetched per export page
pub const DEFAULT_EXPORT_PAGE_SIZE: u64 = 50_000;

/// Read-only state shared by every handler
#[derive(Debug, Clone)]
pub struct ApiState {
    pub executor: SqliteExecutor,
    pub export_page_size: u64,
    pub release: ReleaseInfo,
}

impl ApiState {
    pub fn new(executor: SqliteExecutor) -> Self {
        Self {
            executor,
            export_page_size: DEFAULT_EXPORT_PAGE_SIZE,
            release: ReleaseInfo::default(),
        }
    }

    pub fn with_export_page_size(mut self, page_size: u64) -> Self {
        self.export_page_size = page_size.max(1);
        self
    }

    pub fn with_release(mut self, release: ReleaseInfo) -> Self {
        self.release = release;
        self
    }
}
