use std::time::Duration;

use crate::lock::DEFAULT_LOCK_TIMEOUT;
use crate::path::NodePath;

/// Runtime configuration of one tree browser instance.
///
/// The root path and the content filter are runtime-settable through the
/// command stream; changing either triggers a full tree refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    root: NodePath,
    filter: Option<String>,
    lock_timeout: Duration,
}

impl BrowserConfig {
    /// Create a configuration rooted at the namespace root with no filter.
    pub fn new() -> Self {
        Self {
            root: NodePath::root(),
            filter: None,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Set the configured root path.
    pub fn with_root(mut self, root: NodePath) -> Self {
        self.root = root;
        self
    }

    /// Set the content filter passed to the data source.
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }

    /// Set the stale timeout of the selection lock.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Return the configured root path.
    pub fn root(&self) -> &NodePath {
        &self.root
    }

    /// Return the configured content filter.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Return the stale timeout of the selection lock.
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    pub(crate) fn set_root(&mut self, root: NodePath) {
        self.root = root;
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self::new()
    }
}
