use std::time::{Duration, Instant};

/// Default time after which a held selection lock is treated as abandoned.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(20);

/// Single-owner mutual exclusion for one tree instance.
///
/// The lock serializes structural tree operations (drill-down, refresh,
/// mutation reconciliation) so their loads and renders never interleave.
/// A hold older than the configured timeout is treated as abandoned and
/// cleared on the next check, because a completion path that never calls
/// back must not freeze the tree forever. The lock is a plain value owned
/// by its tree instance; it is never shared between instances.
#[derive(Debug)]
pub struct SelectionLock {
    held_since: Option<Instant>,
    reason: String,
    timeout: Duration,
}

impl SelectionLock {
    /// Create an unlocked lock with the given stale timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            held_since: None,
            reason: String::new(),
            timeout,
        }
    }

    /// Return whether the lock is currently held.
    ///
    /// A hold older than the timeout is cleared by this check and reported
    /// as unlocked.
    pub fn is_locked(&mut self) -> bool {
        let Some(held_since) = self.held_since else {
            return false;
        };

        if held_since.elapsed() >= self.timeout {
            log::warn!(
                "selection lock held by \"{}\" for over {:?}, treating as \
                 abandoned",
                self.reason,
                self.timeout
            );
            self.clear();
            return false;
        }

        true
    }

    /// Acquire the lock.
    ///
    /// Fails when already held unless `force` is set, in which case the new
    /// reason overrides the old one.
    pub fn lock(&mut self, reason: &str, force: bool) -> bool {
        if self.is_locked() {
            if !force {
                return false;
            }
            log::warn!(
                "selection lock held by \"{}\" overridden by \"{reason}\"",
                self.reason
            );
        }

        self.held_since = Some(Instant::now());
        self.reason = reason.to_string();
        true
    }

    /// Release the lock unconditionally.
    ///
    /// A mismatch between `expected_reason` and the held reason is logged,
    /// but the lock is cleared regardless: a best-effort release beats a
    /// stuck lock.
    pub fn unlock(&mut self, expected_reason: Option<&str>) {
        if let Some(expected) = expected_reason {
            if self.held_since.is_some() && expected != self.reason {
                log::warn!(
                    "selection lock released while held by \"{}\", expected \
                     \"{expected}\"",
                    self.reason
                );
            }
        }

        self.clear();
    }

    /// Return the diagnostic reason of the current hold.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn clear(&mut self) {
        self.held_since = None;
        self.reason.clear();
    }
}

impl Default for SelectionLock {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{DEFAULT_LOCK_TIMEOUT, SelectionLock};

    #[test]
    fn given_unlocked_lock_when_locked_then_reason_is_recorded() {
        let mut lock = SelectionLock::default();

        assert!(lock.lock("/content/site", false));
        assert!(lock.is_locked());
        assert_eq!(lock.reason(), "/content/site");
    }

    #[test]
    fn given_held_lock_when_locked_without_force_then_state_is_unchanged() {
        let mut lock = SelectionLock::default();
        lock.lock("first", false);

        assert!(!lock.lock("second", false));
        assert!(lock.is_locked());
        assert_eq!(lock.reason(), "first");
    }

    #[test]
    fn given_held_lock_when_locked_with_force_then_reason_is_overridden() {
        let mut lock = SelectionLock::default();
        lock.lock("first", false);

        assert!(lock.lock("second", true));
        assert!(lock.is_locked());
        assert_eq!(lock.reason(), "second");
    }

    #[test]
    fn given_expired_hold_when_checked_then_lock_clears_itself() {
        let mut lock = SelectionLock::new(Duration::ZERO);
        lock.lock("stuck", false);

        assert!(!lock.is_locked());
        assert_eq!(lock.reason(), "");
        assert!(lock.lock("next", false));
    }

    #[test]
    fn given_mismatched_reason_when_unlocked_then_lock_clears_anyway() {
        let mut lock = SelectionLock::default();
        lock.lock("actual", false);

        lock.unlock(Some("expected"));

        assert!(!lock.is_locked());
    }

    #[test]
    fn given_default_lock_then_timeout_matches_the_documented_constant() {
        assert_eq!(DEFAULT_LOCK_TIMEOUT, Duration::from_secs(20));
    }
}
