use std::sync::atomic::{AtomicBool, Ordering};

/// One-shot flag: profile reconciliation runs at most once per session.
#[derive(Debug, Default)]
pub struct SessionGuard {
    claimed: AtomicBool,
}

impl SessionGuard {
    /// Returns true exactly once until the next `reset`.
    pub fn try_claim(&self) -> bool {
        !self.claimed.swap(true, Ordering::AcqRel)
    }

    pub fn reset(&self) {
        self.claimed.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_once_until_reset() {
        let guard = SessionGuard::default();
        assert!(guard.try_claim());
        assert!(!guard.try_claim());
        guard.reset();
        assert!(guard.try_claim());
    }
}
