//=========================================================================
// Singleton Guard
//=========================================================================
//
// Fail-fast check for types that must have exactly one live instance.
//
// The framework is single-threaded (player data is `Rc`-shared), so the
// registry of live singletons is thread-local. The guard releases its
// slot on drop, which lets a fresh instance be built after the previous
// one is gone.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashSet;

use log::debug;

thread_local! {
    static LIVE: RefCell<HashSet<&'static str>> = RefCell::new(HashSet::new());
}

//=== SingletonGuard ======================================================

/// Marks a singleton type as live for as long as the guard exists.
#[derive(Debug)]
pub(crate) struct SingletonGuard {
    kind: &'static str,
}

impl SingletonGuard {
    /// Claims the slot for `kind`.
    ///
    /// # Panics
    ///
    /// Panics if another instance of `kind` is still alive.
    pub(crate) fn acquire(kind: &'static str) -> Self {
        let claimed = LIVE.with(|live| live.borrow_mut().insert(kind));
        assert!(claimed, "There can only be one {}", kind);

        debug!("{} instance created", kind);
        Self { kind }
    }
}

impl Drop for SingletonGuard {
    fn drop(&mut self) {
        // try_with: the thread-local may already be torn down at thread exit
        let _ = LIVE.try_with(|live| live.borrow_mut().remove(self.kind));
    }
}

//=========================================================================
// Tests
//=========================================================================
