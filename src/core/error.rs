//=========================================================================
// Framework Errors
//=========================================================================
//
// Recoverable usage errors surfaced to callers.
//
// Invariant violations (second singleton, empty mode id, missing game
// mode in a loaded scene) are not represented here: they panic at the
// call site, the same way builder parameters are asserted.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== FrameworkError ======================================================

/// Errors returned by the non-fatal framework entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameworkError {
    /// A game mode transition was requested while another one is still
    /// running.
    #[error("cannot load game mode `{requested}`: transition to `{pending}` is still in flight")]
    TransitionInFlight { requested: String, pending: String },

    /// No configuration object of the requested type was registered.
    #[error("{type_name} does not exist")]
    MissingConfig { type_name: &'static str },
}

/// Result alias used across the framework.
pub type Result<T> = std::result::Result<T, FrameworkError>;

//=========================================================================
// Tests
//=========================================================================
