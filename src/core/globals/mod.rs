//=========================================================================
// Global Framework State
//=========================================================================
//
// Separates the single-instance bookkeeping from the data handed to game
// mode hooks.
//
// Architecture:
//   SingletonGuard: one live GameInstance / ConfigRepository per thread
//   ModeContext:    SceneHost + local Player + ConfigRepository (passed to hooks)
//                   + next-mode request slot, drained by the GameInstance
//
//=========================================================================

//=== Module Declarations =================================================

mod mode_context;
mod singleton;

//=== Public API ==========================================================

pub use mode_context::ModeContext;
pub(crate) use mode_context::ModeRequest;
pub(crate) use singleton::SingletonGuard;
