//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_gameplay::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Coordinator
pub use crate::{GameInstance, GameInstanceBuilder};

// Game modes
pub use crate::core::globals::ModeContext;
pub use crate::core::mode::{GameMode, GameModeRules, ModeData, ModeSettings, ModeState, Progress};

// Players and pawns
pub use crate::core::player::{ObjectId, Pawn, PawnTemplate, Player, PlayerState, PlayerTemplate, StateRef, StateSlot};

// Scene hosting
pub use crate::core::scene::{LoadSceneMode, SceneCompletion, SceneHost, SceneOperation, SpawnedMode};

// Configuration and errors
pub use crate::core::config::ConfigRepository;
pub use crate::core::error::FrameworkError;
