//=========================================================================
// Game Mode System
//=========================================================================
//
// Rules and lifecycle of one gameplay scene.
//
// Architecture:
//   GameMode (fixed lifecycle, owned by the GameInstance)
//     ├─ rules: Box<dyn GameModeRules>   (user hooks)
//     ├─ settings: ModeSettings          (pawn template, additive scenes)
//     ├─ data: ModeData                  (hand-off from the previous mode)
//     └─ pawn: Pawn                      (bound to the local player)
//
// Flow:
//   Loading → Active → Unloading → Unloaded
//
//=========================================================================

//=== Module Declarations =================================================

mod data;
mod game_mode;

//=== Public API ==========================================================

pub use data::ModeData;
pub use game_mode::{GameMode, ModeState};

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::globals::ModeContext;
use crate::core::player::{Pawn, PawnTemplate};

//=== Progress ============================================================

/// Result of polling an asynchronous hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Poll again next tick.
    Running,

    /// The hook is done.
    Finished,
}

//=== ModeSettings ========================================================

/// Per-mode configuration supplied with the scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSettings {
    /// Template instantiated as the pawn. `None` creates a placeholder.
    pub pawn_template: Option<PawnTemplate>,

    /// Scenes loaded in order after the pawn exists, and unloaded with the
    /// mode.
    pub additive_scenes: Vec<String>,
}

impl ModeSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pawn(mut self, template: PawnTemplate) -> Self {
        self.pawn_template = Some(template);
        self
    }

    pub fn with_additive_scene(mut self, scene: impl Into<String>) -> Self {
        self.additive_scenes.push(scene.into());
        self
    }
}

//=== AsAny ===============================================================

/// Upcast to `Any` so the active mode can be narrowed to its concrete type.
///
/// Implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== GameModeRules Trait =================================================

/// Customization points of a game mode.
///
/// The lifecycle itself is fixed (see [`GameMode`]); implementations only
/// fill in these steps. Every hook has a default, so a mode without
/// custom behavior is just:
///
/// ```rust
/// # use aetheric_gameplay::prelude::*;
/// struct Sandbox;
///
/// impl GameModeRules for Sandbox {}
/// ```
///
/// Asynchronous hooks return [`Progress::Running`] to be polled again on
/// the next tick.
pub trait GameModeRules: AsAny {
    /// Last step of loading; additive scenes are already loaded.
    fn on_load(&mut self, _context: &mut ModeContext<'_>) -> Progress {
        Progress::Finished
    }

    /// First step of unloading.
    ///
    /// Persist state here: the instance waits for this hook before any
    /// scene is torn down.
    fn on_unload(&mut self, _context: &mut ModeContext<'_>) -> Progress {
        Progress::Finished
    }

    /// Configures the freshly created pawn before any of its own startup
    /// logic has run.
    fn on_initialize_pawn(&mut self, _pawn: &mut Pawn) {}

    /// Reads the hand-off data.
    fn on_parse_data(&mut self, _data: &ModeData) {}

    /// Data used when the previous mode handed nothing over.
    fn on_write_default_data(&self) -> ModeData {
        ModeData::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
