//=========================================================================
// Pawn
//=========================================================================
//
// Connection between the active game mode's actor object and a Player.
//
// A pawn is created by the GameMode during its load sequence and lives
// exactly as long as that mode. It carries no logic of its own.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::Player;
use crate::core::scene::SceneHost;
use crate::GameInstance;

/// Name given to the placeholder object created when a mode has no pawn
/// template.
pub const DEFAULT_PAWN_NAME: &str = "DefaultPawn";

//=== ObjectId ============================================================

/// Handle to an engine-side scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

//=== PawnTemplate ========================================================

/// Engine asset a game mode instantiates as its pawn.
///
/// The instantiated object is named after the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PawnTemplate {
    name: String,
}

impl PawnTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

//=== Pawn ================================================================

/// Binding between a scene object and the [`Player`] it represents.
#[derive(Debug, Clone)]
pub struct Pawn {
    object: ObjectId,
    name: String,
    player: Rc<Player>,
    placeholder: bool,
}

impl Pawn {
    pub(crate) fn new(object: ObjectId, name: impl Into<String>, player: Rc<Player>, placeholder: bool) -> Self {
        Self {
            object,
            name: name.into(),
            player,
            placeholder,
        }
    }

    /// The player this pawn represents.
    pub fn player(&self) -> &Rc<Player> {
        &self.player
    }

    /// Rebinds the pawn to another player.
    pub fn set_player(&mut self, player: Rc<Player>) {
        self.player = player;
    }

    /// The scene object carrying this binding.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Name of the scene object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the mode had no pawn template and an empty object
    /// was created instead.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// The pawn of the active game mode.
    pub fn local<H: SceneHost>(instance: &GameInstance<H>) -> Option<&Pawn> {
        instance.local_pawn()
    }
}

//=========================================================================
// Tests
//=========================================================================
