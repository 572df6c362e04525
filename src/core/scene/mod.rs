//=========================================================================
// Scene System
//=========================================================================
//
// Contract between the framework and the host engine's scene graph.
//
// Architecture:
//   GameInstance / GameMode
//     └─ &mut dyn SceneHost
//          ├─ load_scene / unload_scene → SceneOperation (polled per tick)
//          ├─ set_active_scene
//          ├─ take_game_mode → SpawnedMode
//          ├─ instantiate / create_object
//          └─ release_unused_resources / collect_garbage
//
//=========================================================================

//=== Module Declarations =================================================

mod operation;

//=== Public API ==========================================================

pub use operation::{SceneCompletion, SceneOperation};

//=== Internal Dependencies ===============================================

use crate::core::mode::{GameModeRules, ModeSettings};
use crate::core::player::{ObjectId, PawnTemplate};

//=== LoadSceneMode =======================================================

/// How a scene is loaded into the world.
///
/// The framework always loads with [`Additive`](Self::Additive).
/// [`Single`](Self::Single) exists for hooks that load their own content
/// through [`ModeContext::scenes`](crate::core::globals::ModeContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadSceneMode {
    /// Loaded alongside the scenes already present.
    #[default]
    Additive,

    /// Replaces every loaded scene.
    Single,
}

//=== SpawnedMode =========================================================

/// The game mode a freshly loaded scene produced.
///
/// Returned by [`SceneHost::take_game_mode`]; the framework takes
/// ownership and drives its lifecycle.
pub struct SpawnedMode {
    /// Scene object the mode lives on; placeholder pawns are parented to it.
    pub object: ObjectId,

    /// Pawn template and additive scenes configured for the mode.
    pub settings: ModeSettings,

    /// The mode's hook implementation.
    pub rules: Box<dyn GameModeRules>,
}

impl SpawnedMode {
    pub fn new<R: GameModeRules>(object: ObjectId, settings: ModeSettings, rules: R) -> Self {
        Self {
            object,
            settings,
            rules: Box::new(rules),
        }
    }
}

//=== SceneHost Trait =====================================================

/// Engine-side scene operations required by the framework.
///
/// Asynchronous operations return a [`SceneOperation`]; the framework
/// polls it every tick and never blocks. All methods are called from the
/// single thread that calls [`GameInstance::update`](crate::GameInstance::update).
pub trait SceneHost {
    /// Starts loading `scene`.
    fn load_scene(&mut self, scene: &str, mode: LoadSceneMode) -> SceneOperation;

    /// Starts unloading `scene`.
    fn unload_scene(&mut self, scene: &str) -> SceneOperation;

    /// Makes `scene` the default target for newly spawned objects.
    fn set_active_scene(&mut self, scene: &str);

    /// Hands over the single game mode found in the loaded `scene`.
    fn take_game_mode(&mut self, scene: &str) -> Option<SpawnedMode>;

    /// Instantiates `template` into the active scene.
    fn instantiate(&mut self, template: &PawnTemplate) -> ObjectId;

    /// Creates an empty object, optionally parented under `parent`.
    fn create_object(&mut self, name: &str, parent: Option<ObjectId>) -> ObjectId;

    /// Flags assets no longer referenced by any loaded scene for release.
    fn release_unused_resources(&mut self);

    /// Forces a full collection pass.
    fn collect_garbage(&mut self);
}

//=========================================================================
// Tests
//=========================================================================
