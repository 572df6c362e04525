//=========================================================================
// Mode Context
//=========================================================================
//
// Shared data container for game mode hooks.
//
// Contains what a mode may touch while it loads or unloads:
// - scenes: the engine collaborator (scene loading, spawning)
// - local_player: the persistent player owned by the GameInstance
// - config: the configuration repository
// - a request slot for the next game mode
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::config::ConfigRepository;
use crate::core::mode::ModeData;
use crate::core::player::Player;
use crate::core::scene::SceneHost;

//=== ModeRequest =========================================================

/// A game mode load requested from inside a hook.
pub(crate) struct ModeRequest {
    pub(crate) id: String,
    pub(crate) data: Option<ModeData>,
}

//=== ModeContext =========================================================

/// Context handed to [`GameModeRules`](crate::core::mode::GameModeRules)
/// hooks while they run.
///
/// Built by the [`GameInstance`](crate::GameInstance) for every tick of a
/// mode's lifecycle. Hooks that need to load extra content or look up
/// settings do it through this context instead of a global.
pub struct ModeContext<'a> {
    /// Engine collaborator for scene and object operations.
    pub scenes: &'a mut dyn SceneHost,

    /// The local player; new pawns are bound to it.
    pub local_player: &'a Rc<Player>,

    /// Static configuration lookup.
    pub config: &'a ConfigRepository,

    request: Option<ModeRequest>,
}

impl<'a> ModeContext<'a> {
    /// Creates a context over the given collaborators.
    pub fn new(
        scenes: &'a mut dyn SceneHost,
        local_player: &'a Rc<Player>,
        config: &'a ConfigRepository,
    ) -> Self {
        Self {
            scenes,
            local_player,
            config,
            request: None,
        }
    }

    //--- Mode Requests ----------------------------------------------------

    /// Asks the instance to load the mode in scene `id`, optionally handing
    /// it `data`.
    ///
    /// The instance picks the request up once the current tick of the mode
    /// is done, with the same checks as
    /// [`GameInstance::load_mode`](crate::GameInstance::load_mode): a
    /// request made while another transition is in flight is dropped with a
    /// warning. Only the first request per tick is kept.
    ///
    /// # Panics
    ///
    /// Panics if `id` is empty.
    pub fn request_mode(&mut self, id: impl Into<String>, data: Option<ModeData>) {
        let id = id.into();
        assert!(!id.is_empty(), "GameMode id is empty");

        if let Some(pending) = &self.request {
            warn!("Ignoring request for game mode {}: {} was already requested", id, pending.id);
            return;
        }
        self.request = Some(ModeRequest { id, data });
    }

    /// Scene id of the mode requested during this tick.
    pub fn requested_mode(&self) -> Option<&str> {
        self.request.as_ref().map(|request| request.id.as_str())
    }

    pub(crate) fn take_request(&mut self) -> Option<ModeRequest> {
        self.request.take()
    }
}

//=========================================================================
// Tests
//=========================================================================
