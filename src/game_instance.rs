//=========================================================================
// Game Instance
//
// Process-wide coordinator for game mode transitions.
//
// Architecture:
// ```text
//     GameInstanceBuilder  ──build(host)──>  GameInstance  ──update()──>  [per tick]
//         │                                     │
//         ├─ with_first_mode()                  ├─ active GameMode  (lifecycle tick)
//         └─ with_config()                      └─ Transition       (unload → cleanup → load)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::ConfigRepository;
use crate::core::error::{FrameworkError, Result};
use crate::core::globals::{ModeContext, ModeRequest, SingletonGuard};
use crate::core::mode::{GameMode, GameModeRules, ModeData, ModeState};
use crate::core::player::{ObjectId, Pawn, Player, PlayerTemplate};
use crate::core::scene::SceneHost;
use crate::core::transition::Transition;

//=== GameInstanceBuilder =================================================

/// Builder for configuring and constructing a [`GameInstance`].
///
/// # Examples
///
/// ```rust
/// # use aetheric_gameplay::prelude::*;
/// # struct Host;
/// # impl SceneHost for Host {
/// #     fn load_scene(&mut self, s: &str, _: LoadSceneMode) -> SceneOperation { SceneOperation::completed(s) }
/// #     fn unload_scene(&mut self, s: &str) -> SceneOperation { SceneOperation::completed(s) }
/// #     fn set_active_scene(&mut self, _: &str) {}
/// #     fn take_game_mode(&mut self, _: &str) -> Option<SpawnedMode> { None }
/// #     fn instantiate(&mut self, _: &PawnTemplate) -> ObjectId { ObjectId(0) }
/// #     fn create_object(&mut self, _: &str, _: Option<ObjectId>) -> ObjectId { ObjectId(0) }
/// #     fn release_unused_resources(&mut self) {}
/// #     fn collect_garbage(&mut self) {}
/// # }
/// let instance = GameInstanceBuilder::new(PlayerTemplate::new("Player"))
///     .with_first_mode("MainMenu")
///     .build(Host);
///
/// assert_eq!(instance.first_mode(), Some("MainMenu"));
/// assert_eq!(instance.local_player().name(), "Player");
/// ```
pub struct GameInstanceBuilder {
    player: PlayerTemplate,
    first_mode: Option<String>,
    config: Option<ConfigRepository>,
}

impl GameInstanceBuilder {
    /// Creates a builder; the local player is instantiated from `player`.
    pub fn new(player: PlayerTemplate) -> Self {
        Self {
            player,
            first_mode: None,
            config: None,
        }
    }

    /// Mode loaded automatically on the second tick. An empty id means
    /// none.
    pub fn with_first_mode(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.first_mode = (!id.is_empty()).then_some(id);
        self
    }

    /// Configuration repository exposed to game modes.
    ///
    /// Defaults to an empty repository.
    pub fn with_config(mut self, config: ConfigRepository) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the instance around `host`.
    ///
    /// # Panics
    ///
    /// Panics if another `GameInstance` is alive, or if no config was given
    /// and another `ConfigRepository` is alive.
    pub fn build<H: SceneHost>(self, host: H) -> GameInstance<H> {
        let guard = SingletonGuard::acquire("GameInstance");

        let player = self.player.instantiate();
        let config = self.config.unwrap_or_default();

        info!(
            "Game instance created (player: {}, first mode: {})",
            player.name(),
            self.first_mode.as_deref().unwrap_or("<none>")
        );

        GameInstance {
            host,
            player,
            config,
            first_mode: self.first_mode,
            active: None,
            transition: None,
            boot: Boot::Fresh,
            _guard: guard,
        }
    }
}

//=== Boot ================================================================

// Startup: one tick of delay before the first mode is requested.
enum Boot {
    Fresh,
    Yielded,
    Done,
}

//=== GameInstance ========================================================

/// Owner of the local player, the active game mode and the transition
/// between modes.
///
/// The host calls [`update`](Self::update) once per frame. A transition
/// requested with [`load_mode`](Self::load_mode) runs over the following
/// ticks:
///
/// 1. unload the active mode (its `on_unload`, then its additive scenes),
///    then its scene
/// 2. release unused resources, yield, collect garbage, yield
/// 3. load the new scene and install its game mode
///
/// The installed mode then runs its own load sequence on later ticks.
pub struct GameInstance<H: SceneHost> {
    host: H,
    player: Rc<Player>,
    config: ConfigRepository,
    first_mode: Option<String>,
    active: Option<GameMode>,
    transition: Option<Transition>,
    boot: Boot,
    _guard: SingletonGuard,
}

impl<H: SceneHost> GameInstance<H> {
    //--- Transitions ------------------------------------------------------

    /// Requests a switch to the mode in scene `id` without hand-off data.
    ///
    /// The mode writes its own default data.
    ///
    /// # Errors
    ///
    /// [`FrameworkError::TransitionInFlight`] if a transition is pending.
    ///
    /// # Panics
    ///
    /// Panics if `id` is empty.
    pub fn load_mode(&mut self, id: impl Into<String>) -> Result<()> {
        self.request(id.into(), None)
    }

    /// Requests a switch to the mode in scene `id`, handing it `data`.
    ///
    /// Same errors and panics as [`load_mode`](Self::load_mode).
    pub fn load_mode_with_data(&mut self, id: impl Into<String>, data: ModeData) -> Result<()> {
        self.request(id.into(), Some(data))
    }

    /// Requests the configured first mode.
    ///
    /// # Panics
    ///
    /// Panics if no first mode is configured.
    pub fn load_first_mode(&mut self) -> Result<()> {
        let id = self.first_mode.clone().unwrap_or_default();
        self.request(id, None)
    }

    fn request(&mut self, id: String, data: Option<ModeData>) -> Result<()> {
        assert!(!id.is_empty(), "GameMode id is empty");

        if let Some(pending) = &self.transition {
            return Err(FrameworkError::TransitionInFlight {
                requested: id,
                pending: pending.target().to_string(),
            });
        }

        info!("Loading game mode {}", id);
        self.transition = Some(Transition::new(id, data));
        Ok(())
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one scheduling tick.
    ///
    /// Advances the active mode's lifecycle, then the pending transition.
    /// A mode requested by a hook during this tick (see
    /// [`ModeContext::request_mode`]) is queued last; if a transition is
    /// already pending it is dropped with a warning.
    pub fn update(&mut self) {
        self.boot();

        let Self {
            host,
            player,
            config,
            active,
            transition,
            ..
        } = self;

        let mut requested = None;
        if let Some(mode) = active.as_mut() {
            let mut context = ModeContext::new(&mut *host, player, config);
            mode.update(&mut context);
            requested = context.take_request();
        }

        if let Some(pending) = transition.as_mut() {
            pending.update(&mut *host, active);
            if pending.is_finished() {
                *transition = None;
            }
        }

        // Requests from hooks start on the next tick, like load_mode
        if let Some(ModeRequest { id, data }) = requested {
            if let Err(e) = self.request(id, data) {
                warn!("Game mode request rejected: {}", e);
            }
        }
    }

    fn boot(&mut self) {
        match self.boot {
            Boot::Fresh => self.boot = Boot::Yielded,
            Boot::Yielded => {
                self.boot = Boot::Done;
                if self.first_mode.is_some() {
                    if let Err(e) = self.load_first_mode() {
                        warn!("Skipping first mode: {}", e);
                    }
                }
            }
            Boot::Done => {}
        }
    }

    /// Returns true while a transition is pending.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Scene id of the mode a pending transition is loading.
    pub fn pending_mode(&self) -> Option<&str> {
        self.transition.as_ref().map(Transition::target)
    }

    /// Returns true when no transition is pending and the active mode, if
    /// any, has finished loading.
    pub fn is_idle(&self) -> bool {
        !self.is_transitioning()
            && self
                .active
                .as_ref()
                .map_or(true, |mode| mode.state() == ModeState::Active)
    }

    //--- Active Mode ------------------------------------------------------

    pub fn active_mode(&self) -> Option<&GameMode> {
        self.active.as_ref()
    }

    pub fn active_mode_mut(&mut self) -> Option<&mut GameMode> {
        self.active.as_mut()
    }

    /// The active mode's rules narrowed to `T`; `None` if there is no
    /// active mode or it has other rules.
    pub fn active_rules<T: GameModeRules>(&self) -> Option<&T> {
        self.active.as_ref()?.rules::<T>()
    }

    pub fn active_rules_mut<T: GameModeRules>(&mut self) -> Option<&mut T> {
        self.active.as_mut()?.rules_mut::<T>()
    }

    pub fn is_active_mode<T: GameModeRules>(&self) -> bool {
        self.active.as_ref().is_some_and(GameMode::is::<T>)
    }

    //--- Player & Pawn ----------------------------------------------------

    pub fn local_player(&self) -> &Rc<Player> {
        &self.player
    }

    /// Returns true if `player` is this instance's local player.
    pub fn is_local_player(&self, player: &Player) -> bool {
        std::ptr::eq(Rc::as_ptr(&self.player), player)
    }

    /// The active mode's pawn.
    pub fn local_pawn(&self) -> Option<&Pawn> {
        self.active.as_ref()?.pawn()
    }

    /// Returns true if `object` carries the current pawn binding.
    pub fn is_pawn(&self, object: ObjectId) -> bool {
        self.local_pawn().is_some_and(|pawn| pawn.object() == object)
    }

    /// The player bound to the pawn on `object`.
    pub fn player_of(&self, object: ObjectId) -> Option<&Rc<Player>> {
        self.local_pawn()
            .filter(|pawn| pawn.object() == object)
            .map(Pawn::player)
    }

    //--- Collaborators ----------------------------------------------------

    pub fn first_mode(&self) -> Option<&str> {
        self.first_mode.as_deref()
    }

    pub fn config(&self) -> &ConfigRepository {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
