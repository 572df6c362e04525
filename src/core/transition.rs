//=========================================================================
// Mode Transition
//=========================================================================
//
// One pending switch from the active game mode to the next.
//
// Phases, advanced by GameInstance::update():
//   Begin            wait for a loading mode to become active, then unload it
//   UnloadMode       wait for the mode's unload sequence (on_unload, additive scenes)
//   UnloadScene      wait for the host to unload the mode's scene, clear the slot
//   ReleaseResources release unused resources, yield one tick
//   CollectGarbage   force collection, yield one tick
//   LoadScene        load the target scene, install its game mode
//
// No phase starts before the previous one finished; a transition is never
// cancelled.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::mode::{GameMode, ModeData, ModeState};
use crate::core::scene::{LoadSceneMode, SceneHost, SceneOperation};

//--- Internal phases -----------------------------------------------------

enum Phase {
    Begin,
    UnloadMode,
    UnloadScene(SceneOperation),
    ReleaseResources,
    CollectGarbage,
    LoadScene(Option<SceneOperation>),
    Finished,
}

enum Step {
    Continue,
    Yield,
}

//=== Transition ==========================================================

/// A queued game mode load and its progress.
pub(crate) struct Transition {
    target: String,
    data: Option<ModeData>,
    phase: Phase,
}

impl Transition {
    pub(crate) fn new(target: String, data: Option<ModeData>) -> Self {
        Self {
            target,
            data,
            phase: Phase::Begin,
        }
    }

    /// Scene id of the mode being loaded.
    pub(crate) fn target(&self) -> &str {
        &self.target
    }

    pub(crate) fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Advances the transition until it has to wait.
    pub(crate) fn update(&mut self, host: &mut dyn SceneHost, active: &mut Option<GameMode>) {
        while let Step::Continue = self.step(host, active) {}
    }

    fn step(&mut self, host: &mut dyn SceneHost, active: &mut Option<GameMode>) -> Step {
        let (next, step) = match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::Begin => match active.as_mut() {
                None => (Phase::ReleaseResources, Step::Continue),
                Some(mode) => match mode.state() {
                    ModeState::Loading => (Phase::Begin, Step::Yield),
                    ModeState::Active => {
                        mode.unload();
                        (Phase::UnloadMode, Step::Continue)
                    }
                    ModeState::Unloading | ModeState::Unloaded => (Phase::UnloadMode, Step::Continue),
                },
            },

            Phase::UnloadMode => match active.as_ref() {
                None => (Phase::ReleaseResources, Step::Continue),
                Some(mode) if mode.state() == ModeState::Unloaded => {
                    debug!("Unloading scene {}", mode.id());
                    (Phase::UnloadScene(host.unload_scene(mode.id())), Step::Continue)
                }
                Some(_) => (Phase::UnloadMode, Step::Yield),
            },

            Phase::UnloadScene(mut operation) => {
                if operation.is_done() {
                    if let Some(previous) = active.take() {
                        debug!("Game mode {} removed", previous.id());
                    }
                    (Phase::ReleaseResources, Step::Continue)
                } else {
                    (Phase::UnloadScene(operation), Step::Yield)
                }
            }

            Phase::ReleaseResources => {
                debug!("Releasing unused resources");
                host.release_unused_resources();
                (Phase::CollectGarbage, Step::Yield)
            }

            Phase::CollectGarbage => {
                debug!("Collecting garbage");
                host.collect_garbage();
                (Phase::LoadScene(None), Step::Yield)
            }

            Phase::LoadScene(None) => {
                debug!("Loading scene {}", self.target);
                let operation = host.load_scene(&self.target, LoadSceneMode::Additive);
                (Phase::LoadScene(Some(operation)), Step::Continue)
            }

            Phase::LoadScene(Some(mut operation)) => {
                if operation.is_done() {
                    self.install(host, active);
                    (Phase::Finished, Step::Yield)
                } else {
                    (Phase::LoadScene(Some(operation)), Step::Yield)
                }
            }

            Phase::Finished => (Phase::Finished, Step::Yield),
        };

        self.phase = next;
        step
    }

    fn install(&mut self, host: &mut dyn SceneHost, active: &mut Option<GameMode>) {
        let spawned = match host.take_game_mode(&self.target) {
            Some(spawned) => spawned,
            None => panic!("Scene {} does not contain a GameMode", self.target),
        };

        info!("Game mode {} installed", self.target);
        *active = Some(GameMode::new(self.target.clone(), spawned, self.data.take()));
    }
}

//=========================================================================
// Tests
//=========================================================================
