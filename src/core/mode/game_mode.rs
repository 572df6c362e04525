//=========================================================================
// Game Mode
//=========================================================================
//
// Fixed lifecycle driven once per tick by the GameInstance.
//
// Load sequence (Loading):
//   1. set active scene
//   2. default data if none was handed off
//   3. on_parse_data
//   4. create pawn → on_initialize_pawn
//   5. additive scenes, one at a time
//   6. yield one tick → on_load (polled until finished) → Active
//
// Unload sequence (Unloading):
//   1. on_unload (polled until finished)
//   2. unload every additive scene, wait for all → Unloaded
//
// Within one tick the machine advances until it has to wait.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{GameModeRules, ModeData, ModeSettings, Progress};
use crate::core::globals::ModeContext;
use crate::core::player::{ObjectId, Pawn, DEFAULT_PAWN_NAME};
use crate::core::scene::{LoadSceneMode, SceneHost, SceneOperation, SpawnedMode};
use crate::GameInstance;

//=== ModeState ===========================================================

/// Observable lifecycle state of a [`GameMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    Loading,
    Active,
    Unloading,
    Unloaded,
}

//--- Internal phases -----------------------------------------------------

enum Phase {
    Start,
    LoadAdditive {
        index: usize,
        operation: Option<SceneOperation>,
    },
    AwaitTick,
    Load,
    Active,
    Unload,
    UnloadAdditive(Vec<SceneOperation>),
    Unloaded,
}

enum Step {
    Continue,
    Yield,
}

//=== GameMode ============================================================

/// A loaded game mode and its lifecycle state.
///
/// Created by the [`GameInstance`] once the mode's scene finished loading;
/// the load sequence starts on the next tick.
pub struct GameMode {
    id: String,
    object: ObjectId,
    settings: ModeSettings,
    rules: Box<dyn GameModeRules>,
    data: Option<ModeData>,
    pawn: Option<Pawn>,
    phase: Phase,
}

impl GameMode {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(id: impl Into<String>, spawned: SpawnedMode, data: Option<ModeData>) -> Self {
        Self {
            id: id.into(),
            object: spawned.object,
            settings: spawned.settings,
            rules: spawned.rules,
            data,
            pawn: None,
            phase: Phase::Start,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Id of the scene this mode was loaded from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Scene object the mode lives on.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn settings(&self) -> &ModeSettings {
        &self.settings
    }

    pub fn state(&self) -> ModeState {
        match self.phase {
            Phase::Start | Phase::LoadAdditive { .. } | Phase::AwaitTick | Phase::Load => {
                ModeState::Loading
            }
            Phase::Active => ModeState::Active,
            Phase::Unload | Phase::UnloadAdditive(_) => ModeState::Unloading,
            Phase::Unloaded => ModeState::Unloaded,
        }
    }

    /// The pawn, once the load sequence created it.
    pub fn pawn(&self) -> Option<&Pawn> {
        self.pawn.as_ref()
    }

    pub fn pawn_mut(&mut self) -> Option<&mut Pawn> {
        self.pawn.as_mut()
    }

    /// Hand-off data; `None` only before the load sequence has started and
    /// nothing was handed off.
    pub fn data(&self) -> Option<&ModeData> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut ModeData> {
        self.data.as_mut()
    }

    /// The mode's rules narrowed to `T`.
    pub fn rules<T: GameModeRules>(&self) -> Option<&T> {
        (*self.rules).as_any().downcast_ref::<T>()
    }

    pub fn rules_mut<T: GameModeRules>(&mut self) -> Option<&mut T> {
        (*self.rules).as_any_mut().downcast_mut::<T>()
    }

    /// Returns true if the rules are of type `T`.
    pub fn is<T: GameModeRules>(&self) -> bool {
        (*self.rules).as_any().is::<T>()
    }

    //--- Instance Accessors -----------------------------------------------

    /// The active game mode of `instance`.
    pub fn active<H: SceneHost>(instance: &GameInstance<H>) -> Option<&GameMode> {
        instance.active_mode()
    }

    /// The active mode's rules narrowed to `T`.
    pub fn get_active<T: GameModeRules, H: SceneHost>(instance: &GameInstance<H>) -> Option<&T> {
        instance.active_rules::<T>()
    }

    /// Returns true if the active mode's rules are of type `T`.
    pub fn is_active<T: GameModeRules, H: SceneHost>(instance: &GameInstance<H>) -> bool {
        instance.is_active_mode::<T>()
    }

    //--- Lifecycle --------------------------------------------------------

    /// Starts the unload sequence.
    ///
    /// # Panics
    ///
    /// Panics unless the mode is [`ModeState::Active`].
    pub(crate) fn unload(&mut self) {
        assert_eq!(
            self.state(),
            ModeState::Active,
            "Game mode {} can only unload while active",
            self.id
        );

        debug!("Unloading game mode {}", self.id);
        self.phase = Phase::Unload;
    }

    /// Advances the lifecycle until it has to wait.
    pub(crate) fn update(&mut self, context: &mut ModeContext<'_>) {
        while let Step::Continue = self.step(context) {}
    }

    fn step(&mut self, context: &mut ModeContext<'_>) -> Step {
        let (next, step) = match std::mem::replace(&mut self.phase, Phase::Unloaded) {
            Phase::Start => {
                self.begin_load(context);
                (Phase::LoadAdditive { index: 0, operation: None }, Step::Continue)
            }

            Phase::LoadAdditive { index, operation: None } => {
                match self.settings.additive_scenes.get(index) {
                    Some(scene) => {
                        debug!("Game mode {} loading additive scene {}", self.id, scene);
                        let operation = context.scenes.load_scene(scene, LoadSceneMode::Additive);
                        (Phase::LoadAdditive { index, operation: Some(operation) }, Step::Continue)
                    }
                    None => (Phase::AwaitTick, Step::Continue),
                }
            }

            Phase::LoadAdditive { index, operation: Some(mut operation) } => {
                if operation.is_done() {
                    (Phase::LoadAdditive { index: index + 1, operation: None }, Step::Continue)
                } else {
                    (Phase::LoadAdditive { index, operation: Some(operation) }, Step::Yield)
                }
            }

            Phase::AwaitTick => (Phase::Load, Step::Yield),

            Phase::Load => match self.rules.on_load(context) {
                Progress::Running => (Phase::Load, Step::Yield),
                Progress::Finished => {
                    info!("Game mode {} is active", self.id);
                    (Phase::Active, Step::Yield)
                }
            },

            Phase::Active => (Phase::Active, Step::Yield),

            Phase::Unload => match self.rules.on_unload(context) {
                Progress::Running => (Phase::Unload, Step::Yield),
                Progress::Finished => {
                    let operations = self
                        .settings
                        .additive_scenes
                        .iter()
                        .map(|scene| context.scenes.unload_scene(scene))
                        .collect();
                    (Phase::UnloadAdditive(operations), Step::Continue)
                }
            },

            Phase::UnloadAdditive(mut operations) => {
                operations.retain_mut(|operation| !operation.is_done());
                if operations.is_empty() {
                    debug!("Game mode {} unloaded", self.id);
                    (Phase::Unloaded, Step::Yield)
                } else {
                    (Phase::UnloadAdditive(operations), Step::Yield)
                }
            }

            Phase::Unloaded => (Phase::Unloaded, Step::Yield),
        };

        self.phase = next;
        step
    }

    //--- Load Helpers -----------------------------------------------------

    fn begin_load(&mut self, context: &mut ModeContext<'_>) {
        debug!("Loading game mode {}", self.id);
        context.scenes.set_active_scene(&self.id);

        let data = match self.data.take() {
            Some(data) => data,
            None => {
                debug!("Game mode {} received no data, writing defaults", self.id);
                self.rules.on_write_default_data()
            }
        };
        self.rules.on_parse_data(&data);
        self.data = Some(data);

        let mut pawn = self.create_pawn(context);
        self.rules.on_initialize_pawn(&mut pawn);
        self.pawn = Some(pawn);
    }

    fn create_pawn(&self, context: &mut ModeContext<'_>) -> Pawn {
        let player = context.local_player.clone();

        match &self.settings.pawn_template {
            Some(template) => {
                let object = context.scenes.instantiate(template);
                Pawn::new(object, template.name(), player, false)
            }
            None => {
                let object = context.scenes.create_object(DEFAULT_PAWN_NAME, Some(self.object));
                if cfg!(debug_assertions) {
                    warn!("{} did not create a Pawn. Creating an empty Pawn...", self.id);
                }
                Pawn::new(object, DEFAULT_PAWN_NAME, player, true)
            }
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigRepository;
    use crate::core::player::{PawnTemplate, Player};
    use crate::testing::{self, Journal, RecordingMode, ScriptedHost};
    use std::rc::Rc;

    struct Rig {
        host: ScriptedHost,
        player: Rc<Player>,
        config: ConfigRepository,
        journal: Journal,
    }

    impl Rig {
        fn new(manual: bool) -> Self {
            let journal = testing::journal();
            Self {
                host: ScriptedHost::new(journal.clone()).manual(manual),
                player: Player::new("P1", []),
                config: ConfigRepository::new(),
                journal,
            }
        }

        fn tick(&mut self, mode: &mut GameMode) {
            let mut context = ModeContext::new(&mut self.host, &self.player, &self.config);
            mode.update(&mut context);
        }

        fn mode(&self, settings: ModeSettings, rules: RecordingMode, data: Option<ModeData>) -> GameMode {
            GameMode::new("Arena", SpawnedMode::new(ObjectId(1), settings, rules), data)
        }
    }

    #[test]
    fn load_sequence_reaches_active_after_yield() {
        let mut rig = Rig::new(false);
        let rules = RecordingMode::new("Arena", rig.journal.clone());
        let mut mode = rig.mode(ModeSettings::new(), rules, Some(ModeData::new().with("round", 3)));
        assert_eq!(mode.state(), ModeState::Loading);

        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Loading);
        assert!(mode.pawn().is_some());

        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Active);

        assert_eq!(
            testing::entries(&rig.journal),
            vec![
                "active:Arena",
                "Arena:parse round=3",
                "create:DefaultPawn",
                "Arena:init_pawn:DefaultPawn",
                "Arena:loaded",
            ]
        );
    }

    #[test]
    fn missing_data_uses_default_data() {
        let mut rig = Rig::new(false);
        let rules = RecordingMode::new("Arena", rig.journal.clone()).with_default_round(7);
        let mut mode = rig.mode(ModeSettings::new(), rules, None);
        assert!(mode.data().is_none());

        rig.tick(&mut mode);

        assert_eq!(mode.data().unwrap().get::<i32>("round"), Some(&7));
        assert_eq!(mode.rules::<RecordingMode>().unwrap().parsed_round, Some(7));
        assert!(testing::entries(&rig.journal).contains(&"Arena:default_data".to_string()));
    }

    #[test]
    fn handed_off_data_skips_default_data() {
        let mut rig = Rig::new(false);
        let rules = RecordingMode::new("Arena", rig.journal.clone()).with_default_round(7);
        let mut mode = rig.mode(ModeSettings::new(), rules, Some(ModeData::new()));

        rig.tick(&mut mode);

        assert_eq!(mode.rules::<RecordingMode>().unwrap().parsed_round, None);
        assert!(!testing::entries(&rig.journal).contains(&"Arena:default_data".to_string()));
    }

    #[test]
    fn additive_scenes_load_one_at_a_time() {
        let mut rig = Rig::new(true);
        let rules = RecordingMode::new("Arena", rig.journal.clone());
        let settings = ModeSettings::new().with_additive_scene("Hud").with_additive_scene("Audio");
        let mut mode = rig.mode(settings, rules, None);

        rig.tick(&mut mode);
        assert_eq!(rig.host.pending_scenes(), vec!["Hud"]);

        // Nothing moves until the host completes Hud
        rig.tick(&mut mode);
        assert_eq!(rig.host.pending_scenes(), vec!["Hud"]);

        rig.host.complete_next();
        rig.tick(&mut mode);
        assert_eq!(rig.host.pending_scenes(), vec!["Audio"]);
        assert_eq!(mode.state(), ModeState::Loading);

        rig.host.complete_next();
        rig.tick(&mut mode);
        // Additive scenes done; on_load waits for the explicit yield
        assert_eq!(mode.state(), ModeState::Loading);
        assert!(!testing::entries(&rig.journal).contains(&"Arena:loaded".to_string()));

        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Active);
    }

    #[test]
    fn on_load_is_polled_until_finished() {
        let mut rig = Rig::new(false);
        let rules = RecordingMode::new("Arena", rig.journal.clone()).with_load_ticks(2);
        let mut mode = rig.mode(ModeSettings::new(), rules, None);

        rig.tick(&mut mode);
        rig.tick(&mut mode);
        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Loading);

        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Active);
    }

    #[test]
    fn unload_runs_hook_before_additive_scenes() {
        let mut rig = Rig::new(true);
        let rules = RecordingMode::new("Arena", rig.journal.clone()).with_unload_ticks(1);
        let settings = ModeSettings::new().with_additive_scene("Hud").with_additive_scene("Audio");
        let mut mode = rig.mode(settings, rules, None);

        rig.tick(&mut mode);
        rig.host.complete_next();
        rig.tick(&mut mode);
        rig.host.complete_next();
        rig.tick(&mut mode);
        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Active);
        rig.journal.borrow_mut().clear();

        mode.unload();
        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Unloading);
        assert!(rig.host.pending_scenes().is_empty());

        rig.tick(&mut mode);
        assert_eq!(rig.host.pending_scenes(), vec!["Hud", "Audio"]);
        assert_eq!(
            testing::entries(&rig.journal),
            vec!["Arena:unloaded", "unload:Hud", "unload:Audio"]
        );

        rig.host.complete_next();
        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Unloading);

        rig.host.complete_next();
        rig.tick(&mut mode);
        assert_eq!(mode.state(), ModeState::Unloaded);
    }

    #[test]
    fn template_pawn_is_named_after_template() {
        let mut rig = Rig::new(false);
        let rules = RecordingMode::new("Arena", rig.journal.clone());
        let settings = ModeSettings::new().with_pawn(PawnTemplate::new("Knight"));
        let mut mode = rig.mode(settings, rules, None);

        let (_, logs) = testing::capture_logs(|| rig.tick(&mut mode));

        let pawn = mode.pawn().unwrap();
        assert_eq!(pawn.name(), "Knight");
        assert!(!pawn.is_placeholder());
        assert!(Rc::ptr_eq(pawn.player(), &rig.player));
        assert!(testing::entries(&rig.journal).contains(&"instantiate:Knight".to_string()));
        assert!(!logs.iter().any(|line| line.starts_with("WARN")));
    }

    #[test]
    fn placeholder_pawn_is_parented_to_mode_and_warns_in_debug_builds() {
        let mut rig = Rig::new(false);
        let rules = RecordingMode::new("Arena", rig.journal.clone());
        let mut mode = rig.mode(ModeSettings::new(), rules, None);

        let (_, logs) = testing::capture_logs(|| rig.tick(&mut mode));

        let pawn = mode.pawn().unwrap();
        assert_eq!(pawn.name(), DEFAULT_PAWN_NAME);
        assert!(pawn.is_placeholder());
        assert_eq!(rig.host.parent_of(pawn.object()), Some(ObjectId(1)));
        // Development builds only
        let warned = logs
            .iter()
            .any(|line| line == "WARN Arena did not create a Pawn. Creating an empty Pawn...");
        assert_eq!(warned, cfg!(debug_assertions));
    }

    #[test]
    fn rules_narrowing() {
        let rig = Rig::new(false);
        let rules = RecordingMode::new("Arena", rig.journal.clone());
        let mut mode = rig.mode(ModeSettings::new(), rules, None);

        assert!(mode.is::<RecordingMode>());
        assert!(mode.rules::<RecordingMode>().is_some());
        assert!(mode.rules_mut::<RecordingMode>().is_some());

        struct Other;
        impl GameModeRules for Other {}
        assert!(!mode.is::<Other>());
        assert!(mode.rules::<Other>().is_none());
    }

    #[test]
    #[should_panic(expected = "can only unload while active")]
    fn unload_while_loading_panics() {
        let rig = Rig::new(false);
        let rules = RecordingMode::new("Arena", rig.journal.clone());
        let mut mode = rig.mode(ModeSettings::new(), rules, None);
        mode.unload();
    }
}
