//=========================================================================
// Test Support
//=========================================================================
//
// Shared fixtures for unit tests:
// - ScriptedHost: in-memory SceneHost recording every call in a journal
// - RecordingMode: GameModeRules that journals its hooks
// - Inventory / Progression: sample player states
// - capture_logs: thread-local capture of `log` output
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Once;

use log::{LevelFilter, Log, Metadata, Record};

//=== Internal Dependencies ===============================================

use crate::core::globals::ModeContext;
use crate::core::mode::{GameModeRules, ModeData, ModeSettings, Progress};
use crate::core::player::{ObjectId, Pawn, PawnTemplate, PlayerState};
use crate::core::scene::{LoadSceneMode, SceneCompletion, SceneHost, SceneOperation, SpawnedMode};
use crate::GameInstance;

//=== Journal =============================================================

pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn entries(journal: &Journal) -> Vec<String> {
    journal.borrow().clone()
}

fn record(journal: &Journal, entry: impl Into<String>) {
    journal.borrow_mut().push(entry.into());
}

//=== ScriptedHost ========================================================

type ModeFactory = Box<dyn Fn() -> (ModeSettings, RecordingMode)>;

/// In-memory scene host.
///
/// In manual mode scene operations stay pending until the test completes
/// them with [`complete_next`](Self::complete_next).
pub(crate) struct ScriptedHost {
    journal: Journal,
    manual: bool,
    modes: HashMap<String, ModeFactory>,
    pending: VecDeque<SceneCompletion>,
    parents: HashMap<ObjectId, Option<ObjectId>>,
    active_scene: Option<String>,
    load_modes: Vec<LoadSceneMode>,
    next_object: u64,
}

impl ScriptedHost {
    pub(crate) fn new(journal: Journal) -> Self {
        Self {
            journal,
            manual: false,
            modes: HashMap::new(),
            pending: VecDeque::new(),
            parents: HashMap::new(),
            active_scene: None,
            load_modes: Vec::new(),
            next_object: 100,
        }
    }

    pub(crate) fn manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    /// Makes loading `scene` produce a [`RecordingMode`] built by `factory`.
    pub(crate) fn with_mode<F>(mut self, scene: &str, factory: F) -> Self
    where
        F: Fn() -> (ModeSettings, RecordingMode) + 'static,
    {
        self.modes.insert(scene.to_string(), Box::new(factory));
        self
    }

    /// Completes the oldest pending scene operation.
    pub(crate) fn complete_next(&mut self) {
        let completion = self.pending.pop_front().expect("no pending scene operation");
        completion.complete();
    }

    /// Completes every pending scene operation.
    pub(crate) fn complete_all(&mut self) {
        while let Some(completion) = self.pending.pop_front() {
            completion.complete();
        }
    }

    /// Scenes whose operations are still pending, oldest first.
    pub(crate) fn pending_scenes(&self) -> Vec<String> {
        self.pending.iter().map(|c| c.scene().to_string()).collect()
    }

    pub(crate) fn parent_of(&self, object: ObjectId) -> Option<ObjectId> {
        self.parents.get(&object).copied().flatten()
    }

    /// Modes passed to every `load_scene` call so far.
    pub(crate) fn load_modes(&self) -> &[LoadSceneMode] {
        &self.load_modes
    }

    pub(crate) fn active_scene(&self) -> Option<&str> {
        self.active_scene.as_deref()
    }

    fn operation(&mut self, scene: &str) -> SceneOperation {
        if self.manual {
            let (operation, completion) = SceneOperation::pending(scene);
            self.pending.push_back(completion);
            operation
        } else {
            SceneOperation::completed(scene)
        }
    }

    fn spawn(&mut self, parent: Option<ObjectId>) -> ObjectId {
        let object = ObjectId(self.next_object);
        self.next_object += 1;
        self.parents.insert(object, parent);
        object
    }
}

impl SceneHost for ScriptedHost {
    fn load_scene(&mut self, scene: &str, mode: LoadSceneMode) -> SceneOperation {
        record(&self.journal, format!("load:{}", scene));
        self.load_modes.push(mode);
        self.operation(scene)
    }

    fn unload_scene(&mut self, scene: &str) -> SceneOperation {
        record(&self.journal, format!("unload:{}", scene));
        self.operation(scene)
    }

    fn set_active_scene(&mut self, scene: &str) {
        record(&self.journal, format!("active:{}", scene));
        self.active_scene = Some(scene.to_string());
    }

    fn take_game_mode(&mut self, scene: &str) -> Option<SpawnedMode> {
        let (settings, rules) = (self.modes.get(scene)?)();
        let object = self.spawn(None);
        Some(SpawnedMode::new(object, settings, rules))
    }

    fn instantiate(&mut self, template: &PawnTemplate) -> ObjectId {
        record(&self.journal, format!("instantiate:{}", template.name()));
        self.spawn(None)
    }

    fn create_object(&mut self, name: &str, parent: Option<ObjectId>) -> ObjectId {
        record(&self.journal, format!("create:{}", name));
        self.spawn(parent)
    }

    fn release_unused_resources(&mut self) {
        record(&self.journal, "release");
    }

    fn collect_garbage(&mut self) {
        record(&self.journal, "collect");
    }
}

//=== RecordingMode =======================================================

/// Game mode whose hooks append to the shared journal.
pub(crate) struct RecordingMode {
    name: String,
    journal: Journal,
    load_ticks: usize,
    unload_ticks: usize,
    default_round: Option<i32>,
    next_mode: Option<(String, Option<i32>)>,
    pub(crate) parsed_round: Option<i32>,
}

impl RecordingMode {
    pub(crate) fn new(name: &str, journal: Journal) -> Self {
        Self {
            name: name.to_string(),
            journal,
            load_ticks: 0,
            unload_ticks: 0,
            default_round: None,
            next_mode: None,
            parsed_round: None,
        }
    }

    /// `on_load` reports `Running` this many times before finishing.
    pub(crate) fn with_load_ticks(mut self, ticks: usize) -> Self {
        self.load_ticks = ticks;
        self
    }

    /// `on_unload` reports `Running` this many times before finishing.
    pub(crate) fn with_unload_ticks(mut self, ticks: usize) -> Self {
        self.unload_ticks = ticks;
        self
    }

    /// Once loaded, requests `id`, handing over `round` if given.
    pub(crate) fn with_next_mode(mut self, id: &str, round: Option<i32>) -> Self {
        self.next_mode = Some((id.to_string(), round));
        self
    }

    /// Default data carries `round`.
    pub(crate) fn with_default_round(mut self, round: i32) -> Self {
        self.default_round = Some(round);
        self
    }
}

impl GameModeRules for RecordingMode {
    fn on_load(&mut self, context: &mut ModeContext<'_>) -> Progress {
        if self.load_ticks > 0 {
            self.load_ticks -= 1;
            return Progress::Running;
        }
        record(&self.journal, format!("{}:loaded", self.name));
        if let Some((id, round)) = self.next_mode.take() {
            let data = round.map(|round| ModeData::new().with("round", round));
            context.request_mode(id, data);
        }
        Progress::Finished
    }

    fn on_unload(&mut self, _context: &mut ModeContext<'_>) -> Progress {
        if self.unload_ticks > 0 {
            self.unload_ticks -= 1;
            return Progress::Running;
        }
        record(&self.journal, format!("{}:unloaded", self.name));
        Progress::Finished
    }

    fn on_initialize_pawn(&mut self, pawn: &mut Pawn) {
        record(&self.journal, format!("{}:init_pawn:{}", self.name, pawn.name()));
    }

    fn on_parse_data(&mut self, data: &ModeData) {
        self.parsed_round = data.get::<i32>("round").copied();
        let round = match self.parsed_round {
            Some(round) => round.to_string(),
            None => "none".to_string(),
        };
        record(&self.journal, format!("{}:parse round={}", self.name, round));
    }

    fn on_write_default_data(&self) -> ModeData {
        record(&self.journal, format!("{}:default_data", self.name));
        let mut data = ModeData::new();
        if let Some(round) = self.default_round {
            data.insert("round", round);
        }
        data
    }
}

//=== Sample States =======================================================

#[derive(Debug, Default)]
pub(crate) struct Inventory {
    pub(crate) items: Vec<String>,
}

impl PlayerState for Inventory {
    fn serialization_key(&self) -> &str {
        "inventory"
    }
}

#[derive(Debug, Default)]
pub(crate) struct Progression {
    pub(crate) level: u32,
}

impl PlayerState for Progression {
    fn serialization_key(&self) -> &str {
        "progression"
    }
}

//=== Driving Helpers =====================================================

/// Ticks until no transition is pending and the active mode (if any) is
/// active. Returns the number of ticks taken.
pub(crate) fn run_until_idle<H: SceneHost>(instance: &mut GameInstance<H>) -> usize {
    const MAX_TICKS: usize = 100;

    for tick in 1..=MAX_TICKS {
        instance.update();
        if instance.is_idle() {
            return tick;
        }
    }
    panic!("instance did not settle within {} ticks", MAX_TICKS);
}

//=== Log Capture =========================================================

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = RefCell::new(None);
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|captured| {
            if let Some(lines) = captured.borrow_mut().as_mut() {
                lines.push(format!("{} {}", record.level(), record.args()));
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Runs `f` and returns what it logged on this thread as `"LEVEL message"`
/// lines.
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });

    CAPTURED.with(|captured| *captured.borrow_mut() = Some(Vec::new()));
    let result = f();
    let lines = CAPTURED
        .with(|captured| captured.borrow_mut().take())
        .unwrap_or_default();

    (result, lines)
}
