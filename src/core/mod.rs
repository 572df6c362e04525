//=========================================================================
// Core Gameplay Systems
//
// Building blocks coordinated by the GameInstance.
//
// Responsibilities:
// - Game modes and their fixed lifecycle (`mode`)
// - Persistent players, their states and pawns (`player`)
// - The host-side scene contract (`scene`)
// - Per-mode context and process-wide singletons (`globals`)
// - Typed configuration lookup (`config`)
//
// Notes:
// Everything runs on the thread that calls GameInstance::update().
// Asynchronous steps are explicit state machines advanced once per tick.
//
//=========================================================================

pub mod config;
pub mod error;
pub mod globals;
pub mod mode;
pub mod player;
pub mod scene;

pub(crate) mod transition;
