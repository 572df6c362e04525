//=========================================================================
// Aetheric Gameplay — Library Root
//
// Game mode framework: switches between gameplay modes, each bound to a
// scene, and keeps a persistent local player across them.
//
// Responsibilities:
// - Expose the mode coordinator (`GameInstance`)
// - Expose game modes, players and pawns through `core`
// - Keep the transition machinery internal
//
// Typical usage:
// ```ignore
// use aetheric_gameplay::prelude::*;
//
// let mut instance = GameInstanceBuilder::new(PlayerTemplate::new("Player"))
//     .with_first_mode("MainMenu")
//     .build(host);
//
// loop {
//     instance.update();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains game modes, players, scenes and configuration.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `game_instance` defines the coordinator and its builder.
//
mod game_instance;

#[cfg(test)]
mod testing;

//--- Public Exports ------------------------------------------------------

pub use game_instance::{GameInstance, GameInstanceBuilder};
