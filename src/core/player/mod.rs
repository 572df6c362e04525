//=========================================================================
// Player System
//=========================================================================
//
// Persistent per-user context that survives game mode transitions.
//
// Architecture:
//   PlayerTemplate ──instantiate()──> Rc<Player>
//                                       └─ states: HashMap<TypeId, Rc<dyn ErasedState>>
//   Pawn ─────────────────────────────> Rc<Player>   (per game mode)
//
// The registry is written once, while the player is built. Afterwards the
// only mutation is lazy pruning of destroyed states during lookup.
//
//=========================================================================

//=== Module Declarations =================================================

mod pawn;
mod state;

//=== Public API ==========================================================

pub use pawn::{ObjectId, Pawn, PawnTemplate, DEFAULT_PAWN_NAME};
pub use state::{PlayerState, StateCell, StateRef, StateSlot};

//=== External Dependencies ===============================================

use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneHost;
use crate::GameInstance;
use state::ErasedState;

//=== Player ==============================================================

/// Persistent data holder for one player.
///
/// A player is referenced from the [`GameInstance`] (as the local player)
/// and from the [`Pawn`] of the active game mode.
pub struct Player {
    name: String,
    states: RefCell<HashMap<TypeId, Rc<dyn ErasedState>>>,
}

impl Player {
    //--- Construction -----------------------------------------------------

    /// Builds a player and registers `states` under their concrete types.
    ///
    /// When two slots share a type, the later one replaces the earlier one
    /// and a warning is logged; the replaced state is unreachable through
    /// the registry.
    pub fn new(name: impl Into<String>, states: impl IntoIterator<Item = StateSlot>) -> Rc<Self> {
        let name = name.into();

        Rc::new_cyclic(|owner| {
            let mut registry: HashMap<TypeId, Rc<dyn ErasedState>> = HashMap::new();

            for slot in states {
                slot.cell.bind_owner(owner.clone());

                if let Some(replaced) = registry.insert(slot.type_id, slot.cell) {
                    warn!(
                        "Player {} registered {} twice; the earlier state was replaced",
                        name,
                        replaced.type_name()
                    );
                }
            }

            debug!("Player {} created with {} states", name, registry.len());

            Self {
                name,
                states: RefCell::new(registry),
            }
        })
    }

    //--- Queries ----------------------------------------------------------

    /// The player's name, taken from its template.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the state of type `T`.
    ///
    /// Returns `None` if no such state was registered, or if it has been
    /// destroyed. A destroyed entry is removed from the registry here.
    pub fn get_state<T: PlayerState>(&self) -> Option<StateRef<T>> {
        let key = TypeId::of::<T>();
        let mut states = self.states.borrow_mut();

        let cell = states.get(&key)?;
        if cell.is_destroyed() {
            debug!("Pruning destroyed state {} from player {}", type_name::<T>(), self.name);
            states.remove(&key);
            return None;
        }

        cell.clone().into_any().downcast::<StateCell<T>>().ok()
    }

    /// Returns true if a live state of type `T` is registered.
    pub fn has_state<T: PlayerState>(&self) -> bool {
        self.get_state::<T>().is_some()
    }

    /// Serialization keys of every live state, sorted.
    ///
    /// Intended for an external persistence layer that saves or restores
    /// the player's states by key.
    pub fn serialization_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .states
            .borrow()
            .values()
            .filter(|cell| !cell.is_destroyed())
            .map(|cell| cell.serialization_key().to_string())
            .collect();
        keys.sort();
        keys
    }

    /// Number of registry entries (destroyed ones included until pruned).
    pub fn len(&self) -> usize {
        self.states.borrow().len()
    }

    /// Returns true if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.states.borrow().is_empty()
    }

    //--- Local Player -----------------------------------------------------

    /// The local player of `instance`.
    pub fn local<H: SceneHost>(instance: &GameInstance<H>) -> &Rc<Player> {
        instance.local_player()
    }

    /// Returns true if this player is the local player of `instance`.
    pub fn is_local<H: SceneHost>(&self, instance: &GameInstance<H>) -> bool {
        instance.is_local_player(self)
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("states", &self.states.borrow().len())
            .finish()
    }
}

//=== PlayerTemplate ======================================================

type StateFactory = Box<dyn Fn() -> StateSlot>;

/// Blueprint the [`GameInstance`] instantiates its player from.
///
/// ```rust
/// # use aetheric_gameplay::prelude::*;
/// # #[derive(Default)]
/// # struct Inventory;
/// # impl PlayerState for Inventory {
/// #     fn serialization_key(&self) -> &str { "inventory" }
/// # }
/// let template = PlayerTemplate::new("Player").with_state(Inventory::default);
/// let player = template.instantiate();
/// assert!(player.has_state::<Inventory>());
/// ```
pub struct PlayerTemplate {
    name: String,
    states: Vec<StateFactory>,
}

impl PlayerTemplate {
    /// Creates a template without states.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
        }
    }

    /// Adds a state; `factory` runs once per instantiated player.
    pub fn with_state<T, F>(mut self, factory: F) -> Self
    where
        T: PlayerState,
        F: Fn() -> T + 'static,
    {
        self.states.push(Box::new(move || StateSlot::new(factory())));
        self
    }

    /// Name given to instantiated players.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds a fresh player with fresh states.
    pub fn instantiate(&self) -> Rc<Player> {
        Player::new(self.name.clone(), self.states.iter().map(|factory| factory()))
    }
}

//=========================================================================
// Tests
//=========================================================================
