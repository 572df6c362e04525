//=========================================================================
// Player State
//=========================================================================
//
// Persistent per-player data, one instance per concrete type.
//
// Architecture:
//   StateSlot ──(Player::new)──> Player.states: HashMap<TypeId, Rc<dyn ErasedState>>
//                                                     ↓
//   get_state<T>() ← Rc<dyn Any>::downcast::<StateCell<T>>()
//
// A state never owns its player: the owner link is a `Weak` written once
// while the player registers it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any, TypeId};
use std::cell::{Cell, OnceCell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

//=== Internal Dependencies ===============================================

use super::Player;

//=== PlayerState Trait ===================================================

/// A persistent facet of player data (inventory, progression, ...).
///
/// States survive game mode transitions and are looked up on the owning
/// [`Player`] by their concrete type.
///
/// ```rust
/// # use aetheric_gameplay::prelude::*;
/// #[derive(Default)]
/// struct Progression {
///     level: u32,
/// }
///
/// impl PlayerState for Progression {
///     fn serialization_key(&self) -> &str {
///         "progression"
///     }
/// }
/// ```
pub trait PlayerState: Any {
    /// Key under which an external persistence layer stores this state.
    ///
    /// Read once, when the state is wrapped for registration.
    fn serialization_key(&self) -> &str;
}

/// Shared handle to a registered state.
pub type StateRef<T> = Rc<StateCell<T>>;

//=== StateCell ===========================================================

/// Interior-mutable container for a registered [`PlayerState`].
///
/// Carries the owner back-reference and the destroyed flag used by the
/// registry's lazy pruning.
pub struct StateCell<T: PlayerState> {
    value: RefCell<T>,
    key: String,
    owner: OnceCell<Weak<Player>>,
    destroyed: Cell<bool>,
}

impl<T: PlayerState> StateCell<T> {
    fn new(value: T) -> Self {
        Self {
            key: value.serialization_key().to_string(),
            value: RefCell::new(value),
            owner: OnceCell::new(),
            destroyed: Cell::new(false),
        }
    }

    /// Immutably borrows the state.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.value.borrow()
    }

    /// Mutably borrows the state.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.value.borrow_mut()
    }

    /// The owning player, if it is still alive.
    pub fn owner(&self) -> Option<Rc<Player>> {
        self.owner.get().and_then(Weak::upgrade)
    }

    /// Looks up another state of the same player.
    ///
    /// Lets one persistent subsystem reach a cooperating one without
    /// direct wiring. Returns `None` if the owner is gone or has no live
    /// state of type `U`.
    pub fn sibling<U: PlayerState>(&self) -> Option<StateRef<U>> {
        self.owner()?.get_state::<U>()
    }

    /// [`PlayerState::serialization_key`], read once when the cell was
    /// created.
    ///
    /// Does not borrow the state, so it is safe while the state is held
    /// mutably.
    pub fn serialization_key(&self) -> &str {
        &self.key
    }

    /// Destroys the state.
    ///
    /// Existing handles stay valid memory-wise, but the owner's registry
    /// drops the entry the next time it is looked up.
    pub fn destroy(&self) {
        self.destroyed.set(true);
    }

    /// Returns true once [`destroy`](Self::destroy) was called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

impl<T: PlayerState + fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("destroyed", &self.destroyed.get())
            .finish()
    }
}

//=== ErasedState =========================================================

/// Type-erased view of a [`StateCell`] stored in the player registry.
pub(crate) trait ErasedState {
    fn is_destroyed(&self) -> bool;

    /// Writes the owner link.
    ///
    /// # Panics
    ///
    /// Panics if the state already has an owner.
    fn bind_owner(&self, owner: Weak<Player>);

    fn serialization_key(&self) -> &str;

    fn type_name(&self) -> &'static str;

    /// Upcasts for typed downcasting in `Player::get_state`.
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: PlayerState> ErasedState for StateCell<T> {
    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    fn bind_owner(&self, owner: Weak<Player>) {
        assert!(
            self.owner.set(owner).is_ok(),
            "{} is already owned by a Player",
            type_name::<T>()
        );
    }

    fn serialization_key(&self) -> &str {
        &self.key
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

//=== StateSlot ===========================================================

/// A state waiting to be registered on a [`Player`].
pub struct StateSlot {
    pub(crate) type_id: TypeId,
    pub(crate) cell: Rc<dyn ErasedState>,
}

impl StateSlot {
    /// Wraps `state` for registration.
    pub fn new<T: PlayerState>(state: T) -> Self {
        Self::from_handle(Rc::new(StateCell::new(state)))
    }

    /// Wraps `state` and also returns the handle the player will hand out.
    pub fn with_handle<T: PlayerState>(state: T) -> (Self, StateRef<T>) {
        let handle = Rc::new(StateCell::new(state));
        (Self::from_handle(handle.clone()), handle)
    }

    fn from_handle<T: PlayerState>(handle: StateRef<T>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            cell: handle,
        }
    }

    /// Name of the wrapped state type.
    pub fn type_name(&self) -> &'static str {
        self.cell.type_name()
    }
}

impl fmt::Debug for StateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSlot")
            .field("type", &self.cell.type_name())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
