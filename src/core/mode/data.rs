//=========================================================================
// Mode Data
//=========================================================================
//
// Key/value payload handed from one game mode to the next.
//
// Values are opaque (`Box<dyn Any>`) and read back with a typed lookup,
// the same downcast-on-read approach the config repository uses.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

//=== ModeData ============================================================

/// Hand-off data for a game mode.
///
/// ```rust
/// # use aetheric_gameplay::prelude::*;
/// let data = ModeData::new().with("round", 3_u32).with("map", "dunes".to_string());
/// assert_eq!(data.get::<u32>("round"), Some(&3));
/// assert_eq!(data.get::<i64>("round"), None);
/// ```
#[derive(Default)]
pub struct ModeData {
    entries: HashMap<String, Box<dyn Any>>,
}

impl ModeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key` and returns the map (builder style).
    pub fn with<T: Any>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts `value` under `key`, replacing any previous value.
    pub fn insert<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Returns the value under `key` if it has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref::<T>()
    }

    /// Returns the value under `key` mutably if it has type `T`.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)?.downcast_mut::<T>()
    }

    /// Removes and returns the value under `key` if it has type `T`.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.entries.get(key)?.is::<T>() {
            return None;
        }
        let value = self.entries.remove(key)?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ModeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("ModeData").field("keys", &keys).finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
