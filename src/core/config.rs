//=========================================================================
// Config Repository
//=========================================================================
//
// Static settings lookup keyed by the requested type.
//
// Architecture:
//   register<T>() → Vec<Box<dyn Any>>
//                        ↓
//   get<T>() ← first entry that downcasts to T
//
// Registration order is lookup order: when two configs share a type the
// first one registered is returned.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any};

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::{FrameworkError, Result};
use crate::core::globals::SingletonGuard;

//=== ConfigRepository ====================================================

/// Type-keyed store of configuration objects.
///
/// Only one repository may be alive at a time; it is normally handed to
/// the [`GameInstanceBuilder`](crate::GameInstanceBuilder) and reached
/// from game modes through
/// [`ModeContext::config`](crate::core::globals::ModeContext).
pub struct ConfigRepository {
    configs: Vec<Box<dyn Any>>,
    _guard: SingletonGuard,
}

impl ConfigRepository {
    //--- Construction -----------------------------------------------------

    /// Creates an empty repository.
    ///
    /// # Panics
    ///
    /// Panics if another `ConfigRepository` is still alive.
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            _guard: SingletonGuard::acquire("ConfigRepository"),
        }
    }

    /// Registers `config` and returns the repository (builder style).
    pub fn with<T: Any>(mut self, config: T) -> Self {
        self.register(config);
        self
    }

    /// Registers `config`.
    pub fn register<T: Any>(&mut self, config: T) {
        debug!("Registered config {}", type_name::<T>());
        self.configs.push(Box::new(config));
    }

    //--- Lookup -----------------------------------------------------------

    /// Returns the config of type `T`.
    ///
    /// # Panics
    ///
    /// Panics if no config of type `T` was registered.
    pub fn get<T: Any>(&self) -> &T {
        match self.try_get::<T>() {
            Ok(config) => config,
            Err(e) => panic!("{}", e),
        }
    }

    /// Returns the config of type `T`, or [`FrameworkError::MissingConfig`].
    pub fn try_get<T: Any>(&self) -> Result<&T> {
        self.configs
            .iter()
            .find_map(|config| config.downcast_ref::<T>())
            .ok_or(FrameworkError::MissingConfig {
                type_name: type_name::<T>(),
            })
    }

    /// Returns true if a config of type `T` was registered.
    pub fn contains<T: Any>(&self) -> bool {
        self.configs.iter().any(|config| config.is::<T>())
    }

    /// Number of registered configs.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns true if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl Default for ConfigRepository {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
