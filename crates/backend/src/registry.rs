//! Explicit registry of backend drivers keyed by type name.

use std::collections::BTreeMap;

use crate::error::{BackendError, Result};
use crate::interface::{Backend, Driver, Params, TYPE_PARAM};

/// Registry mapping type names to drivers.
///
/// Drivers are registered once at startup; [`Registry::init`] then selects the
/// driver named by the `type` session parameter.
#[derive(Default)]
pub struct Registry {
    drivers: BTreeMap<&'static str, Box<dyn Driver>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver under its type name.
    ///
    /// Returns the previously registered driver for that name, if any.
    pub fn register(&mut self, driver: Box<dyn Driver>) -> Option<Box<dyn Driver>> {
        self.drivers.insert(driver.type_name(), driver)
    }

    /// Look up a driver by type name.
    pub fn get(&self, type_name: &str) -> Option<&dyn Driver> {
        self.drivers.get(type_name).map(|d| d.as_ref())
    }

    /// Registered type names, sorted.
    pub fn types(&self) -> Vec<&'static str> {
        self.drivers.keys().copied().collect()
    }

    /// Open a session with the driver selected by the `type` parameter.
    pub fn init(&self, params: &Params) -> Result<Box<dyn Backend>> {
        let type_name = params.get(TYPE_PARAM).map(String::as_str).unwrap_or("");
        let driver = self
            .get(type_name)
            .ok_or_else(|| BackendError::UnknownBackend(type_name.to_string()))?;
        driver.init(params)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types())
            .finish()
    }
}
