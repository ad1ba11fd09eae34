//! Global platform registry for looking up platform definitions.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use super::definition::PlatformDefinition;
use super::device_type::DeviceType;
use super::vendors;
use crate::error::{PlatformError, Result};

/// Global platform registry.
static REGISTRY: LazyLock<RwLock<PlatformRegistry>> =
    LazyLock::new(|| RwLock::new(PlatformRegistry::with_builtins()));

/// Registry for platform definitions, keyed by device type.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: HashMap<DeviceType, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in Cisco platforms.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for platform in [vendors::cisco::ios(), vendors::cisco::iosxe(), vendors::cisco::nxos()] {
            registry.platforms.insert(platform.device_type, platform);
        }
        registry
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<PlatformRegistry> {
        &REGISTRY
    }

    /// Look up a platform in the global registry.
    pub fn lookup(device_type: DeviceType) -> Result<PlatformDefinition> {
        let registry = Self::global()
            .read()
            .map_err(|_| PlatformError::InvalidDefinition {
                message: "Failed to acquire registry lock".to_string(),
            })?;
        registry.get(device_type).cloned().ok_or_else(|| {
            PlatformError::UnknownPlatform {
                name: device_type.to_string(),
            }
            .into()
        })
    }

    /// Register or replace a platform definition.
    ///
    /// Only concrete device types can be registered.
    pub fn register(&mut self, platform: PlatformDefinition) -> Result<()> {
        if !platform.device_type.is_concrete() {
            return Err(PlatformError::InvalidDefinition {
                message: format!("'{}' is not a concrete platform", platform.device_type),
            }
            .into());
        }
        self.platforms.insert(platform.device_type, platform);
        Ok(())
    }

    /// Get a platform by device type.
    pub fn get(&self, device_type: DeviceType) -> Option<&PlatformDefinition> {
        self.platforms.get(&device_type)
    }

    /// Check if a platform is registered.
    pub fn contains(&self, device_type: DeviceType) -> bool {
        self.platforms.contains_key(&device_type)
    }
}
