//! Bus configuration: process-wide defaults plus per-instance overrides.
//!
//! [`configure`] replaces the defaults consumed by buses created afterwards;
//! buses that already exist keep the configuration they were built with.

use std::sync::OnceLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Configuration carried by an event bus instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    /// Emit trace-level diagnostics for mutating operations.
    pub debug_enabled: bool,
    /// Name tagged onto every diagnostic message from the instance.
    pub instance_name: String,
    /// Separator splitting namespace paths into segments.
    pub separator: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            debug_enabled: false,
            instance_name: "events".to_string(),
            separator: ".".to_string(),
        }
    }
}

/// Per-instance overrides applied on top of the process-wide defaults.
///
/// Unset fields fall through to whatever [`configure`] (or the built-in
/// defaults) established.
#[derive(Debug, Clone, Default)]
pub struct BusOptions {
    /// Override for [`BusConfig::debug_enabled`].
    pub debug_enabled: Option<bool>,
    /// Override for [`BusConfig::instance_name`].
    pub instance_name: Option<String>,
    /// Override for [`BusConfig::separator`].
    pub separator: Option<String>,
}

impl BusOptions {
    pub(crate) fn apply(self, mut base: BusConfig) -> BusConfig {
        if let Some(debug_enabled) = self.debug_enabled {
            base.debug_enabled = debug_enabled;
        }
        if let Some(instance_name) = self.instance_name {
            base.instance_name = instance_name;
        }
        if let Some(separator) = self.separator {
            base.separator = separator;
        }
        base
    }
}

fn defaults() -> &'static RwLock<BusConfig> {
    static DEFAULTS: OnceLock<RwLock<BusConfig>> = OnceLock::new();
    DEFAULTS.get_or_init(|| RwLock::new(BusConfig::default()))
}

/// Replace the process-wide defaults consumed by new bus instances.
///
/// Instances that already exist are unaffected; configuration is copied at
/// construction time.
pub fn configure(config: BusConfig) {
    *defaults().write() = config;
}

/// Snapshot of the current process-wide defaults.
pub fn default_config() -> BusConfig {
    defaults().read().clone()
}
