//! Per-family storage discovery strategies.
//!
//! Each OS family lists its bootflash differently: NX-OS can emit JSON
//! directly, IOS-XE only prints text that needs a template. A strategy
//! bundles the command, how to decode its output and which record keys
//! hold the volume name and byte counts, so the orchestrator itself stays
//! family-agnostic.

use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::os::OsFamily;

static BUILTIN: LazyLock<StrategyTable> = LazyLock::new(StrategyTable::builtin);

/// How a storage command's output is turned into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// Request templated parsing and take the first record.
    Templated,
    /// Request raw text and decode it as a single JSON object.
    Json,
}

/// Command and field mapping for one family's storage listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStrategy {
    pub command: String,
    pub format: RecordFormat,
    /// Key whose value starts with the volume name, e.g. `bootflash:`.
    pub name_key: String,
    pub free_key: String,
    pub total_key: String,
}

impl StorageStrategy {
    pub fn new(
        command: impl Into<String>,
        format: RecordFormat,
        name_key: impl Into<String>,
        free_key: impl Into<String>,
        total_key: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            format,
            name_key: name_key.into(),
            free_key: free_key.into(),
            total_key: total_key.into(),
        }
    }

    /// `dir bootflash:` parsed with a template (IOS-XE and classic IOS).
    pub fn templated_dir() -> Self {
        Self::new(
            "dir bootflash:",
            RecordFormat::Templated,
            "file_system",
            "total_free",
            "total_size",
        )
    }

    /// `dir bootflash: | json` (NX-OS).
    pub fn nxos_json_dir() -> Self {
        Self::new(
            "dir bootflash: | json",
            RecordFormat::Json,
            "usage",
            "bytesfree",
            "bytestotal",
        )
    }
}

/// Strategies keyed by OS family, with a fallback for families not listed.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    strategies: IndexMap<OsFamily, StorageStrategy>,
    fallback: StorageStrategy,
}

impl StrategyTable {
    /// An empty table that uses `fallback` for every family.
    pub fn new(fallback: StorageStrategy) -> Self {
        Self {
            strategies: IndexMap::new(),
            fallback,
        }
    }

    /// NX-OS uses JSON; everything else uses the templated listing.
    pub fn builtin() -> Self {
        Self::new(StorageStrategy::templated_dir())
            .with(OsFamily::IosXe, StorageStrategy::templated_dir())
            .with(OsFamily::NxOs, StorageStrategy::nxos_json_dir())
    }

    /// Shared instance of [`builtin`](Self::builtin).
    pub fn builtin_ref() -> &'static StrategyTable {
        &BUILTIN
    }

    /// Set the strategy for a family.
    pub fn with(mut self, family: OsFamily, strategy: StorageStrategy) -> Self {
        self.strategies.insert(family, strategy);
        self
    }

    /// Strategy for `family`, or the fallback.
    pub fn for_family(&self, family: OsFamily) -> &StorageStrategy {
        self.strategies.get(&family).unwrap_or(&self.fallback)
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin()
    }
}
