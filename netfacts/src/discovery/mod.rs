//! Fact discovery over a [`Session`].
//!
//! A run issues `show version`, classifies the OS and its install mode,
//! then lists the boot volume with whatever command the OS family needs.
//! Bad or missing data never raises: the run logs what went wrong through
//! its [`DiscoveryLog`] and stops, leaving every field it already filled in
//! the snapshot.
//!
//! ```rust,no_run
//! # use netfacts::{DeviceFacts, Discovery, LogFacade};
//! # async fn run(session: &mut netfacts::SshSession) {
//! let mut facts = DeviceFacts::default();
//! let outcome = Discovery::new(session, &LogFacade).run(&mut facts).await;
//! println!("{:?}: {:?}", outcome, facts.hostname);
//! # }
//! ```

mod strategy;

pub use strategy::{RecordFormat, StorageStrategy, StrategyTable};

use std::fmt;

use serde_json::Value;

use crate::access::PathStep::{Index, Key};
use crate::access::{SafeAccessor, scalar_text};
use crate::diagnostics::DiscoveryLog;
use crate::facts::DeviceFacts;
use crate::os::parse_version;
use crate::session::{CommandOutput, ExecOptions, Session};
use crate::storage::StorageInfo;

const SHOW_VERSION: &str = "show version";

/// Step at which a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `show version` could not be run.
    VersionFetch,
    /// `show version` returned no usable record.
    VersionRecord,
    /// The record carried no parsable OS version.
    OsVersion,
    /// The storage command could not be run.
    StorageFetch,
    /// The storage output was not a JSON object.
    StorageDecode,
    /// The storage command returned no usable record.
    StorageRecord,
    /// The storage record lacked a name or byte counts.
    StorageFields,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::VersionFetch => "version fetch",
            Stage::VersionRecord => "version record",
            Stage::OsVersion => "os version",
            Stage::StorageFetch => "storage fetch",
            Stage::StorageDecode => "storage decode",
            Stage::StorageRecord => "storage record",
            Stage::StorageFields => "storage fields",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// Every stage ran.
    Complete,
    /// The run stopped early; earlier fields are still populated.
    Stopped(Stage),
}

impl DiscoveryOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, DiscoveryOutcome::Complete)
    }

    /// The stage the run stopped at, if it stopped.
    pub fn stopped_at(&self) -> Option<Stage> {
        match self {
            DiscoveryOutcome::Complete => None,
            DiscoveryOutcome::Stopped(stage) => Some(*stage),
        }
    }
}

/// One discovery run bound to a session and a diagnostic sink.
pub struct Discovery<'a, S: Session> {
    session: &'a mut S,
    log: &'a dyn DiscoveryLog,
    strategies: &'a StrategyTable,
}

impl<'a, S: Session> Discovery<'a, S> {
    /// Use the built-in storage strategies.
    pub fn new(session: &'a mut S, log: &'a dyn DiscoveryLog) -> Self {
        Self {
            session,
            log,
            strategies: StrategyTable::builtin_ref(),
        }
    }

    /// Replace the storage strategy table.
    pub fn with_strategies(mut self, strategies: &'a StrategyTable) -> Self {
        self.strategies = strategies;
        self
    }

    /// Populate `facts` from the device.
    ///
    /// `facts` is reset first, so a second run replaces the first rather
    /// than merging with it.
    pub async fn run(&mut self, facts: &mut DeviceFacts) -> DiscoveryOutcome {
        *facts = DeviceFacts::default();
        match self.populate(facts).await {
            Ok(()) => DiscoveryOutcome::Complete,
            Err(stage) => {
                self.log
                    .info(&format!("discovery: stopped at {}", stage));
                DiscoveryOutcome::Stopped(stage)
            }
        }
    }

    async fn populate(&mut self, facts: &mut DeviceFacts) -> Result<(), Stage> {
        let log = self.log;
        let strategies = self.strategies;
        let access = SafeAccessor::new(log);

        let records = self
            .fetch(SHOW_VERSION, ExecOptions::templated(), Stage::VersionFetch)
            .await?
            .into_value();
        let Some(record) = access
            .get(&records, &[Index(0)], Some("raw[0]"))
            .filter(|r| r.is_object())
        else {
            log.info(&format!("discovery: '{}' returned no record", SHOW_VERSION));
            return Err(Stage::VersionRecord);
        };

        facts.hostname = access.text(record, &[Key("hostname")], Some("hostname"));
        facts.config_register =
            access.text(record, &[Key("config_register")], Some("config_register"));
        facts.model = access
            .text(record, &[Key("hardware"), Index(0)], None)
            .or_else(|| access.text(record, &[Key("platform")], None));
        facts.serial = access
            .text(record, &[Key("serial"), Index(0)], None)
            .or_else(|| access.text(record, &[Key("serial_number")], None));

        let raw_version = access
            .text(record, &[Key("os")], None)
            .or_else(|| access.text(record, &[Key("version")], None));
        let Some(mut os) = raw_version.as_deref().and_then(parse_version) else {
            log.info(&format!(
                "discovery: no parsable OS version (got {:?})",
                raw_version
            ));
            return Err(Stage::OsVersion);
        };

        let image = access
            .text(record, &[Key("running_image")], None)
            .or_else(|| access.text(record, &[Key("boot_image")], None))
            .unwrap_or_default();
        os.set_install_mode(&image);
        let family = os.family();
        facts.os = Some(os);

        let strategy = strategies.for_family(family);
        let options = match strategy.format {
            RecordFormat::Json => ExecOptions::raw(),
            RecordFormat::Templated => ExecOptions::templated(),
        };
        let output = self
            .fetch(&strategy.command, options, Stage::StorageFetch)
            .await?;

        let storage_record = match strategy.format {
            RecordFormat::Json => decode_json(output, &strategy.command, log)?,
            RecordFormat::Templated => {
                let records = output.into_value();
                match access
                    .get(&records, &[Index(0)], Some("storage_raw[0]"))
                    .filter(|r| r.is_object())
                {
                    Some(record) => record.clone(),
                    None => {
                        log.info(&format!(
                            "discovery: '{}' returned no record",
                            strategy.command
                        ));
                        return Err(Stage::StorageRecord);
                    }
                }
            }
        };

        facts.storage = Some(storage_from_record(
            &access,
            &storage_record,
            strategy,
            log,
        )?);
        Ok(())
    }

    async fn fetch(
        &mut self,
        command: &str,
        options: ExecOptions,
        stage: Stage,
    ) -> Result<CommandOutput, Stage> {
        let log = self.log;
        self.session.execute(command, options).await.map_err(|e| {
            log.error(&format!("discovery: '{}' failed: {}", command, e));
            stage
        })
    }
}

impl<S: Session> fmt::Debug for Discovery<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovery")
            .field("strategies", &self.strategies)
            .finish_non_exhaustive()
    }
}

/// Decode raw command text as a single JSON object.
fn decode_json(output: CommandOutput, command: &str, log: &dyn DiscoveryLog) -> Result<Value, Stage> {
    let value = match output {
        CommandOutput::Text(text) => serde_json::from_str::<Value>(text.trim()).map_err(|e| {
            log.error(&format!("discovery: '{}' is not valid JSON: {}", command, e));
            Stage::StorageDecode
        })?,
        CommandOutput::Structured(value) => value,
    };

    if !value.is_object() {
        log.error(&format!(
            "discovery: '{}' decoded to {}, expected an object",
            command,
            json_kind(&value)
        ));
        return Err(Stage::StorageDecode);
    }
    Ok(value)
}

fn storage_from_record(
    access: &SafeAccessor<'_>,
    record: &Value,
    strategy: &StorageStrategy,
    log: &dyn DiscoveryLog,
) -> Result<StorageInfo, Stage> {
    let field = |key: &str| access.get(record, &[Key(key)], None);

    let Some(volume) = field(&strategy.name_key).and_then(scalar_text) else {
        log.error(&format!(
            "discovery: storage record has no '{}'",
            strategy.name_key
        ));
        return Err(Stage::StorageFields);
    };
    let name = volume.split(':').next().unwrap_or_default().trim();

    let free = field(&strategy.free_key).and_then(byte_count);
    let total = field(&strategy.total_key).and_then(byte_count);
    match (free, total) {
        (Some(free), Some(total)) => Ok(StorageInfo::new(name, free, total)),
        _ => {
            log.error(&format!(
                "discovery: unusable byte counts for '{}' ({}={:?}, {}={:?})",
                name,
                strategy.free_key,
                field(&strategy.free_key),
                strategy.total_key,
                field(&strategy.total_key)
            ));
            Err(Stage::StorageFields)
        }
    }
}

/// A byte count given as a JSON number or a numeric string.
fn byte_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
