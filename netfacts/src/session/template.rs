//! Templated parsing of CLI output into records.
//!
//! [`TextFsmParser`] maps `(device type, command)` to a TextFSM template and
//! turns each parsed row into a JSON object with lower-case keys. Some
//! fields are lists on real devices (a chassis can report several hardware
//! models and serials); templates declare those and the parser wraps their
//! values in arrays so every record has the same shape regardless of how
//! many entries the device printed.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use textfsm_rust::Template;

use crate::error::{Result, TemplateError};
use crate::platform::DeviceType;

/// Converts command text into structured records.
pub trait RecordParser: Send + Sync {
    /// Parse `output` of `command` run on `device_type`.
    ///
    /// Returns `Ok(None)` when no template is known for the pair.
    fn parse(&self, device_type: DeviceType, command: &str, output: &str) -> Result<Option<Value>>;
}

/// A registered template.
#[derive(Debug, Clone)]
struct TemplateEntry {
    source: String,
    list_fields: Vec<String>,
}

/// TextFSM-backed [`RecordParser`].
#[derive(Debug, Clone, Default)]
pub struct TextFsmParser {
    templates: IndexMap<(DeviceType, String), TemplateEntry>,
}

const XE_SHOW_VERSION: &str = include_str!("../../templates/cisco_xe_show_version.textfsm");
const NXOS_SHOW_VERSION: &str = include_str!("../../templates/cisco_nxos_show_version.textfsm");
const XE_DIR: &str = include_str!("../../templates/cisco_xe_dir.textfsm");

impl TextFsmParser {
    /// Create a parser with no templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser holding the built-in Cisco templates.
    pub fn with_builtins() -> Result<Self> {
        let mut parser = Self::new();
        for device_type in [DeviceType::CiscoXe, DeviceType::CiscoIos] {
            parser.register(device_type, "show version", XE_SHOW_VERSION, &["hardware", "serial"])?;
            parser.register(device_type, "dir bootflash:", XE_DIR, &[])?;
        }
        parser.register(DeviceType::CiscoNxos, "show version", NXOS_SHOW_VERSION, &[])?;
        Ok(parser)
    }

    /// Register a template for a command, replacing any previous one.
    ///
    /// The template is compiled once here so a broken template is reported
    /// at registration rather than on first use.
    pub fn register(
        &mut self,
        device_type: DeviceType,
        command: &str,
        source: &str,
        list_fields: &[&str],
    ) -> Result<()> {
        compile(command, source)?;
        self.templates.insert(
            (device_type, normalize_command(command)),
            TemplateEntry {
                source: source.to_string(),
                list_fields: list_fields.iter().map(|f| f.to_ascii_lowercase()).collect(),
            },
        );
        Ok(())
    }

    /// Whether a template is registered for the pair.
    pub fn has_template(&self, device_type: DeviceType, command: &str) -> bool {
        self.templates
            .contains_key(&(device_type, normalize_command(command)))
    }
}

impl RecordParser for TextFsmParser {
    fn parse(&self, device_type: DeviceType, command: &str, output: &str) -> Result<Option<Value>> {
        let Some(entry) = self
            .templates
            .get(&(device_type, normalize_command(command)))
        else {
            return Ok(None);
        };

        let template = compile(command, &entry.source)?;
        let mut parser = template.parser();
        let rows = parser
            .parse_text_to_dicts(output)
            .map_err(|e| TemplateError::Parse {
                command: command.to_string(),
                message: e.to_string(),
            })?;

        let records = rows
            .into_iter()
            .map(|row| row_to_record(row, &entry.list_fields))
            .collect();
        Ok(Some(Value::Array(records)))
    }
}

fn compile(command: &str, source: &str) -> Result<Template> {
    Template::parse_str(source).map_err(|e| {
        TemplateError::Compile {
            command: command.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Collapse runs of whitespace so `dir  bootflash:` finds the same template.
fn normalize_command(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn row_to_record(row: HashMap<String, String>, list_fields: &[String]) -> Value {
    let mut record = Map::new();
    for (key, value) in row {
        let key = key.to_ascii_lowercase();
        let value = if list_fields.contains(&key) {
            if value.is_empty() {
                Value::Array(vec![])
            } else {
                Value::Array(vec![Value::String(value)])
            }
        } else {
            Value::String(value)
        };
        record.insert(key, value);
    }
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_compile() {
        let parser = TextFsmParser::with_builtins().unwrap();
        assert!(parser.has_template(DeviceType::CiscoXe, "show version"));
        assert!(parser.has_template(DeviceType::CiscoIos, "dir bootflash:"));
        assert!(parser.has_template(DeviceType::CiscoNxos, "show  version"));
        assert!(!parser.has_template(DeviceType::CiscoNxos, "dir bootflash:"));
    }

    #[test]
    fn test_unknown_command_has_no_records() {
        let parser = TextFsmParser::new();
        let parsed = parser.parse(DeviceType::CiscoXe, "show clock", "10:00").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_row_to_record_wraps_list_fields() {
        let row = HashMap::from([
            ("HOSTNAME".to_string(), "R1".to_string()),
            ("HARDWARE".to_string(), "CSR1000V".to_string()),
            ("SERIAL".to_string(), String::new()),
        ]);
        let record = row_to_record(row, &["hardware".to_string(), "serial".to_string()]);
        assert_eq!(record["hostname"], "R1");
        assert_eq!(record["hardware"], serde_json::json!(["CSR1000V"]));
        assert_eq!(record["serial"], serde_json::json!([]));
    }

    #[test]
    fn test_nxos_platform_is_bare_chassis_model() {
        let parser = TextFsmParser::with_builtins().unwrap();
        for (line, model) in [
            ("  cisco Nexus9000 C93180YC-EX chassis", "C93180YC-EX"),
            ("  cisco Nexus 3048 Chassis (\"48x1GE + 4x10G Supervisor\")", "3048"),
            ("  cisco Nexus7000 C7010 (10 Slot) Chassis (\"Supervisor Module-2\")", "C7010"),
        ] {
            let output = format!("  NXOS: version 9.3(8)\n{}\n  Device name: N9K-1\n", line);
            let records = parser
                .parse(DeviceType::CiscoNxos, "show version", &output)
                .unwrap()
                .unwrap();
            assert_eq!(records[0]["platform"], model, "line: {}", line);
            assert_eq!(records[0]["os"], "9.3(8)");
        }
    }

    #[test]
    fn test_normalize_command() {
        assert_eq!(normalize_command("  dir   bootflash: "), "dir bootflash:");
    }
}
