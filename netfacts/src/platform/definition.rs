//! Platform definition for vendor-specific session settings.

use regex::bytes::Regex;

use super::device_type::DeviceType;

/// Everything a session needs to know to drive one platform's CLI.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform this definition drives.
    pub device_type: DeviceType,

    /// Pattern matching any prompt the platform may show (exec, enable, config).
    pub prompt_pattern: Regex,

    /// Patterns that indicate command failure.
    pub failed_when_contains: Vec<String>,

    /// Commands to run when the session is opened.
    pub on_open_commands: Vec<String>,
}

impl PlatformDefinition {
    /// Create a new platform definition with minimal required fields.
    pub fn new(device_type: DeviceType, prompt_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            device_type,
            prompt_pattern: Regex::new(prompt_pattern)?,
            failed_when_contains: vec![],
            on_open_commands: vec![],
        })
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// First failure pattern present in `output`, if any.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Strip the echoed command and the trailing prompt line.
    pub fn normalize_output(&self, raw: &str, command: &str) -> String {
        let output = raw.replace("\r\n", "\n");
        let output = output.trim_start_matches(['\r', '\n']);
        let output = output
            .strip_prefix(command)
            .unwrap_or(output)
            .trim_start_matches(['\r', '\n']);

        // The last line is the prompt that ended the read.
        match memchr::memrchr(b'\n', output.as_bytes()) {
            Some(pos) => output[..pos].trim_end().to_string(),
            None if self.prompt_pattern.is_match(output.as_bytes()) => String::new(),
            None => output.trim_end().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> PlatformDefinition {
        PlatformDefinition::new(DeviceType::CiscoXe, r"(?m)^[a-zA-Z0-9_.\-]{1,63}[>#]\s?$")
            .unwrap()
            .with_failure_pattern("% Invalid input")
    }

    #[test]
    fn test_normalize_strips_echo_and_prompt() {
        let raw = "show clock\r\n*10:00:00.000 UTC Mon Jan 1 2024\r\nR1#";
        assert_eq!(
            definition().normalize_output(raw, "show clock"),
            "*10:00:00.000 UTC Mon Jan 1 2024"
        );
    }

    #[test]
    fn test_normalize_prompt_only() {
        assert_eq!(definition().normalize_output("terminal length 0\nR1#", "terminal length 0"), "");
        assert_eq!(definition().normalize_output("R1#", "terminal length 0"), "");
    }

    #[test]
    fn test_detect_failure() {
        let def = definition();
        assert_eq!(
            def.detect_failure("         ^\n% Invalid input detected at '^' marker."),
            Some("% Invalid input")
        );
        assert_eq!(def.detect_failure("Cisco IOS XE Software"), None);
    }
}
