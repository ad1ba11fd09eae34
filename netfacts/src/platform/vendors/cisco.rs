//! Cisco IOS, IOS-XE and NX-OS platform definitions.
//!
//! All three share the classic Cisco prompt shape:
//!
//! ```text
//! router>                      # user exec
//! router#                      # privileged exec
//! router(config)#              # configuration
//! router(config-if)#           # configuration sub-mode
//! switch-01.lab#               # NX-OS hostnames may contain dots and dashes
//! ```
//!
//! Discovery only runs `show` and `dir` commands, which work from either
//! exec level, so no privilege escalation is modelled.

use crate::platform::{DeviceType, PlatformDefinition};

/// Prompt for exec, privileged exec and configuration modes.
const PROMPT_PATTERN: &str =
    r"(?m)^[a-zA-Z0-9_.\-@/:]{1,63}(?:\(config[a-zA-Z0-9_.\-@/:+]{0,32}\))?[>#]\s?$";

fn common(device_type: DeviceType) -> PlatformDefinition {
    PlatformDefinition::new(device_type, PROMPT_PATTERN)
        .unwrap()
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Unknown command")
        .with_on_open_command("terminal length 0")
}

/// Create the classic IOS platform definition.
pub fn ios() -> PlatformDefinition {
    common(DeviceType::CiscoIos)
        .with_on_open_command("terminal width 511")
}

/// Create the IOS-XE platform definition.
pub fn iosxe() -> PlatformDefinition {
    common(DeviceType::CiscoXe)
        .with_on_open_command("terminal width 511")
}

/// Create the NX-OS platform definition.
pub fn nxos() -> PlatformDefinition {
    common(DeviceType::CiscoNxos)
        .with_failure_pattern("% Invalid command")
        .with_failure_pattern("Syntax error while parsing")
        .with_on_open_command("terminal width 511")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_types() {
        assert_eq!(ios().device_type, DeviceType::CiscoIos);
        assert_eq!(iosxe().device_type, DeviceType::CiscoXe);
        assert_eq!(nxos().device_type, DeviceType::CiscoNxos);
    }

    #[test]
    fn test_prompt_match() {
        let platform = iosxe();
        for prompt in [
            "router>",
            "router#",
            "router# ",
            "router(config)#",
            "router(config-if)#",
            "switch-01.lab#",
            "output line\nR1#",
        ] {
            assert!(platform.prompt_pattern.is_match(prompt.as_bytes()), "{prompt}");
        }
    }

    #[test]
    fn test_prompt_does_not_match_output() {
        let platform = nxos();
        for line in [
            "Cisco Nexus Operating System (NX-OS) Software",
            "  bootflash:///nxos.9.3.10.bin",
            "Total bytes: 1000",
        ] {
            assert!(!platform.prompt_pattern.is_match(line.as_bytes()), "{line}");
        }
    }

    #[test]
    fn test_failure_patterns() {
        let platform = nxos();
        assert!(platform.detect_failure("% Invalid command at '^' marker.").is_some());
        assert!(iosxe().detect_failure("% Invalid command at '^' marker.").is_none());
    }

    #[test]
    fn test_on_open_commands() {
        let platform = iosxe();
        assert_eq!(
            platform.on_open_commands,
            vec!["terminal length 0".to_string(), "terminal width 511".to_string()]
        );
    }
}
