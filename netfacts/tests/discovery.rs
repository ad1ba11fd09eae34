//! Discovery through the public API, with a scripted session standing in
//! for the device.

use std::collections::VecDeque;

use netfacts::session::RecordParser;
use netfacts::{
    CapturedLog, CommandOutput, DeviceFacts, DeviceType, Discovery, DiscoveryOutcome, ExecOptions,
    InstallMode, OsFamily, Result, Session, Stage, StorageInfo, TextFsmParser,
};
use serde_json::{Value, json};

const XE_SHOW_VERSION: &str = "\
Cisco IOS XE Software, Version 17.03.04a
Cisco IOS Software [Amsterdam], Virtual XE Software (X86_64_LINUX_IOSD-UNIVERSALK9-M), Version 17.3.4a, RELEASE SOFTWARE (fc3)

ROM: IOS-XE ROMMON

R1 uptime is 2 weeks, 3 days, 4 hours, 5 minutes
Uptime for this control processor is 2 weeks, 3 days, 4 hours, 7 minutes
System returned to ROM by reload
System image file is \"bootflash:packages.conf\"

cisco CSR1000V (VXE) processor (revision VXE) with 2071829K/3075K bytes of memory.
Processor board ID 9ABC123

Configuration register is 0x2102
";

const XE_DIR: &str = "\
Directory of bootflash:/

   11  drwx            16384  Nov 25 2016 14:14:26 +00:00  lost+found
   12  -rw-        392479704  Jan 10 2022 10:01:44 +00:00  csr1000v-mono-universalk9.17.03.04a.SPA.pkg

7897796608 bytes total (6043533312 bytes free)
";

const NXOS_SHOW_VERSION: &str = "\
Cisco Nexus Operating System (NX-OS) Software
TAC support: http://www.cisco.com/tac
Copyright (C) 2002-2021, Cisco and/or its affiliates.
All rights reserved.

Software
  BIOS: version 07.69
  NXOS: version 9.3(8)
  BIOS compile time:  04/08/2021
  NXOS image file is: bootflash:///nxos.9.3.8.bin
  NXOS compile time:  8/31/2021 12:00:00 [08/31/2021 12:21:49]

Hardware
  cisco Nexus9000 C93180YC-EX chassis
  Intel(R) Xeon(R) CPU  @ 1.80GHz with 24571632 kB of memory.
  Processor Board ID FDO12345678

  Device name: N9K-1
  bootflash:   53298520 kB
Kernel uptime is 12 day(s), 3 hour(s), 4 minute(s), 5 second(s)
";

const NXOS_DIR_JSON: &str = r#"{
  "TABLE_dir": {"ROW_dir": [{"size": "1976467968", "timestamp": "Sep 01 10:00:00 2021", "fname": "nxos.9.3.8.bin"}]},
  "usage": "bootflash:",
  "bytesused": "4500000000",
  "bytesfree": "49000000000",
  "bytestotal": "53500000000"
}"#;

/// Session that parses canned device text with a real [`RecordParser`].
struct CannedDevice<P> {
    device_type: DeviceType,
    parser: P,
    outputs: VecDeque<(&'static str, &'static str)>,
}

impl<P: RecordParser> Session for CannedDevice<P> {
    async fn execute(&mut self, command: &str, options: ExecOptions) -> Result<CommandOutput> {
        let (expected, text) = self.outputs.pop_front().expect("unexpected command");
        assert_eq!(command, expected);

        if !options.templated {
            return Ok(CommandOutput::Text(text.to_string()));
        }
        Ok(match self.parser.parse(self.device_type, command, text)? {
            Some(records) => CommandOutput::Structured(records),
            None => CommandOutput::Text(text.to_string()),
        })
    }
}

/// Session that hands back records as-is.
struct RecordSession(VecDeque<Value>);

impl Session for RecordSession {
    async fn execute(&mut self, _command: &str, _options: ExecOptions) -> Result<CommandOutput> {
        Ok(CommandOutput::Structured(self.0.pop_front().unwrap_or(Value::Null)))
    }
}

#[tokio::test]
async fn discovers_iosxe_from_cli_text() {
    let mut session = CannedDevice {
        device_type: DeviceType::CiscoXe,
        parser: TextFsmParser::with_builtins().unwrap(),
        outputs: VecDeque::from([("show version", XE_SHOW_VERSION), ("dir bootflash:", XE_DIR)]),
    };
    let log = CapturedLog::new();
    let mut facts = DeviceFacts::default();

    let outcome = Discovery::new(&mut session, &log).run(&mut facts).await;

    assert_eq!(outcome, DiscoveryOutcome::Complete, "log: {:?}", log.entries());
    assert_eq!(facts.hostname.as_deref(), Some("R1"));
    assert_eq!(facts.model.as_deref(), Some("CSR1000V"));
    assert_eq!(facts.serial.as_deref(), Some("9ABC123"));
    assert_eq!(facts.config_register.as_deref(), Some("0x2102"));

    let os = facts.os.as_ref().unwrap();
    assert_eq!(os.family(), OsFamily::IosXe);
    assert_eq!(os.install_mode(), InstallMode::Install);

    let storage = facts.storage.as_ref().unwrap();
    assert_eq!(storage, &StorageInfo::new("bootflash", 6_043_533_312, 7_897_796_608));
    assert!(storage.has_space(6_043_533_312));
    assert!(!storage.has_space(6_043_533_313));
}

#[tokio::test]
async fn discovers_nxos_from_cli_text() {
    let mut session = CannedDevice {
        device_type: DeviceType::CiscoNxos,
        parser: TextFsmParser::with_builtins().unwrap(),
        outputs: VecDeque::from([
            ("show version", NXOS_SHOW_VERSION),
            ("dir bootflash: | json", NXOS_DIR_JSON),
        ]),
    };
    let log = CapturedLog::new();
    let mut facts = DeviceFacts::default();

    let outcome = Discovery::new(&mut session, &log).run(&mut facts).await;

    assert_eq!(outcome, DiscoveryOutcome::Complete, "log: {:?}", log.entries());
    assert_eq!(facts.hostname.as_deref(), Some("N9K-1"));
    assert_eq!(facts.model.as_deref(), Some("C93180YC-EX"));
    assert_eq!(facts.serial.as_deref(), Some("FDO12345678"));
    assert_eq!(facts.config_register, None);

    let os = facts.os.as_ref().unwrap();
    assert_eq!(os.family(), OsFamily::NxOs);
    assert_eq!(os.raw(), "9.3(8)");
    assert_eq!(os.install_mode(), InstallMode::NotApplicable);

    assert_eq!(
        facts.storage,
        Some(StorageInfo::new("bootflash", 49_000_000_000, 53_500_000_000))
    );
}

#[tokio::test]
async fn distilled_record_example() {
    let mut session = RecordSession(VecDeque::from([
        json!([{
            "hostname": "R1",
            "hardware": ["CSR1000V"],
            "serial": ["9ABC123"],
            "version": "17.3.4a",
            "boot_image": "packages.conf"
        }]),
        json!([{"file_system": "bootflash:", "total_free": "1000000", "total_size": "2000000"}]),
    ]));
    let log = CapturedLog::new();
    let mut facts = DeviceFacts::default();

    let outcome = Discovery::new(&mut session, &log).run(&mut facts).await;
    assert!(outcome.is_complete());

    let report = serde_json::to_value(&facts).unwrap();
    assert_eq!(report["hostname"], "R1");
    assert_eq!(report["os"]["family"], "IOS-XE");
    assert_eq!(report["os"]["install_mode"], "INSTALL");
    assert_eq!(report["storage"]["name"], "bootflash");
    assert_eq!(report["storage"]["total_free_b"], 1_000_000);
    assert_eq!(report["storage"]["total_size_b"], 2_000_000);
}

#[tokio::test]
async fn null_output_stops_before_any_field() {
    let mut session = RecordSession(VecDeque::new());
    let log = CapturedLog::new();
    let mut facts = DeviceFacts::default();

    let outcome = Discovery::new(&mut session, &log).run(&mut facts).await;

    assert_eq!(outcome, DiscoveryOutcome::Stopped(Stage::VersionRecord));
    assert!(facts.is_empty());
}
