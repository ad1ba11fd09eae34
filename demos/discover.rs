//! Discover facts from a Cisco device and print them as JSON.
//!
//! # Usage
//!
//! With password authentication:
//! ```bash
//! cargo run --example discover -- --host 192.168.1.1 --user admin --password secret
//! ```
//!
//! Forcing the platform instead of detecting it:
//! ```bash
//! cargo run --example discover -- --host nexus1 --user admin --key ~/.ssh/id_ed25519 --type cisco_nxos
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use netfacts::{DeviceBuilder, DeviceType, HostKeyVerification};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut builder = DeviceBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .device_type(args.device_type)
        .timeout(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    if args.insecure {
        builder = builder.host_key_verification(HostKeyVerification::Disabled);
    }

    let mut device = builder.build()?;

    println!("Connecting to {}:{}...", args.host, args.port);
    device.connect().await?;
    println!("Connected ({})", device.device_type());

    let outcome = device.discover().await;
    println!("Discovery: {:?}", outcome);
    println!("{}", serde_json::to_string_pretty(device.facts())?);

    if let Some(storage) = &device.facts().storage {
        let required = megabytes_to_bytes(args.required_mb);
        println!(
            "{} has room for {} MB: {}",
            storage.name,
            args.required_mb,
            storage.has_space(required)
        );
    }

    device.disconnect().await?;
    Ok(())
}

fn megabytes_to_bytes(mb: u64) -> u64 {
    mb.saturating_mul(1024 * 1024)
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    device_type: DeviceType,
    timeout: u64,
    required_mb: u64,
    insecure: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 22u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut device_type = DeviceType::AutoDetect;
        let mut timeout = 30u64;
        let mut required_mb = 0u64;
        let mut insecure = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(22);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--type" | "-T" => {
                    i += 1;
                    if i < args.len() {
                        match args[i].parse() {
                            Ok(parsed) => device_type = parsed,
                            Err(e) => eprintln!("{}, using autodetect", e),
                        }
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--require-mb" => {
                    i += 1;
                    if i < args.len() {
                        required_mb = args[i].parse().unwrap_or(0);
                    }
                }
                "--insecure" => insecure = true,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            user,
            password,
            key,
            device_type,
            timeout,
            required_mb,
            insecure,
        }
    }

    fn print_help() {
        println!(
            r#"netfacts discover example

USAGE:
    cargo run --example discover -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Target host [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password for authentication
    -k, --key <PATH>         Path to SSH private key
    -T, --type <TYPE>        cisco_ios, cisco_xe, cisco_nxos or autodetect [default: autodetect]
    -t, --timeout <SECS>     Connection timeout [default: 30]
    --require-mb <MB>        Report whether the boot volume has this much free space
    --insecure               Skip host key verification
    --help                   Print this help message
"#
        );
    }
}
