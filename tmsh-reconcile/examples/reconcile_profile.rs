//! Reconcile one object on a live appliance.
//!
//! Reads the desired state from a JSON file and converges the object.
//!
//! # Usage
//!
//! ```bash
//! cat > tcp_app.json <<'EOF'
//! { "name": "tcp_app", "partition": "Common", "idle-timeout": 300, "nagle": "enabled" }
//! EOF
//! cargo run --example reconcile_profile -- --host 192.0.2.10 --user admin \
//!     --password secret --kind tcp --desired tcp_app.json
//! ```
//!
//! Set RUST_LOG=debug to see the scripts and replies.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tmsh_reconcile::{DesiredConfig, KindRegistry, ReconcilerBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let Some(desired_path) = &args.desired else {
        eprintln!("Error: --desired <FILE> is required");
        std::process::exit(1);
    };
    let desired: DesiredConfig = serde_json::from_str(&std::fs::read_to_string(desired_path)?)?;

    let mut builder = ReconcilerBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .kind(&args.kind)
        .timeout(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    let reconciler = builder.build()?;

    println!(
        "Reconciling {} '{}' on {}:{}...",
        reconciler.kind().name,
        desired.name().unwrap_or("?"),
        args.host,
        args.port
    );

    let outcome = reconciler.reconcile(&desired).await?;

    println!("{}", "-".repeat(50));
    if let Some(script) = &outcome.script {
        println!("{}", script);
        println!("{}", "-".repeat(50));
    }
    println!("{}", outcome.message());
    println!("Changed: {}", outcome.changed());
    println!("Completed in {:?}", outcome.elapsed);

    Ok(())
}

struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    kind: String,
    desired: Option<PathBuf>,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 22u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut kind = "tcp".to_string();
        let mut desired = None;
        let mut timeout = 30u64;

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
                "--kind" | "-K" => {
                    i += 1;
                    if i < args.len() {
                        kind = args[i].clone();
                    }
                }
                "--desired" | "-d" => {
                    i += 1;
                    if i < args.len() {
                        desired = Some(PathBuf::from(&args[i]));
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
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
            kind,
            desired,
            timeout,
        }
    }

    fn print_help() {
        println!(
            r#"tmsh-reconcile reconcile_profile example

USAGE:
    cargo run --example reconcile_profile -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Appliance host [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password for authentication
    -k, --key <PATH>         Path to SSH private key
    -K, --kind <KIND>        Resource kind [default: tcp]
    -d, --desired <FILE>     JSON file with the desired state
    -t, --timeout <SECS>     Connection timeout [default: 30]
    --help                   Print this help message

KINDS:
    {}
"#,
            KindRegistry::global()
                .read()
                .map(|registry| {
                    let mut names: Vec<&str> = registry.names().map(String::as_str).collect();
                    names.sort();
                    names.join(", ")
                })
                .unwrap_or_default()
        );
    }
}
