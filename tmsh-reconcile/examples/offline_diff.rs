//! Plan a reconciliation against a saved listing, without a device.
//!
//! Useful for checking how a captured `list ... all-properties` reply is
//! read and which script would be sent.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example offline_diff -- --kind tcp --listing tcp_app.txt --desired tcp_app.json
//! ```

use std::env;
use std::path::PathBuf;

use tmsh_reconcile::{DesiredConfig, ReconcilerBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let (Some(listing_path), Some(desired_path)) = (&args.listing, &args.desired) else {
        eprintln!("Error: --listing <FILE> and --desired <FILE> are required");
        std::process::exit(1);
    };

    let desired: DesiredConfig = serde_json::from_str(&std::fs::read_to_string(desired_path)?)?;
    let listing = std::fs::read_to_string(listing_path)?;
    let lines: Vec<&str> = listing.lines().collect();

    // Building does not connect; only the planning half is used here.
    let reconciler = ReconcilerBuilder::new("offline")
        .username("offline")
        .kind(&args.kind)
        .build()?;

    println!("Query:");
    println!("{}", reconciler.query(&desired)?);
    println!("{}", "-".repeat(50));

    let plan = reconciler.plan(&desired, &lines)?;

    match plan.observed.fields() {
        None => println!("Observed: absent"),
        Some(fields) => {
            println!("Observed ({} fields):", fields.len());
            for (field, value) in fields.iter() {
                println!("  {:<32} {:?}", field, value);
            }
            for error in fields.parse_errors() {
                println!("  skipped: {}", error);
            }
        }
    }
    println!("{}", "-".repeat(50));

    println!("Action: {}", plan.action);
    for directive in plan.action.directives() {
        println!("  {}", directive);
    }

    if let Some(script) = &plan.script {
        println!("{}", "-".repeat(50));
        println!("{}", script);
    }

    Ok(())
}

struct Args {
    kind: String,
    listing: Option<PathBuf>,
    desired: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut kind = "tcp".to_string();
        let mut listing = None;
        let mut desired = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--kind" | "-K" => {
                    i += 1;
                    if i < args.len() {
                        kind = args[i].clone();
                    }
                }
                "--listing" | "-l" => {
                    i += 1;
                    if i < args.len() {
                        listing = Some(PathBuf::from(&args[i]));
                    }
                }
                "--desired" | "-d" => {
                    i += 1;
                    if i < args.len() {
                        desired = Some(PathBuf::from(&args[i]));
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
            kind,
            listing,
            desired,
        }
    }

    fn print_help() {
        println!(
            r#"tmsh-reconcile offline_diff example

USAGE:
    cargo run --example offline_diff -- [OPTIONS]

OPTIONS:
    -K, --kind <KIND>        Resource kind [default: tcp]
    -l, --listing <FILE>     Saved listing text
    -d, --desired <FILE>     JSON file with the desired state
    --help                   Print this help message
"#
        );
    }
}
