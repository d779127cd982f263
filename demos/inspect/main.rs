//! # vservconf inspect
//!
//! A small CLI that loads a multi-server configuration file and shows what
//! each virtual server ends up with. It exists to demonstrate and manually
//! verify vservconf's resolution rules.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example vservconf_inspect -- server.ini
//! cargo run --example vservconf_inspect -- server.ini list --server 3
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature               | How to exercise it                                                   |
//! |-----------------------|----------------------------------------------------------------------|
//! | Global scope          | `cargo run --example vservconf_inspect -- server.ini`                |
//! | Port offset           | `cargo run --example vservconf_inspect -- server.ini get Port -s 3`  |
//! | Server override       | Add `[3]` with `Port=9999`, then repeat the command above            |
//! | Unset by empty value  | Add `WelcomeText=` under `[3]`, then `get WelcomeText -s 3`          |
//! | Global-only key       | `get LogPath` vs `list -s 2`                                         |
//! | JSON with comments    | Same commands against a `.json` file with `//` comments              |
//! | Legacy file           | Point it at a `murmur.ini`; run with `RUST_LOG=info`                 |
//! | `gen`                 | `cargo run --example vservconf_inspect -- - gen --format json`       |
//! | Machine output        | Add `--json` to any command                                          |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vservconf::{ConfigAction, ConfigArgs, ConfigSource, FileFormat, KeySchema, ops};

/// Inspect the effective configuration of each virtual server.
#[derive(Parser, Debug)]
#[command(name = "vservconf-inspect")]
struct Cli {
    /// Configuration file (.ini or .json). Use `-` with `gen`.
    config: PathBuf,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    args: ConfigArgs,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let schema = KeySchema::builtin();
    let action = cli.args.into_action();

    let source = match &action {
        ConfigAction::Gen { .. } => {
            ConfigSource::from_scopes(FileFormat::Ini, Default::default(), Default::default())
        }
        _ => ConfigSource::load(&cli.config)?,
    };

    if source.is_legacy() {
        tracing::warn!(
            path = %source.path().display(),
            notices = source.legacy_notices().len(),
            "loaded legacy configuration file"
        );
    }

    let result = ops::handle(&source, schema, &action)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{result}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vservconf=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error:\n{e}");
            ExitCode::FAILURE
        }
    }
}
