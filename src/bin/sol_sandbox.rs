//! sol-sandbox: toolchain configuration and artifact inspection for local
//! Solidity development
//!
//! ## Commands
//!
//! - **enum**: print the member ↔ index mapping of an enum, read from the
//!   source file a compiled contract was built from
//! - **enums**: list every enum declared in a contract's source file
//! - **config**: print or validate the effective configuration
//! - **compiler**: show which configured compiler a source file selects
//!
//! ## Example Usage
//!
//! ```bash
//! # Resolve an enum
//! sol-sandbox enum MyContract Status
//!
//! # Disambiguate with a fully qualified name, JSON output
//! sol-sandbox --json enum contracts/MyContract.sol:MyContract Status
//!
//! # Check the configuration
//! sol-sandbox --config ./sol-sandbox.yaml config --validate
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod sol_cli;

use sol_cli::{
    config::{CompilerCmd, ConfigCmd},
    enums::{EnumCmd, EnumsCmd},
    output::format_error,
    GlobalOpts,
};

#[derive(Parser)]
#[command(
    name = "sol-sandbox",
    author,
    version,
    about = "Local Solidity toolchain configuration and artifact inspection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: nearest sol-sandbox.yaml/.yml/.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Artifacts directory (overrides paths.artifacts)
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    /// Network to use (overrides defaultNetwork)
    #[arg(long, global = true)]
    network: Option<String>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the member/index mapping of an enum
    Enum(EnumCmd),

    /// List the enums declared in a contract's source file
    Enums(EnumsCmd),

    /// Print or validate the effective configuration
    Config(ConfigCmd),

    /// Show the compiler selected by a source file's pragmas
    Compiler(CompilerCmd),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let Cli {
        command,
        config,
        artifacts,
        network,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let opts = GlobalOpts {
        config,
        artifacts,
        network,
    };

    let result: Result<()> = match command {
        Commands::Enum(cmd) => cmd.execute(&opts, json).await,
        Commands::Enums(cmd) => cmd.execute(&opts, json).await,
        Commands::Config(cmd) => cmd.execute(&opts, json),
        Commands::Compiler(cmd) => cmd.execute(&opts, json),
    };

    if let Err(err) = result {
        eprint!("{}", format_error(&err, json));
        if json {
            eprintln!();
        }
        std::process::exit(1);
    }
}
