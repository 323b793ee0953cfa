//! Config commands - inspect the effective toolchain configuration

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use super::output::to_json;
use super::GlobalOpts;

#[derive(Parser, Debug)]
pub struct ConfigCmd {
    /// Only check the configuration, don't print it
    #[arg(long)]
    pub validate: bool,
}

impl ConfigCmd {
    pub fn execute(&self, opts: &GlobalOpts, json: bool) -> Result<()> {
        let config = opts.load_config()?;

        if self.validate {
            config.validate()?;
            if json {
                println!("{}", to_json(&serde_json::json!({ "valid": true }))?);
            } else {
                println!("Configuration is valid");
            }
            return Ok(());
        }

        if json {
            println!("{}", to_json(&config)?);
        } else {
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct CompilerCmd {
    /// Solidity source file whose pragmas select the compiler. Looked up under
    /// the project's sources directory when it doesn't exist as given.
    pub source: PathBuf,
}

impl CompilerCmd {
    pub fn execute(&self, opts: &GlobalOpts, json: bool) -> Result<()> {
        let config = opts.load_config()?;
        let source = config.paths.source_path(&self.source);
        let text = std::fs::read_to_string(&source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        let unit = sol_sandbox::sol_parser::parse_source(&text)
            .with_context(|| format!("Failed to parse {}", source.display()))?;

        let version = config.solidity.compiler_for(&unit)?;
        let settings = config.solidity.effective_settings(&version.to_string());

        if json {
            println!(
                "{}",
                to_json(&serde_json::json!({
                    "source": source.display().to_string(),
                    "version": version,
                    "settings": settings,
                }))?
            );
        } else {
            println!("{}", version);
        }
        Ok(())
    }
}
