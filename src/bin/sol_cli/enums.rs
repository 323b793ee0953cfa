//! Enum commands - recover enum member/index mappings from compiled contracts

use anyhow::Result;
use clap::Parser;

use super::output::{format_enum, format_enum_list, to_json};
use super::GlobalOpts;

#[derive(Parser, Debug)]
pub struct EnumCmd {
    /// Contract name or fully qualified name ("contracts/Vault.sol:Vault")
    pub contract: String,

    /// Enum declared in the contract's source file
    #[arg(value_name = "ENUM")]
    pub enum_name: String,
}

impl EnumCmd {
    pub async fn execute(&self, opts: &GlobalOpts, json: bool) -> Result<()> {
        let runtime = opts.runtime()?;
        let mapping = runtime.get_enum(&self.contract, &self.enum_name).await?;

        if json {
            println!("{}", to_json(&mapping)?);
        } else {
            print!("{}", format_enum(&self.enum_name, &mapping));
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct EnumsCmd {
    /// Contract name or fully qualified name
    pub contract: String,
}

impl EnumsCmd {
    pub async fn execute(&self, opts: &GlobalOpts, json: bool) -> Result<()> {
        let runtime = opts.runtime()?;
        let enums = runtime.declared_enums(&self.contract).await?;

        if json {
            println!("{}", to_json(&enums)?);
        } else {
            print!("{}", format_enum_list(&self.contract, &enums));
        }
        Ok(())
    }
}
