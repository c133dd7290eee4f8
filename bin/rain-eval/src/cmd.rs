use clap::{Parser, Subcommand};

use crate::common::{EvalCliError, LogArgs};

/// Run and inspect rain expressions.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Logging configuration
    #[command(flatten)]
    pub log: LogArgs,

    /// The subcommand
    #[command(subcommand)]
    pub cmd: MainCmd,
}

/// Main command enumeration for the rain-eval CLI tool
#[derive(Subcommand, Debug)]
#[command(infer_subcommands = true)]
pub enum MainCmd {
    /// Evaluate one entrypoint of an expression
    Run(crate::run::Cmd),
    /// Print the decoded instructions of an expression
    Disasm(crate::disasm::Cmd),
}

/// Error types for the main command system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A subcommand failed
    #[error(transparent)]
    Eval(#[from] EvalCliError),
}

impl MainCmd {
    /// Execute the main command
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Run(cmd) => cmd.run()?,
            Self::Disasm(cmd) => cmd.run()?,
        }
        Ok(())
    }
}
