//! Command-line tool for running and disassembling rain expressions.

use clap::Parser;
use rain_eval::{Cli, Error};

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    cli.log.init()?;
    cli.cmd.run().inspect_err(|e| eprintln!("{e}"))
}
