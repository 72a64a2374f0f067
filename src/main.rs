mod cli;
mod config;
mod estimate_cmd;
mod input;
mod logging;
mod report;
mod spatial_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Estimate(args) => estimate_cmd::run(args),
        Command::Spatial(args) => spatial_cmd::run(args),
    }
}
