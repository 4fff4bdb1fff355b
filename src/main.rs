// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

mod builder;
mod catalog;
mod cmd;
mod config;
mod error;
mod json_schema;
mod model;
mod progress;
mod render;
mod resolve;

use clap::Parser;
use cmd::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cmd::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
