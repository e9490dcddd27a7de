pub mod args;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod flow;
pub mod interpreter;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod synth;
pub mod yosys;

use anyhow::Result;
use cli::{Cli, Commands};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Synth(args) => synth::synth(&args),
        Commands::Plan(args) => synth::plan(&args),
    }
}
