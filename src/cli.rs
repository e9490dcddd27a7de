use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "synthflow")]
#[command(about = "Run the QuickLogic synthesis flow through Yosys", long_about = None)]
pub struct Cli {
    /// Log every dispatched command.
    #[arg(long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the synthesis script and run it.
    Synth(SynthArgs),
    /// List the flow's stages and commands without running anything.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
pub struct SynthArgs {
    /// HDL source file (repeatable).
    #[arg(long = "input")]
    pub inputs: Vec<PathBuf>,
    /// Directory searched recursively for .v/.sv sources.
    #[arg(long)]
    pub sources: Option<PathBuf>,
    /// Path to the yosys binary.
    #[arg(long)]
    pub yosys_bin: Option<PathBuf>,
    /// Where the generated yosys script is written.
    #[arg(long, default_value = "synth_quicklogic.ys")]
    pub script_out: PathBuf,
    /// Write a JSON run report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Write the script but do not invoke yosys.
    #[arg(long)]
    pub emit_only: bool,
    /// Pass options (-top, -exe, -edif, -blif, -flatten, -run from:to) and selection.
    /// A bare `-run <stage>` runs only that stage.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub pass_args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the yosys binary, used for the default -exe value.
    #[arg(long)]
    pub yosys_bin: Option<PathBuf>,
    /// Write the listing as a JSON report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Pass options (-top, -exe, -edif, -blif, -flatten, -run).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub pass_args: Vec<String>,
}
