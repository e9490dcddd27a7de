use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::args::parse;
use crate::cli::{PlanArgs, SynthArgs};
use crate::error::FlowError;
use crate::executor;
use crate::flow;
use crate::interpreter::Interpreter;
use crate::report::{listing, summarize, write_report};
use crate::sources::collect_sources;
use crate::yosys::{ScriptInterpreter, resolve_yosys_bin, run_yosys_script};

pub fn synth(args: &SynthArgs) -> Result<()> {
    let sources = collect_sources(&args.inputs, args.sources.as_deref())?;

    let yosys_bin = if args.emit_only {
        optional_yosys_bin(args.yosys_bin.as_deref())
    } else {
        Some(resolve_yosys_bin(args.yosys_bin.as_deref())?)
    };
    let bindir = yosys_bin.as_deref().and_then(Path::parent);

    let pipeline = flow::quicklogic();
    let invocation = parse(&args.pass_args, &pipeline, bindir)?;

    let mut interpreter = ScriptInterpreter::new(sources);
    interpreter.extend_selection(&invocation.tail)?;

    let report = executor::run(
        &pipeline,
        &invocation.range,
        &invocation.config,
        &mut interpreter,
        false,
    )?;

    write_script(&args.script_out, &interpreter.script())?;

    match yosys_bin.as_deref() {
        Some(bin) if !args.emit_only => {
            run_yosys_script(bin, &args.script_out)?;
        }
        _ => info!(script = %args.script_out.display(), "script written, yosys not invoked"),
    }

    if let Some(path) = args.report.as_deref() {
        write_report(path, &report)?;
    }

    println!("{}", summarize(&report));

    Ok(())
}

pub fn plan(args: &PlanArgs) -> Result<()> {
    let yosys_bin = optional_yosys_bin(args.yosys_bin.as_deref());
    let bindir = yosys_bin.as_deref().and_then(Path::parent);

    let pipeline = flow::quicklogic();
    let invocation = parse(&args.pass_args, &pipeline, bindir)?;
    if let Some(option) = invocation.tail.iter().find(|token| token.starts_with('-')) {
        return Err(FlowError::usage(format!("unknown option {option}")).into());
    }
    if !invocation.tail.is_empty() {
        warn!(tail = ?invocation.tail, "selection arguments are ignored by plan");
    }

    let report = executor::plan(&pipeline, &invocation.range, &invocation.config)?;

    if let Some(path) = args.report.as_deref() {
        write_report(path, &report)?;
    }

    println!("{}", listing(&report));

    Ok(())
}

fn optional_yosys_bin(override_path: Option<&Path>) -> Option<PathBuf> {
    resolve_yosys_bin(override_path).ok()
}

fn write_script(path: &Path, script: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, script).with_context(|| format!("failed to write {}", path.display()))
}
