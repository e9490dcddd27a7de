use tracing::{debug, info, info_span};

use crate::config::Config;
use crate::error::FlowError;
use crate::interpreter::{Interpreter, LogScope};
use crate::pipeline::{ExecutionRange, Pipeline};
use crate::report::{Outcome, RunReport, StageReport, StepRecord};

/// Runs the stages selected by `range` against the interpreter's workload.
///
/// With `dry_run` set nothing is dispatched and the workload is not consulted;
/// the report then lists every step, including guarded ones that are off.
/// Otherwise the first failing step aborts the run. Steps already applied are
/// not undone.
pub fn run<I: Interpreter + ?Sized>(
    pipeline: &Pipeline,
    range: &ExecutionRange,
    config: &Config,
    interpreter: &mut I,
    dry_run: bool,
) -> Result<RunReport, FlowError> {
    if dry_run {
        return plan(pipeline, range, config);
    }

    let stages = pipeline.select(range)?;
    if !interpreter.is_fully_selected() {
        return Err(FlowError::Precondition(format!(
            "{} only operates on fully selected designs",
            pipeline.name()
        )));
    }

    let _span = info_span!("pipeline", pass = pipeline.name()).entered();
    let header = format!("Executing {} pass.", pipeline.name().to_uppercase());
    let mut scope = LogScope::enter(interpreter, &header);
    let mut report = RunReport::new(pipeline.name(), config, range, false);

    for stage in stages {
        info!(stage = stage.label, "entering stage");
        let mut stage_report = StageReport::new(stage.label);

        for step in &stage.steps {
            let command = step.render(config);
            if !step.is_enabled(config) {
                debug!(stage = stage.label, %command, "guard is off, skipping");
                stage_report.steps.push(StepRecord {
                    command,
                    outcome: Outcome::Skipped,
                    note: step.doc().map(str::to_string),
                });
                continue;
            }

            debug!(stage = stage.label, %command, "dispatching");
            scope
                .execute(&command)
                .map_err(|err| FlowError::step(stage.label, &command, &err))?;
            stage_report.steps.push(StepRecord {
                command,
                outcome: Outcome::Executed,
                note: None,
            });
        }

        report.stages.push(stage_report);
    }

    Ok(report)
}

/// Lists the selected stages without touching any workload.
pub fn plan(
    pipeline: &Pipeline,
    range: &ExecutionRange,
    config: &Config,
) -> Result<RunReport, FlowError> {
    let stages = pipeline.select(range)?;
    let mut report = RunReport::new(pipeline.name(), config, range, true);

    for stage in stages {
        let mut stage_report = StageReport::new(stage.label);
        for step in &stage.steps {
            let (outcome, note) = if step.is_enabled(config) {
                (Outcome::Planned, None)
            } else {
                (Outcome::Documented, step.doc().map(str::to_string))
            };
            stage_report.steps.push(StepRecord {
                command: step.render(config),
                outcome,
                note,
            });
        }
        report.stages.push(stage_report);
    }

    Ok(report)
}
