use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::config::Config;
use crate::pipeline::ExecutionRange;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Dispatched to the interpreter.
    Executed,
    /// Guard was false during a real run.
    Skipped,
    /// Listed by a plan; would be dispatched.
    Planned,
    /// Listed by a plan although its guard is false.
    Documented,
}

#[derive(Debug, Serialize, Clone)]
pub struct StepRecord {
    pub command: String,
    pub outcome: Outcome,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct StageReport {
    pub label: String,
    pub steps: Vec<StepRecord>,
}

impl StageReport {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct RunReport {
    pub version: u8,
    pub generated_at: String,
    pub pass: String,
    pub dry_run: bool,
    pub config: Config,
    pub range: ExecutionRange,
    pub stages: Vec<StageReport>,
}

impl RunReport {
    pub fn new(pass: &str, config: &Config, range: &ExecutionRange, dry_run: bool) -> Self {
        Self {
            version: 1,
            generated_at: now_rfc3339(),
            pass: pass.to_string(),
            dry_run,
            config: config.clone(),
            range: range.clone(),
            stages: Vec::new(),
        }
    }

    pub fn commands(&self, outcome: Outcome) -> impl Iterator<Item = &str> + '_ {
        self.stages
            .iter()
            .flat_map(|stage| stage.steps.iter())
            .filter(move |step| step.outcome == outcome)
            .map(|step| step.command.as_str())
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.commands(outcome).count()
    }
}

/// Renders the stage/command listing shown by `plan`.
pub fn listing(report: &RunReport) -> String {
    let mut output = String::new();
    for stage in &report.stages {
        output.push_str(&format!("    {}:\n", stage.label));
        for step in &stage.steps {
            match step.note.as_deref() {
                Some(note) if step.outcome == Outcome::Documented => {
                    output.push_str(&format!("        {}    ({})\n", step.command, note));
                }
                _ => output.push_str(&format!("        {}\n", step.command)),
            }
        }
        output.push('\n');
    }
    output.trim_end().to_string()
}

pub fn summarize(report: &RunReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("Pass: {}\n", report.pass));
    output.push_str(&format!("Top: {}\n", report.config.top));
    output.push_str("Stages:\n");
    if report.stages.is_empty() {
        output.push_str("  (none)\n");
    }
    for stage in &report.stages {
        let executed = stage
            .steps
            .iter()
            .filter(|step| step.outcome == Outcome::Executed)
            .count();
        output.push_str(&format!(
            "  - {} ({} of {} steps)\n",
            stage.label,
            executed,
            stage.steps.len()
        ));
    }
    output.push_str("Outputs:\n");
    let outputs: Vec<&String> = [&report.config.edif_path, &report.config.blif_path]
        .into_iter()
        .flatten()
        .collect();
    if outputs.is_empty() {
        output.push_str("  (none)\n");
    }
    for path in outputs {
        output.push_str(&format!("  - {path}\n"));
    }

    output.trim_end().to_string()
}

pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_vec_pretty(report)?;
    let mut file =
        fs::File::create(path).with_context(|| format!("failed to write {}", path.display()))?;
    file.write_all(&json)?;
    file.write_all(b"\n")?;

    Ok(())
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}
