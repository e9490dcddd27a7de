use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::error::FlowError;
use crate::interpreter::Interpreter;
use crate::pipeline::quote_arg;

/// Passes the generated script is allowed to call.
pub const KNOWN_PASSES: &[&str] = &[
    "read_verilog",
    "hierarchy",
    "proc",
    "flatten",
    "opt_expr",
    "opt_clean",
    "check",
    "opt",
    "techmap",
    "abc",
    "select",
    "iopadmap",
    "splitnets",
    "write_edif",
    "write_blif",
];

/// Interpreter that records each command into a Yosys script.
///
/// The design is the set of HDL sources read at the top of the script. Nothing
/// runs until the script is handed to yosys with [`run_yosys_script`].
#[derive(Debug, Default)]
pub struct ScriptInterpreter {
    sources: Vec<PathBuf>,
    selection: Vec<String>,
    lines: Vec<String>,
    headers: Vec<String>,
}

impl ScriptInterpreter {
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    pub fn script(&self) -> String {
        let mut output = String::new();
        output.push_str("# generated by synthflow\n");
        for source in &self.sources {
            output.push_str(&format!(
                "read_verilog {}\n",
                quote_arg(&source.display().to_string())
            ));
        }
        for line in &self.lines {
            output.push_str(line);
            output.push('\n');
        }
        output
    }
}

impl Interpreter for ScriptInterpreter {
    fn execute(&mut self, command: &str) -> Result<()> {
        let Some(pass) = command.split_whitespace().next() else {
            bail!("empty command");
        };
        if !KNOWN_PASSES.contains(&pass) {
            bail!("no such command: {pass}");
        }

        self.lines.push(command.to_string());
        Ok(())
    }

    fn is_fully_selected(&self) -> bool {
        self.selection.iter().all(|pattern| pattern == "*")
    }

    fn extend_selection(&mut self, tokens: &[String]) -> Result<(), FlowError> {
        if let Some(option) = tokens.iter().find(|token| token.starts_with('-')) {
            return Err(FlowError::usage(format!("unknown option {option}")));
        }
        self.selection.extend(tokens.iter().cloned());
        Ok(())
    }

    fn push_log(&mut self, header: &str) {
        self.lines.push(format!("# {header}"));
        self.headers.push(header.to_string());
    }

    fn pop_log(&mut self) {
        if let Some(header) = self.headers.pop() {
            self.lines.push(format!("# done: {header}"));
        }
    }
}

pub fn resolve_yosys_bin(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = env::var_os("YOSYS_BIN") {
        return Ok(PathBuf::from(path));
    }

    which::which("yosys").context("yosys not found on PATH")
}

pub fn run_yosys_script(bin: &Path, script: &Path) -> Result<()> {
    info!(bin = %bin.display(), script = %script.display(), "running yosys");

    let output = Command::new(bin)
        .arg("-q")
        .arg("-s")
        .arg(script)
        .output()
        .with_context(|| format!("failed to spawn yosys at {}", bin.display()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !stdout.trim().is_empty() {
        debug!("yosys stdout:\n{}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        debug!("yosys stderr:\n{}", stderr.trim_end());
    }

    if !output.status.success() {
        let tail = tail_lines(&stderr, 20);
        bail!("yosys failed (status {}):\n{}", output.status, tail);
    }

    Ok(())
}

fn tail_lines(input: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = input.lines().collect();
    if lines.len() <= max_lines {
        return input.trim_end().to_string();
    }
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::LogScope;

    #[test]
    fn rejects_unknown_passes() {
        let mut interpreter = ScriptInterpreter::default();
        assert!(interpreter.execute("synth_ice40").is_err());
        assert!(interpreter.execute("   ").is_err());
        interpreter.execute("opt_clean").unwrap();
        let script = interpreter.script();
        let commands: Vec<&str> = script.lines().filter(|line| !line.starts_with('#')).collect();
        assert_eq!(commands, ["opt_clean"]);
    }

    #[test]
    fn selection_patterns_narrow_the_design() {
        let mut interpreter = ScriptInterpreter::default();
        assert!(interpreter.is_fully_selected());
        interpreter.extend_selection(&["*".to_string()]).unwrap();
        assert!(interpreter.is_fully_selected());
        interpreter.extend_selection(&["top/u0".to_string()]).unwrap();
        assert!(!interpreter.is_fully_selected());
    }

    #[test]
    fn hyphenated_tail_token_is_unknown_option() {
        let mut interpreter = ScriptInterpreter::default();
        let err = interpreter
            .extend_selection(&["top".to_string(), "-nope".to_string()])
            .unwrap_err();
        assert!(matches!(err, FlowError::Usage(message) if message.contains("-nope")));
        assert!(interpreter.is_fully_selected());
    }

    #[test]
    fn script_reads_sources_before_commands() {
        let mut interpreter =
            ScriptInterpreter::new(vec![PathBuf::from("rtl/top.v"), PathBuf::from("my dir/a.v")]);
        {
            let mut scope = LogScope::enter(&mut interpreter, "Executing TEST pass.");
            scope.execute("proc").unwrap();
        }
        interpreter.pop_log();

        let script = interpreter.script();
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines,
            [
                "# generated by synthflow",
                "read_verilog rtl/top.v",
                "read_verilog \"my dir/a.v\"",
                "# Executing TEST pass.",
                "proc",
                "# done: Executing TEST pass.",
            ]
        );
    }

    #[test]
    fn tail_lines_keeps_the_end() {
        let input = (1..=30).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let tail = tail_lines(&input, 3);
        assert_eq!(tail, "28\n29\n30");
    }
}
