#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use synthflow::error::FlowError;
use synthflow::interpreter::Interpreter;

/// Interpreter double that records dispatched commands.
#[derive(Debug, Default)]
pub struct RecordingInterpreter {
    pub commands: Vec<String>,
    pub selection: Vec<String>,
    pub fail_on: Option<String>,
    pub pushes: usize,
    pub pops: usize,
}

impl RecordingInterpreter {
    pub fn failing_on(prefix: &str) -> Self {
        Self {
            fail_on: Some(prefix.to_string()),
            ..Self::default()
        }
    }

    pub fn partially_selected() -> Self {
        Self {
            selection: vec!["top/u0".to_string()],
            ..Self::default()
        }
    }
}

impl Interpreter for RecordingInterpreter {
    fn execute(&mut self, command: &str) -> Result<()> {
        if let Some(prefix) = &self.fail_on
            && command.starts_with(prefix.as_str())
        {
            bail!("simulated failure");
        }
        self.commands.push(command.to_string());
        Ok(())
    }

    fn is_fully_selected(&self) -> bool {
        self.selection.is_empty()
    }

    fn extend_selection(&mut self, tokens: &[String]) -> Result<(), FlowError> {
        self.selection.extend(tokens.iter().cloned());
        Ok(())
    }

    fn push_log(&mut self, _header: &str) {
        self.pushes += 1;
    }

    fn pop_log(&mut self) {
        self.pops += 1;
    }
}

pub fn write_design(dir: &Path, rel: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(
        &path,
        "module top(input clk, input d, output reg q);\n  always @(posedge clk) q <= d;\nendmodule\n",
    )
    .unwrap();
    path
}

/// Stand-in for yosys: touches every write_edif/write_blif target and fails
/// on the first line starting with `$FAKE_YOSYS_FAIL_ON`.
#[cfg(unix)]
pub fn create_fake_yosys(dir: &Path) -> PathBuf {
    let path = dir.join("yosys");
    let contents = r##"#!/usr/bin/env bash
set -euo pipefail
script=""
while [[ $# -gt 0 ]]; do
  case "$1" in
    -s)
      script="$2"
      shift 2
      ;;
    *)
      shift
      ;;
  esac
done
[[ -n "$script" ]] || { echo "missing -s" >&2; exit 1; }
while IFS= read -r line; do
  if [[ -n "${FAKE_YOSYS_FAIL_ON:-}" && "$line" == "$FAKE_YOSYS_FAIL_ON"* ]]; then
    echo "ERROR: command failed: $line" >&2
    exit 1
  fi
  case "$line" in
    write_edif*|write_blif*)
      : > "${line##* }"
      ;;
  esac
done < "$script"
"##;
    fs::write(&path, contents).unwrap();
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }
    path
}
