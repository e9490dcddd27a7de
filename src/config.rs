use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Logic optimizer path baked in at build time, if any.
pub const ABC_EXTERNAL: Option<&str> = option_env!("SYNTHFLOW_ABC_EXTERNAL");

pub const ABC_TOOL_NAME: &str = "yosys-abc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopSelector {
    AutoDetect,
    Module(String),
}

impl fmt::Display for TopSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopSelector::AutoDetect => f.write_str("-auto-top"),
            TopSelector::Module(name) => write!(f, "-top {name}"),
        }
    }
}

/// Options for one pipeline run. Not mutated once parsing finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub top: TopSelector,
    pub edif_path: Option<String>,
    pub blif_path: Option<String>,
    pub tool_path: String,
    pub flatten: bool,
}

impl Config {
    pub fn new(tool_path: impl Into<String>) -> Self {
        Self {
            top: TopSelector::AutoDetect,
            edif_path: None,
            blif_path: None,
            tool_path: tool_path.into(),
            flatten: false,
        }
    }
}

/// Resolves the logic optimizer path used when `-exe` is not given.
///
/// `bindir` is the directory the host engine was installed into; it is
/// ignored when a build-time override exists.
pub fn default_tool_path(bindir: Option<&Path>) -> String {
    resolve_tool_path(ABC_EXTERNAL, bindir)
}

fn resolve_tool_path(external: Option<&str>, bindir: Option<&Path>) -> String {
    if let Some(path) = external.filter(|path| !path.is_empty()) {
        return path.to_string();
    }

    match bindir {
        Some(dir) => dir.join(ABC_TOOL_NAME).display().to_string(),
        None => ABC_TOOL_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn build_time_override_wins() {
        let dir = PathBuf::from("/opt/yosys/bin");
        assert_eq!(
            resolve_tool_path(Some("/usr/local/bin/abc"), Some(dir.as_path())),
            "/usr/local/bin/abc"
        );
    }

    #[test]
    fn joins_bindir_with_tool_name() {
        let dir = PathBuf::from("/opt/yosys/bin");
        assert_eq!(
            resolve_tool_path(None, Some(dir.as_path())),
            dir.join("yosys-abc").display().to_string()
        );
    }

    #[test]
    fn falls_back_to_bare_tool_name() {
        assert_eq!(resolve_tool_path(Some(""), None), "yosys-abc");
    }

    #[test]
    fn top_selector_renders_hierarchy_flag() {
        assert_eq!(TopSelector::AutoDetect.to_string(), "-auto-top");
        assert_eq!(TopSelector::Module("cpu".into()).to_string(), "-top cpu");
    }
}
