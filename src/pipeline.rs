use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;

use crate::config::{Config, TopSelector};
use crate::error::FlowError;

/// Stand-in for output paths that are not configured, used by plan listings.
pub const UNSET_PATH: &str = "<file>";

pub type Guard = fn(&Config) -> bool;

/// One command of a stage.
///
/// Templates may reference `{top}`, `{exe}`, `{edif}` and `{blif}`; they are
/// filled from [`Config`] when the step is rendered.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Unconditional {
        template: &'static str,
    },
    Guarded {
        template: &'static str,
        guard: Guard,
        doc: &'static str,
    },
}

impl Step {
    pub const fn run(template: &'static str) -> Self {
        Step::Unconditional { template }
    }

    pub const fn when(template: &'static str, guard: Guard, doc: &'static str) -> Self {
        Step::Guarded {
            template,
            guard,
            doc,
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Step::Unconditional { template } | Step::Guarded { template, .. } => template,
        }
    }

    pub fn is_enabled(&self, config: &Config) -> bool {
        match self {
            Step::Unconditional { .. } => true,
            Step::Guarded { guard, .. } => guard(config),
        }
    }

    pub fn doc(&self) -> Option<&'static str> {
        match self {
            Step::Unconditional { .. } => None,
            Step::Guarded { doc, .. } => Some(doc),
        }
    }

    pub fn render(&self, config: &Config) -> String {
        render_template(self.template(), config)
    }
}

/// Fills a step template. Substituted values containing whitespace are quoted.
pub fn render_template(template: &str, config: &Config) -> String {
    let top = match &config.top {
        TopSelector::AutoDetect => config.top.to_string(),
        TopSelector::Module(name) => format!("-top {}", quote_arg(name)),
    };
    let edif = config.edif_path.as_deref().map_or(UNSET_PATH.to_string(), quote_arg);
    let blif = config.blif_path.as_deref().map_or(UNSET_PATH.to_string(), quote_arg);
    template
        .replace("{top}", &top)
        .replace("{exe}", &quote_arg(&config.tool_path))
        .replace("{edif}", &edif)
        .replace("{blif}", &blif)
}

/// Wraps an argument in double quotes when it contains whitespace.
pub fn quote_arg(value: &str) -> String {
    if value.contains(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub label: &'static str,
    pub steps: Vec<Step>,
}

impl Stage {
    pub fn new(label: &'static str, steps: Vec<Step>) -> Self {
        Self { label, steps }
    }
}

/// Inclusive stage range. Both ends unset selects every stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ExecutionRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Parses `from:to`, `from:`, `:to`, or a bare `label` naming one stage.
    pub fn parse(value: &str) -> Self {
        let (from, to) = value.split_once(':').unwrap_or((value, value));
        let label = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Self {
            from: label(from),
            to: label(to),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    name: &'static str,
    stages: Vec<Stage>,
    index: BTreeMap<&'static str, usize>,
}

impl Pipeline {
    pub fn new(name: &'static str, stages: Vec<Stage>) -> Self {
        let mut index = BTreeMap::new();
        for (position, stage) in stages.iter().enumerate() {
            let previous = index.insert(stage.label, position);
            assert!(previous.is_none(), "duplicate stage label {}", stage.label);
        }
        Self {
            name,
            stages,
            index,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.label)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn span(&self, range: &ExecutionRange) -> Result<Range<usize>, FlowError> {
        let start = match range.from.as_deref() {
            Some(label) => self.lookup(label)?,
            None => 0,
        };
        let end = match range.to.as_deref() {
            Some(label) => self.lookup(label)? + 1,
            None => self.stages.len(),
        };
        if start >= end {
            return Err(FlowError::usage(format!(
                "stage range {}:{} is empty",
                range.from.as_deref().unwrap_or(""),
                range.to.as_deref().unwrap_or("")
            )));
        }
        Ok(start..end)
    }

    pub fn select(&self, range: &ExecutionRange) -> Result<&[Stage], FlowError> {
        let span = self.span(range)?;
        Ok(&self.stages[span])
    }

    fn lookup(&self, label: &str) -> Result<usize, FlowError> {
        self.position(label).ok_or_else(|| {
            let known: Vec<&str> = self.labels().collect();
            FlowError::usage(format!(
                "unknown stage label '{label}' (expected one of: {})",
                known.join(", ")
            ))
        })
    }
}
