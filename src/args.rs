use std::path::Path;

use crate::config::{Config, TopSelector, default_tool_path};
use crate::error::FlowError;
use crate::pipeline::{ExecutionRange, Pipeline};

/// Result of parsing the pass options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config: Config,
    pub range: ExecutionRange,
    /// Tokens after the last recognized option, handed to the interpreter unchecked.
    pub tail: Vec<String>,
}

/// Parses `-top`, `-exe`, `-edif`, `-blif`, `-flatten` and `-run` left to right.
///
/// Parsing stops at the first token that is not one of those options. `bindir`
/// feeds the default `-exe` value.
pub fn parse<S: AsRef<str>>(
    tokens: &[S],
    pipeline: &Pipeline,
    bindir: Option<&Path>,
) -> Result<Invocation, FlowError> {
    let mut config = Config::new(default_tool_path(bindir));
    let mut range = ExecutionRange::all();

    let mut idx = 0;
    while idx < tokens.len() {
        let option = tokens[idx].as_ref();
        match option {
            "-top" => {
                let value = value_for(tokens, idx, option)?;
                config.top = TopSelector::Module(value.to_string());
                idx += 2;
            }
            "-exe" => {
                config.tool_path = value_for(tokens, idx, option)?.to_string();
                idx += 2;
            }
            "-edif" => {
                config.edif_path = Some(value_for(tokens, idx, option)?.to_string());
                idx += 2;
            }
            "-blif" => {
                config.blif_path = Some(value_for(tokens, idx, option)?.to_string());
                idx += 2;
            }
            "-run" => {
                range = ExecutionRange::parse(value_for(tokens, idx, option)?);
                idx += 2;
            }
            "-flatten" => {
                config.flatten = true;
                idx += 1;
            }
            _ => break,
        }
    }

    pipeline.span(&range)?;

    let tail = tokens[idx..]
        .iter()
        .map(|token| token.as_ref().to_string())
        .collect();

    Ok(Invocation {
        config,
        range,
        tail,
    })
}

fn value_for<'a, S: AsRef<str>>(
    tokens: &'a [S],
    idx: usize,
    option: &str,
) -> Result<&'a str, FlowError> {
    tokens
        .get(idx + 1)
        .map(AsRef::as_ref)
        .ok_or_else(|| FlowError::usage(format!("option {option} requires a value")))
}
