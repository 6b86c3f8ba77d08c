//! Common types used across CLI modules

use clap::ValueEnum;

/// Which kind of job a command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Build,
    Release,
}

/// Parse a `key=value` template parameter
pub fn parse_param(input: &str) -> Result<(String, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", input))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", input));
    }

    Ok((key.to_string(), value.to_string()))
}
