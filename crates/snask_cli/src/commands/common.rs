use std::path::Path;

use anyhow::{Context, Result};
use snask_core::Value;

pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn parse_input(path: &Path) -> Result<Value> {
    let text = read_input(path)?;
    snask_core::parse(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}
