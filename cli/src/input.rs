//! Analysis input assembly from the command line

use advisor_domain::AnalysisInput;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Read the optional JSON input file, then apply `--set` pairs over it.
pub fn load_input(file: Option<&Path>, overrides: &[(String, Value)]) -> Result<AnalysisInput> {
    let mut input = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("Input file {} is not valid JSON", path.display()))?;
            AnalysisInput::from_value(value)
                .with_context(|| format!("Invalid input in {}", path.display()))?
        }
        None => AnalysisInput::new(),
    };

    for (key, value) in overrides {
        input.insert(key.clone(), value.clone());
    }
    Ok(input)
}
