//! Run a filter over scraped items given as JSON lines

use std::{collections::BTreeMap, path::PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{CliError, load_schema};
use crate::{Registry, Value};

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// The SFL script to apply
    pub script: String,
    /// Spider schema declaring the components and variables
    pub schema: PathBuf,
    /// One JSON item per line
    pub input: Option<String>,
}

/// One scraped item: a component and the attribute values the spider
/// extracted for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub component: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// What a filter run kept and what the script set
#[derive(Debug, Default)]
pub struct FilterSummary {
    pub kept: Vec<Item>,
    pub dropped: usize,
    pub variables: BTreeMap<String, Value>,
}

/// Execute an sfl filter operation
pub fn execute_filter(options: &FilterOptions) -> Result<FilterSummary, CliError> {
    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let mut registry = load_schema(&options.schema, &options.script)?;
    registry.validate()?;

    filter_items(&mut registry, input)
}

/// Evaluate every line of `input` against `registry`. Blank lines are
/// skipped.
pub fn filter_items(registry: &mut Registry, input: &str) -> Result<FilterSummary, CliError> {
    let mut summary = FilterSummary::default();

    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let at_line = |source: CliError| CliError::Item {
            line: index + 1,
            source: Box::new(source),
        };

        let item: Item = serde_json::from_str(line).map_err(|e| at_line(e.into()))?;
        if apply_item(registry, &item).map_err(at_line)? {
            summary.kept.push(item);
        } else {
            debug!("Dropped the {} on line {}", item.component, index + 1);
            summary.dropped += 1;
        }
    }

    summary.variables = registry.decisions()?.variables.clone();
    info!(
        "Kept {} item(s), dropped {}",
        summary.kept.len(),
        summary.dropped
    );
    for (name, value) in &summary.variables {
        info!("@{} = {}", name, value);
    }

    Ok(summary)
}

fn apply_item(registry: &mut Registry, item: &Item) -> Result<bool, CliError> {
    registry.clear_attr_values();
    registry.set_attr_values(
        &item.component,
        item.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), Value::from(value.clone()))),
    )?;
    Ok(registry.should_scrape(&item.component)?)
}
