//! Binding of positional words and `--query` onto named parameters

use std::collections::BTreeMap;

use tracing::warn;

use crate::api::types::Filters;
use crate::cli::registry::CommandSpec;

/// Bind positional words (index 0 is the command name) onto the command's
/// declared parameters. Slots with no word stay absent.
pub fn map_parameters(spec: &CommandSpec, positional: &[String]) -> BTreeMap<String, String> {
    let mut words = positional.to_vec();

    if spec.merge_trailing_params {
        let declared = spec.required_params.len() + spec.optional_params.len();
        if words.len() > declared {
            let merged = words.split_off(declared).join(" ");
            words.push(merged);
        }
    }

    spec.params()
        .zip(words.into_iter().skip(1))
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Parse `key:value,key:value` into filters. Values may contain `:`.
pub fn parse_query(raw: &str) -> Filters {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.split_once(':') {
            Some((key, value)) => Some((key.trim().to_string(), value.trim().to_string())),
            None => {
                warn!("Ignoring query filter without a value: {}", entry);
                None
            }
        })
        .collect()
}

/// Names of required parameters that did not get a word
pub fn missing_required(spec: &CommandSpec, bound: &BTreeMap<String, String>) -> Vec<String> {
    spec.required_params
        .iter()
        .filter(|name| !bound.contains_key(**name))
        .map(|name| name.to_string())
        .collect()
}
