//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml::Value;
use thiserror::Error;

use crate::config::model::Config;
use crate::config::schema::RawConfig;
use crate::config::validation::{validate_config, ValidationError};

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\w+)\}").expect("valid placeholder pattern"));

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<ValidationError>),
}

fn join_violations(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load, substitute and validate configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration text, resolving `${VAR}` placeholders from the
/// process environment.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    parse_config_with(content, |name| std::env::var(name).ok())
}

/// Like [`parse_config`] with an explicit variable lookup.
pub fn parse_config_with<F>(content: &str, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut document: Value = serde_yaml::from_str(content)?;
    // An empty file decodes to null; let validation report what is missing.
    if document.is_null() {
        document = Value::Mapping(Default::default());
    }
    substitute_env(&mut document, &lookup);

    let raw: RawConfig = serde_yaml::from_value(document)?;
    validate_config(&raw).map_err(ConfigError::Validation)
}

/// Replace `${NAME}` in every string of the tree. Unknown names are left as is.
fn substitute_env<F>(value: &mut Value, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(s) => {
            if ENV_PLACEHOLDER.is_match(s) {
                let replaced = ENV_PLACEHOLDER.replace_all(s, |caps: &Captures<'_>| {
                    lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
                });
                *s = replaced.into_owned();
            }
        }
        Value::Sequence(items) => items.iter_mut().for_each(|item| substitute_env(item, lookup)),
        Value::Mapping(map) => map.iter_mut().for_each(|(_, item)| substitute_env(item, lookup)),
        Value::Tagged(tagged) => substitute_env(&mut tagged.value, lookup),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
