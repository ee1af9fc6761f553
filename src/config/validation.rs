//! Configuration validation.
//!
//! # Responsibilities
//! - Check that every required field is present
//! - Check label values against the exposition-safe charset
//! - Parse account identifiers, enforcing EIP-55 casing when mixed-case
//! - Check referential integrity (addresses reference declared networks)
//! - Validate value ranges for scrape settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RawConfig → Result<Config, Vec<ValidationError>>
//! - Runs before the listener is bound

use std::collections::HashMap;

use alloy::primitives::Address;
use thiserror::Error;
use url::Url;

use crate::config::model::{Config, Network, WatchedAddress};
use crate::config::schema::{RawAddress, RawConfig, RawNetwork, ScrapeSettings};

/// A single rule violation, located by its field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {rule}")]
pub struct ValidationError {
    /// Field path, e.g. `addresses[2].address`.
    pub path: String,
    /// Human-readable rule description.
    pub rule: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rule: rule.into(),
        }
    }
}

const HEX_DIGITS: usize = 40;
const RPC_SCHEMES: [&str; 2] = ["http", "https"];

/// Upper bound for `scrape.rpc_timeout_secs` and `scrape.deadline_secs`.
pub const MAX_SCRAPE_SECS: u64 = 3600;

/// Validate a decoded document into a [`Config`].
///
/// Either every rule holds and a complete `Config` is returned, or every
/// violation found is returned together.
pub fn validate_config(raw: &RawConfig) -> Result<Config, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let networks = validate_networks(raw.networks.as_deref(), &mut errors);

    // Every declared name counts as declared, even if the name itself failed a
    // rule, so a bad key is not reported a second time from each address.
    let declared: Vec<&str> = raw
        .networks
        .iter()
        .flatten()
        .filter_map(|n| n.name.as_deref())
        .collect();
    let addresses = validate_addresses(raw.addresses.as_deref(), &declared, &mut errors);

    validate_scrape(&raw.scrape, &mut errors);

    if let Some(token) = &raw.static_bearer_token {
        if token.trim().is_empty() {
            errors.push(ValidationError::new("static_bearer_token", "must not be empty when set"));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Config {
        networks,
        addresses,
        scrape: raw.scrape,
        static_bearer_token: raw.static_bearer_token.clone(),
    })
}

fn validate_networks(
    raw: Option<&[RawNetwork]>,
    errors: &mut Vec<ValidationError>,
) -> Vec<Network> {
    let Some(raw) = raw else {
        errors.push(ValidationError::new("networks", "is required"));
        return Vec::new();
    };
    if raw.is_empty() {
        errors.push(ValidationError::new("networks", "must declare at least one network"));
    }

    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut networks = Vec::with_capacity(raw.len());

    for (i, entry) in raw.iter().enumerate() {
        let name = required(entry.name.as_deref(), format!("networks[{i}].name"), errors)
            .filter(|name| check_label(name, format!("networks[{i}].name"), errors));

        if let Some(name) = name {
            if let Some(first) = first_seen.get(name) {
                errors.push(ValidationError::new(
                    format!("networks[{i}].name"),
                    format!("duplicate network key '{name}' (first declared at networks[{first}])"),
                ));
            } else {
                first_seen.insert(name, i);
            }
        }

        let endpoint_path = format!("networks[{i}].rpc-endpoint");
        let endpoint = required(entry.rpc_endpoint.as_deref(), endpoint_path.clone(), errors)
            .and_then(|value| match parse_endpoint(value) {
                Ok(url) => Some(url),
                Err(rule) => {
                    errors.push(ValidationError::new(endpoint_path.clone(), rule));
                    None
                }
            });

        if let (Some(name), Some(endpoint)) = (name, endpoint) {
            networks.push(Network {
                key: name.to_string(),
                endpoint,
            });
        }
    }

    networks
}

fn validate_addresses(
    raw: Option<&[RawAddress]>,
    declared: &[&str],
    errors: &mut Vec<ValidationError>,
) -> Vec<WatchedAddress> {
    let Some(raw) = raw else {
        errors.push(ValidationError::new("addresses", "is required"));
        return Vec::new();
    };
    if raw.is_empty() {
        errors.push(ValidationError::new("addresses", "must list at least one address"));
    }

    let mut addresses = Vec::with_capacity(raw.len());

    for (i, entry) in raw.iter().enumerate() {
        let parsed = required(entry.address.as_deref(), format!("addresses[{i}].address"), errors)
            .and_then(|value| match parse_account(value) {
                Ok(address) => Some((address, value)),
                Err(rule) => {
                    errors.push(ValidationError::new(
                        format!("addresses[{i}].address"),
                        format!("{rule} ({value})"),
                    ));
                    None
                }
            });

        let display_name = required(entry.name.as_deref(), format!("addresses[{i}].name"), errors)
            .filter(|name| check_label(name, format!("addresses[{i}].name"), errors));

        let network_path = format!("addresses[{i}].network");
        let network_key = required(entry.network.as_deref(), network_path.clone(), errors)
            .filter(|key| {
                let known = declared.contains(key);
                if !known {
                    errors.push(ValidationError::new(
                        network_path.clone(),
                        format!("references undeclared network '{key}'"),
                    ));
                }
                known
            });

        if let (Some((address, configured)), Some(display_name), Some(network_key)) =
            (parsed, display_name, network_key)
        {
            addresses.push(WatchedAddress {
                address,
                configured: configured.to_string(),
                display_name: display_name.to_string(),
                network_key: network_key.to_string(),
            });
        }
    }

    addresses
}

fn validate_scrape(settings: &ScrapeSettings, errors: &mut Vec<ValidationError>) {
    let durations = [
        ("scrape.rpc_timeout_secs", settings.rpc_timeout_secs),
        ("scrape.deadline_secs", settings.deadline_secs),
    ];
    for (path, secs) in durations {
        if secs == 0 {
            errors.push(ValidationError::new(path, "must be greater than 0"));
        } else if secs > MAX_SCRAPE_SECS {
            errors.push(ValidationError::new(path, format!("must be at most {MAX_SCRAPE_SECS}")));
        }
    }
    if settings.max_concurrency == Some(0) {
        errors.push(ValidationError::new(
            "scrape.max_concurrency",
            "must be greater than 0 when set",
        ));
    }
}

fn required<'a>(
    value: Option<&'a str>,
    path: String,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a str> {
    if value.is_none() {
        errors.push(ValidationError::new(path, "is required"));
    }
    value
}

/// Records a violation and returns false if `value` is not a safe label value.
fn check_label(value: &str, path: String, errors: &mut Vec<ValidationError>) -> bool {
    match label_violation(value) {
        Some(rule) => {
            errors.push(ValidationError::new(path, rule));
            false
        }
        None => true,
    }
}

/// Label values are restricted to `[A-Za-z0-9_.-]+`.
pub fn label_violation(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("must not be empty".to_string());
    }
    value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        .map(|c| format!("contains {c:?}, only letters, digits, '_', '-' and '.' are allowed"))
}

/// Parse a `0x`-prefixed 20-byte account identifier.
///
/// All-lowercase and all-uppercase forms are accepted as is; mixed case must
/// match the EIP-55 checksum.
pub fn parse_account(value: &str) -> Result<Address, String> {
    let Some(hex) = value.strip_prefix("0x") else {
        return Err("must start with 0x".to_string());
    };
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(format!("contains non-hexadecimal character {c:?}"));
    }
    if hex.len() != HEX_DIGITS {
        return Err(format!("must have {HEX_DIGITS} hex digits after 0x, found {}", hex.len()));
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(value, None).map_err(|_| "checksum mismatch".to_string())
    } else {
        value.parse::<Address>().map_err(|e| format!("invalid address: {e}"))
    }
}

fn parse_endpoint(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("invalid URL: {e}"))?;
    if !RPC_SCHEMES.contains(&url.scheme()) {
        return Err(format!(
            "unsupported scheme '{}', expected one of {}",
            url.scheme(),
            RPC_SCHEMES.join(", ")
        ));
    }
    Ok(url)
}
