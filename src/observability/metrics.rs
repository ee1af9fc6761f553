//! Metrics rendering and exposition.
//!
//! # Metrics
//! - `ethereum_balance` (gauge): balance in wei per address, rendered fresh
//!   from each scrape's outcomes
//! - `ethereum_balance_errors_total` (counter): failed resolutions per
//!   address, cumulative for the process lifetime
//!
//! # Design Decisions
//! - A failed address has no gauge sample in that scrape; no sentinel value
//! - Gauge lines are written directly so nothing survives between scrapes
//! - The counter lives in a recorder owned by the renderer, not a global one
//! - Recording and rendering are separate; rendering has no side effects

use std::fmt::Write;

use alloy::primitives::U256;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

use crate::scrape::BalanceOutcome;

pub const BALANCE_METRIC: &str = "ethereum_balance";
pub const BALANCE_HELP: &str = "Ethereum Wallet Balance";
pub const ERRORS_METRIC: &str = "ethereum_balance_errors_total";
pub const ERRORS_HELP: &str = "Failed balance resolutions";

/// Content type of the Prometheus text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Turns scrape outcomes into exposition text.
pub struct MetricsRenderer {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl MetricsRenderer {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            describe_counter!(ERRORS_METRIC, ERRORS_HELP);
        });
        Self { recorder, handle }
    }

    /// Increment the error counter once per failed outcome.
    pub fn record_failures(&self, outcomes: &[BalanceOutcome]) {
        metrics::with_local_recorder(&self.recorder, || {
            for outcome in outcomes.iter().filter(|o| o.result.is_err()) {
                counter!(
                    ERRORS_METRIC,
                    "address" => outcome.address.clone(),
                    "address_name" => outcome.display_name.clone(),
                    "network_name" => outcome.network_key.clone(),
                )
                .increment(1);
            }
        });
    }

    /// Gauge block for `outcomes` followed by the error counter.
    pub fn render(&self, outcomes: &[BalanceOutcome]) -> String {
        let mut body = render_balances(outcomes);
        body.push_str(&sorted_series(&self.handle.render()));
        body
    }
}

impl Default for MetricsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetricsRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRenderer").finish_non_exhaustive()
    }
}

/// The `ethereum_balance` gauge block. Failed outcomes emit nothing.
pub fn render_balances(outcomes: &[BalanceOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# HELP {BALANCE_METRIC} {BALANCE_HELP}");
    let _ = writeln!(out, "# TYPE {BALANCE_METRIC} gauge");

    for outcome in outcomes {
        let Ok(wei) = outcome.result else { continue };
        let _ = writeln!(
            out,
            "{BALANCE_METRIC}{{address=\"{}\",address_name=\"{}\",network_name=\"{}\"}} {}",
            escape_label_value(&outcome.address),
            escape_label_value(&outcome.display_name),
            escape_label_value(&outcome.network_key),
            format_value(wei_to_f64(wei)),
        );
    }
    out
}

/// Wei as a float sample value, correctly rounded.
pub fn wei_to_f64(wei: U256) -> f64 {
    // Decimal text parses with correct rounding at any magnitude.
    wei.to_string().parse().unwrap_or(f64::INFINITY)
}

/// Format a sample value the way Go's `strconv.FormatFloat(v, 'g', -1, 64)`
/// does: shortest round-trip digits, exponent form outside `1e-4..1e6`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if (-4..6).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

/// Sort each run of sample lines; the exporter does not promise a stable
/// series order between renders.
fn sorted_series(text: &str) -> String {
    fn flush(run: &mut Vec<&str>, out: &mut String) {
        run.sort_unstable();
        for line in run.drain(..) {
            out.push_str(line);
            out.push('\n');
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut run = Vec::new();
    for line in text.lines() {
        if line.is_empty() || line.starts_with('#') {
            flush(&mut run, &mut out);
            out.push_str(line);
            out.push('\n');
        } else {
            run.push(line);
        }
    }
    flush(&mut run, &mut out);
    out
}

fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}
