//! Project-wide constants.

use std::path::PathBuf;
use std::time::Duration;

/// Anthropic Messages API endpoint.
pub const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Protocol version header value required by the API.
pub const API_VERSION: &str = "2023-06-01";

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// All Anthropic API keys start with this.
pub const KEY_PREFIX: &str = "sk-ant-";

/// Token budget for the drawing analysis call.
pub const EXTRACTION_MAX_TOKENS: u32 = 4000;

/// Token budget for a single per-item pricing call.
pub const PRICING_MAX_TOKENS: u32 = 500;

/// Token budget for the key-validation probe.
pub const PROBE_MAX_TOKENS: u32 = 10;

/// At most this many extracted items get priced; the rest are dropped.
pub const MAX_PRICED_ITEMS: usize = 10;

/// Wait between consecutive pricing calls, to stay under rate limits.
pub const PRICING_PACING: Duration = Duration::from_millis(1000);

/// Contingency added on top of the subtotal.
pub const CONTINGENCY_RATE: f64 = 0.15;

/// Default database path: `~/.takeoff/takeoff.db`.
/// Single DB for credentials and config.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .expect("cannot determine home directory")
        .join(".takeoff")
        .join("takeoff.db")
}

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a non-negative USD amount: `format_usd(1234.5)` → `"$1,234.50"`.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.max(0.0) * 100.0).round() as u64;
    format!("${}.{:02}", format_number(cents / 100), cents % 100)
}
