//! Startup banner and session summary display.

use crate::consts::format_number;
use crate::provider::TokenUsage;

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub model: &'a str,
    pub auth_status: &'a str,
    pub db: &'a str,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║           T A K E O F F               ║
   ║   drawings in, cost estimates out     ║
   ╚═══════════════════════════════════════╝

   version  {}
   model    {}
   auth     {}
   db       {}
"#,
        env!("CARGO_PKG_VERSION"),
        info.model,
        info.auth_status,
        info.db,
    );
}

/// Print the session summary (token usage + farewell).
pub fn print_session_summary(usage: TokenUsage) {
    if usage.total() > 0 {
        println!(
            "session: {:>6} input + {:>6} output = {:>6} tokens",
            format_number(usage.input_tokens),
            format_number(usage.output_tokens),
            format_number(usage.total()),
        );
    }
}
