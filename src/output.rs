//! # Output Configuration
//!
//! This module provides utilities for controlling CLI output appearance,
//! including color and emoji support based on terminal capabilities and
//! user preferences.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recipe_docs::output::{OutputConfig, emoji};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Aggregating recipes...", emoji(&config, "📦", "[LOAD]"));
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `--color=always` forces colors on (overriding `NO_COLOR`),
    /// `--color=never` forces them off, and anything else detects support
    /// with [`color_from_env`] before asking the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => color_from_env(|key| env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
                .unwrap_or_else(|| console::Term::stdout().features().colors_supported()),
        };

        Self { use_color }
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Color decision implied by the environment alone, in precedence order:
/// `NO_COLOR` present (even empty) disables, `CLICOLOR=0` disables,
/// a non-empty `CLICOLOR_FORCE` other than `0` enables, `TERM=dumb`
/// disables. `None` leaves the decision to the terminal.
pub fn color_from_env<F>(lookup: F) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    if lookup("NO_COLOR").is_some() {
        return Some(false);
    }
    if lookup("CLICOLOR").as_deref() == Some("0") {
        return Some(false);
    }
    if lookup("CLICOLOR_FORCE").is_some_and(|v| v != "0" && !v.is_empty()) {
        return Some(true);
    }
    if lookup("TERM").as_deref() == Some("dumb") {
        return Some(false);
    }
    None
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// A count, bold when colors are enabled.
pub fn count(config: &OutputConfig, value: usize) -> String {
    if config.use_color {
        style(value).bold().to_string()
    } else {
        value.to_string()
    }
}

/// A secondary detail such as a location, dimmed when colors are enabled.
pub fn dim(config: &OutputConfig, text: &str) -> String {
    if config.use_color {
        style(text).dim().to_string()
    } else {
        text.to_string()
    }
}
