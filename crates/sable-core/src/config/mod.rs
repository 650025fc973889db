//! Configuration system for sable
//!
//! Rule activation and severity overrides, plus rules declared in
//! configuration (the catalog). Files are TOML, JSON or JSONC and are found
//! by walking up from a start directory.
//!
//! ## Example Configuration
//!
//! ```toml
//! [linter]
//! enabled = true
//!
//! [linter.rules.S124]
//! enabled = true
//! severity = "critical"
//!
//! [[catalog]]
//! id = "NoFixme"
//! title = "Track FIXME comments"
//! pattern = "FIXME"
//! ```

mod loader;
mod sable_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use sable_config::{LinterConfiguration, RuleConfig, RuleOverride, SableConfiguration};
