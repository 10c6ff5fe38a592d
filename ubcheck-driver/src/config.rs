// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Campaign configuration: a TOML file (`ubcheck.toml` by default) merged
//! under the command line, CLI flags winning. The file is where a team
//! records campaign-scope decisions (budgets, interval widths, which float
//! truncation targets are in scope) so that they are versioned and
//! reviewable alongside the code.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use crate::args::UbcheckArgs;
use crate::catalog::CatalogConfig;

/// Default per-harness state budget: comfortably above an 8-bit binary
/// cross product (2^16) and a u16 unary full range, below a 16-bit binary
/// cross product (2^32).
const DEFAULT_MAX_STATES: u64 = 1 << 22;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FLOAT_TARGET_MAX_BITS: u32 = 64;

/// The raw contents of `ubcheck.toml`. Every field is optional; omitted
/// fields fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub max_states: Option<u64>,
    /// Per-harness timeout in seconds; `0` disables the deadline.
    pub timeout_secs: Option<u64>,
    pub interval_half_width: Option<u64>,
    pub float_ulp_half_width: Option<u64>,
    pub full_range_max_bits: Option<u32>,
    /// Widest integer target for float truncation harnesses. 128-bit
    /// targets stay excluded until the range-membership predicate is
    /// validated at that width.
    pub float_target_max_bits: Option<u32>,
}

/// Fully resolved campaign configuration, after defaults, file, and CLI
/// merging.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub max_states: u64,
    pub timeout: Option<Duration>,
    pub catalog: CatalogConfig,
    pub float_target_max_bits: u32,
}

impl ResolvedConfig {
    pub fn resolve(args: &UbcheckArgs, file: FileConfig) -> Self {
        let timeout_secs = args.timeout.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS);
        let defaults = CatalogConfig::default();
        ResolvedConfig {
            max_states: args.max_states.or(file.max_states).unwrap_or(DEFAULT_MAX_STATES),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            catalog: CatalogConfig {
                half_width: file.interval_half_width.unwrap_or(defaults.half_width),
                float_ulp_half_width: file
                    .float_ulp_half_width
                    .unwrap_or(defaults.float_ulp_half_width),
                full_range_max_bits: file
                    .full_range_max_bits
                    .unwrap_or(defaults.full_range_max_bits),
            },
            float_target_max_bits: file
                .float_target_max_bits
                .unwrap_or(DEFAULT_FLOAT_TARGET_MAX_BITS),
        }
    }
}

/// Loads the configuration file. An explicitly passed path must exist; the
/// default `ubcheck.toml` is optional.
pub fn load_file(explicit: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match explicit {
        Some(path) => (path, true),
        None => (Path::new("ubcheck.toml"), false),
    };
    if !path.exists() {
        if required {
            bail!("configuration file {} does not exist", path.display());
        }
        return Ok(FileConfig::default());
    }
    debug!(path = %path.display(), "loading campaign configuration");
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> UbcheckArgs {
        UbcheckArgs::parse_from(argv)
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let cfg = ResolvedConfig::resolve(&args(&["ubcheck"]), FileConfig::default());
        assert_eq!(cfg.max_states, DEFAULT_MAX_STATES);
        assert_eq!(cfg.timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.float_target_max_bits, 64);
    }

    #[test]
    fn cli_overrides_file_overrides_defaults() {
        let file: FileConfig =
            toml::from_str("max_states = 1000\ntimeout_secs = 5\ninterval_half_width = 15").unwrap();
        let cfg = ResolvedConfig::resolve(&args(&["ubcheck", "--max-states", "77"]), file);
        assert_eq!(cfg.max_states, 77);
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.catalog.half_width, 15);
    }

    #[test]
    fn zero_timeout_disables_the_deadline() {
        let file: FileConfig = toml::from_str("timeout_secs = 0").unwrap();
        let cfg = ResolvedConfig::resolve(&args(&["ubcheck"]), file);
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("max_state = 10").is_err());
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        assert!(load_file(Some(Path::new("/nonexistent/ubcheck.toml"))).is_err());
    }
}
