// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use regex::Regex;
use ubcheck_metadata::Operation;

/// Command-line arguments for the `ubcheck` driver. Anything that overlaps
/// with `ubcheck.toml` wins over the file.
#[derive(Debug, Parser)]
#[command(
    name = "ubcheck",
    about = "Expand and run a verification campaign over unchecked numeric operations",
    version
)]
pub struct UbcheckArgs {
    /// Run only harnesses whose generated name matches this regular expression
    #[arg(long)]
    pub filter: Option<String>,
    /// Run only harnesses for this operation
    #[arg(long, value_enum)]
    pub operation: Option<Operation>,
    /// Run only harnesses involving this primitive type (operand or target), e.g. `u32`
    #[arg(long = "type")]
    pub type_name: Option<String>,

    /// Per-harness state budget; over-budget domains report resource exhaustion
    #[arg(long)]
    pub max_states: Option<u64>,
    /// Per-harness timeout in seconds; 0 disables the deadline
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Number of parallel verification threads (default: one per core)
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Path to the campaign configuration file (default: ./ubcheck.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Where to write the JSON campaign report
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// List the expanded harness set without running it
    #[arg(long)]
    pub only_expand: bool,

    /// Produce no per-harness output, just the exit code and requested artifacts
    #[arg(long, short)]
    pub quiet: bool,
    /// Output campaign phases and minor debug information
    #[arg(long, short, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl UbcheckArgs {
    /// Validation beyond what clap expresses declaratively.
    pub fn validate(&self) -> Result<()> {
        if let Some(pattern) = &self.filter {
            if let Err(e) = Regex::new(pattern) {
                bail!("invalid --filter pattern: {e}");
            }
        }
        if self.jobs == Some(0) {
            bail!("--jobs must be at least 1");
        }
        if self.max_states == Some(0) {
            bail!("--max-states must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_and_validate() {
        let args = UbcheckArgs::parse_from([
            "ubcheck",
            "--operation",
            "unchecked-add",
            "--type",
            "i8",
            "--filter",
            "full$",
        ]);
        assert_eq!(args.operation, Some(Operation::UncheckedAdd));
        assert_eq!(args.type_name.as_deref(), Some("i8"));
        args.validate().unwrap();
    }

    #[test]
    fn bad_filter_regex_is_rejected() {
        let args = UbcheckArgs::parse_from(["ubcheck", "--filter", "("]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(UbcheckArgs::try_parse_from(["ubcheck", "-q", "-v"]).is_err());
    }

    #[test]
    fn zero_resource_limits_are_rejected() {
        assert!(UbcheckArgs::parse_from(["ubcheck", "--jobs", "0"]).validate().is_err());
        assert!(UbcheckArgs::parse_from(["ubcheck", "--max-states", "0"]).validate().is_err());
    }
}
