// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The driver session: resolved arguments plus configuration, shared by the
//! expansion, runner, and reporting stages.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;
use ubcheck_metadata::HarnessMetadata;

use crate::args::UbcheckArgs;
use crate::config::{self, ResolvedConfig};

pub struct Session {
    pub args: UbcheckArgs,
    pub config: ResolvedConfig,
    filter: Option<Regex>,
}

impl Session {
    pub fn new(args: UbcheckArgs) -> Result<Session> {
        args.validate()?;
        init_logger(&args);

        let file = config::load_file(args.config.as_deref())?;
        let config = ResolvedConfig::resolve(&args, file);
        debug!(?config, "session configuration resolved");

        if let Some(jobs) = args.jobs {
            rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
                .context("failed to configure the verification thread pool")?;
        }

        // Validated above, so compilation cannot fail here.
        let filter = args.filter.as_deref().and_then(|p| Regex::new(p).ok());
        Ok(Session { args, config, filter })
    }

    /// A session for unit tests: defaults only, no global logger or thread
    /// pool mutation.
    #[cfg(test)]
    pub fn for_tests(args: UbcheckArgs) -> Session {
        let config = ResolvedConfig::resolve(&args, config::FileConfig::default());
        Session { args, config, filter: None }
    }

    /// Whether a harness survives the CLI selection flags.
    pub fn selects(&self, meta: &HarnessMetadata) -> bool {
        if let Some(op) = self.args.operation {
            if meta.operation != op.to_string() {
                return false;
            }
        }
        if let Some(ty) = &self.args.type_name {
            if meta.type_name != *ty && meta.target_type.as_deref() != Some(ty.as_str()) {
                return false;
            }
        }
        if let Some(filter) = &self.filter {
            if !filter.is_match(&meta.pretty_name) {
                return false;
            }
        }
        true
    }
}

fn init_logger(args: &UbcheckArgs) {
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    // A second init (e.g. under tests) is fine to ignore.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn meta(name: &str, op: &str, ty: &str, target: Option<&str>) -> HarnessMetadata {
        HarnessMetadata {
            pretty_name: name.into(),
            operation: op.into(),
            type_name: ty.into(),
            target_type: target.map(Into::into),
            interval: None,
        }
    }

    #[test]
    fn selection_honors_operation_and_type() {
        let session = Session::new(UbcheckArgs::parse_from([
            "ubcheck", "--quiet", "--operation", "unchecked-mul", "--type", "u32",
        ]))
        .unwrap();
        assert!(session.selects(&meta("unchecked_mul_u32_full", "unchecked_mul", "u32", None)));
        assert!(!session.selects(&meta("unchecked_mul_u16_full", "unchecked_mul", "u16", None)));
        assert!(!session.selects(&meta("unchecked_add_u32_full", "unchecked_add", "u32", None)));
    }

    #[test]
    fn type_selection_matches_truncation_targets() {
        let session =
            Session::new(UbcheckArgs::parse_from(["ubcheck", "--quiet", "--type", "u16"])).unwrap();
        assert!(session.selects(&meta("float_to_int_f32_to_u16_zero", "float_to_int", "f32", Some("u16"))));
        assert!(!session.selects(&meta("float_to_int_f32_to_u8_zero", "float_to_int", "f32", Some("u8"))));
    }

    #[test]
    fn name_filter_is_a_regex() {
        let session =
            Session::new(UbcheckArgs::parse_from(["ubcheck", "--quiet", "--filter", "_full$"])).unwrap();
        assert!(session.selects(&meta("unchecked_add_i8_full", "unchecked_add", "i8", None)));
        assert!(!session.selects(&meta("unchecked_add_u32_a_max_b_mid", "unchecked_add", "u32", None)));
    }
}
