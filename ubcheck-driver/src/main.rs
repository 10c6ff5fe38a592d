// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `ubcheck` driver: expands the verification campaign declared by the
//! contract layer and interval catalog, runs every harness, and reports the
//! verdicts.

use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::debug;

use crate::args::UbcheckArgs;
use crate::generator::Harness;
use crate::runner::CancelToken;
use crate::session::Session;

mod args;
mod catalog;
mod config;
mod contracts;
mod engine;
mod expand;
mod generator;
mod primitive;
mod report;
mod runner;
mod session;

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(error) => {
            debug!(?error, "main_failure");
            eprintln!("{}: {error:#}", console::style("error").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let args = UbcheckArgs::parse();
    let session = Session::new(args)?;

    let campaign = expand::expand(&session.config)?;
    let harnesses: Vec<Harness> =
        campaign.harnesses.into_iter().filter(|h| session.selects(&h.meta)).collect();

    if session.args.only_expand {
        report::print_harness_list(&harnesses);
        return Ok(ExitCode::SUCCESS);
    }
    if harnesses.is_empty() {
        bail!("no harnesses match the requested filters");
    }

    let results = runner::run_campaign(&session, &harnesses, &CancelToken::new());
    let report = report::build_report(session.config.max_states, results, campaign.excluded);
    report::print_summary(&session, &report);
    if let Some(path) = &session.args.report {
        report::write_json(path, &report)?;
        if !session.args.quiet {
            println!("Campaign report written to {}", path.display());
        }
    }

    Ok(if report.has_failures() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
