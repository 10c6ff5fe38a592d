// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The campaign runner: executes every materialized harness against the
//! engine and classifies the outcomes.
//!
//! Runs are independent and side-effect-free with respect to each other, so
//! the set runs data-parallel under rayon. A counterexample is recorded and
//! reported; it never aborts the remaining campaign. Cancellation is
//! campaign-level: harnesses that have not started when the token trips are
//! skipped, and verdicts already recorded stay valid.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;
use ubcheck_metadata::{HarnessReport, Verdict};

use crate::engine::Budget;
use crate::generator::Harness;
use crate::session::Session;

/// Campaign-level cancellation: an operator can abort the queued remainder
/// of a campaign without invalidating recorded results.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs every harness and returns one report per completed run, in
/// expansion order. Skipped (cancelled) harnesses produce no report.
pub fn run_campaign(
    session: &Session,
    harnesses: &[Harness],
    cancel: &CancelToken,
) -> Vec<HarnessReport> {
    let reports: Vec<Option<HarnessReport>> = harnesses
        .par_iter()
        .map(|harness| {
            if cancel.is_cancelled() {
                return None;
            }
            Some(run_one(session, harness))
        })
        .collect();
    reports.into_iter().flatten().collect()
}

fn run_one(session: &Session, harness: &Harness) -> HarnessReport {
    let budget = Budget::new(session.config.max_states, session.config.timeout);
    let start = Instant::now();
    let verdict = harness.run(&budget);
    let runtime = start.elapsed();
    debug!(harness = %harness.meta.pretty_name, ?verdict, ?runtime, "harness finished");

    if !session.args.quiet {
        let word = match &verdict {
            Verdict::Proved { .. } => console::style(verdict.word()).green(),
            Verdict::Counterexample { .. } => console::style(verdict.word()).red(),
            Verdict::ResourceExhausted { .. } => console::style(verdict.word()).yellow(),
        };
        println!("Checking harness {}... {word}", harness.meta.pretty_name);
    }

    HarnessReport { harness: harness.meta.clone(), verdict, runtime_ms: runtime.as_millis() }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use ubcheck_metadata::HarnessMetadata;

    use crate::args::UbcheckArgs;
    use crate::session::Session;

    use super::*;

    fn quiet_session() -> Session {
        Session::for_tests(UbcheckArgs::parse_from(["ubcheck", "--quiet"]))
    }

    fn stub_harness(name: &str, verdict: Verdict) -> Harness {
        let meta = HarnessMetadata {
            pretty_name: name.to_string(),
            operation: "unchecked_add".into(),
            type_name: "u8".into(),
            target_type: None,
            interval: None,
        };
        Harness::new(meta, Box::new(move |_| verdict.clone()))
    }

    #[test]
    fn a_counterexample_does_not_abort_the_remaining_campaign() {
        let session = quiet_session();
        let harnesses = vec![
            stub_harness("h1", Verdict::Proved { explored: 1 }),
            stub_harness(
                "h2",
                Verdict::Counterexample { inputs: vec!["127".into(), "1".into()], detail: "overflow".into() },
            ),
            stub_harness("h3", Verdict::ResourceExhausted { explored: 5 }),
        ];
        let reports = run_campaign(&session, &harnesses, &CancelToken::new());
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].harness.pretty_name, "h1");
        assert!(reports[1].verdict.is_failure());
        assert_eq!(reports[2].verdict, Verdict::ResourceExhausted { explored: 5 });
    }

    #[test]
    fn cancellation_skips_unstarted_harnesses_without_erasing_results() {
        let session = quiet_session();
        let harnesses: Vec<_> =
            (0..64).map(|i| stub_harness(&format!("h{i}"), Verdict::Proved { explored: 1 })).collect();
        let cancel = CancelToken::new();
        cancel.cancel();
        let reports = run_campaign(&session, &harnesses, &cancel);
        assert!(reports.is_empty());
    }

    #[test]
    fn reports_preserve_expansion_order() {
        let session = quiet_session();
        let harnesses: Vec<_> =
            (0..32).map(|i| stub_harness(&format!("h{i}"), Verdict::Proved { explored: 1 })).collect();
        let reports = run_campaign(&session, &harnesses, &CancelToken::new());
        let names: Vec<_> = reports.iter().map(|r| r.harness.pretty_name.as_str()).collect();
        let expected: Vec<_> = (0..32).map(|i| format!("h{i}")).collect();
        assert_eq!(names, expected);
    }
}
