// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Campaign reporting: the human-readable summary table and the structured
//! JSON record consumed by CI gating.
//!
//! The JSON report is one entry per harness (operation, types, interval
//! name or "full", verdict), plus the recorded exclusions and scope notes.
//! The scope notes carry the campaign's standing caveats, above all that
//! interval coverage is an engineering judgment, not a proven property.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Table, presets::UTF8_FULL};
use ubcheck_metadata::{CampaignReport, ExcludedCombo, HarnessReport, Verdict};

use crate::generator::Harness;
use crate::session::Session;

const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Standing caveats attached to every campaign report.
fn scope_notes() -> Vec<String> {
    vec![
        "Interval coverage is best-effort: nothing proves the declared intervals are \
         exhaustive over all behaviorally interesting regions."
            .into(),
        "Resource-exhausted verdicts are inconclusive; refine the interval catalog for the \
         affected combinations rather than treating them as failures."
            .into(),
        "The float range-membership predicate uses exclusive bounds that round toward the \
         integer MIN where MIN - 1 is not representable, excluding at most one safe value \
         per combination."
            .into(),
    ]
}

/// Assembles the structured campaign record.
pub fn build_report(
    max_states: u64,
    results: Vec<HarnessReport>,
    excluded: Vec<ExcludedCombo>,
) -> CampaignReport {
    CampaignReport {
        tool_version: TOOL_VERSION.to_string(),
        finished_at: chrono::Local::now().to_rfc3339(),
        max_states,
        results,
        excluded,
        scope_notes: scope_notes(),
    }
}

/// Writes the JSON report for downstream consumption.
pub fn write_json(path: &Path, report: &CampaignReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

#[derive(Default)]
struct GroupCounts {
    proved: usize,
    failed: usize,
    exhausted: usize,
}

fn group(results: &[HarnessReport]) -> BTreeMap<(String, String), GroupCounts> {
    let mut groups: BTreeMap<(String, String), GroupCounts> = BTreeMap::new();
    for r in results {
        let counts = groups.entry(r.harness.group_key()).or_default();
        match &r.verdict {
            Verdict::Proved { .. } => counts.proved += 1,
            Verdict::Counterexample { .. } => counts.failed += 1,
            Verdict::ResourceExhausted { .. } => counts.exhausted += 1,
        }
    }
    groups
}

/// Prints the end-of-campaign summary: per-combination rollup, failure
/// details with reproducing inputs, and the totals line.
pub fn print_summary(session: &Session, report: &CampaignReport) {
    if session.args.quiet {
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Operation", "Type", "Proved", "Failed", "Exhausted"]);
    for ((op, ty), counts) in group(&report.results) {
        table.add_row([
            op,
            ty,
            counts.proved.to_string(),
            counts.failed.to_string(),
            counts.exhausted.to_string(),
        ]);
    }
    println!("{table}");

    let mut proved = 0;
    let mut failed = 0;
    let mut exhausted = 0;
    for r in &report.results {
        match &r.verdict {
            Verdict::Proved { .. } => proved += 1,
            Verdict::Counterexample { inputs, detail } => {
                failed += 1;
                println!(
                    "Verification failed for - {} (inputs: [{}]: {detail})",
                    console::style(&r.harness.pretty_name).red(),
                    inputs.join(", "),
                );
            }
            Verdict::ResourceExhausted { .. } => {
                exhausted += 1;
                println!(
                    "Inconclusive (budget) - {}: consider narrower intervals for {} on {}",
                    console::style(&r.harness.pretty_name).yellow(),
                    r.harness.operation,
                    r.harness.type_name,
                );
            }
        }
    }

    if !report.excluded.is_empty() {
        println!("Excluded combinations:");
        for e in &report.excluded {
            println!("  {} on {}: {}", e.operation, e.type_name, e.reason);
        }
    }

    println!(
        "Complete - {proved} successfully verified harnesses, {failed} failures, \
         {exhausted} inconclusive, {} total.",
        report.results.len()
    );
}

/// Lists the expanded harness set without running it (`--only-expand`).
pub fn print_harness_list(harnesses: &[Harness]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Harness", "Operation", "Type", "Interval"]);
    for h in harnesses {
        let ty = match &h.meta.target_type {
            Some(target) => format!("{} -> {}", h.meta.type_name, target),
            None => h.meta.type_name.clone(),
        };
        table.add_row([
            h.meta.pretty_name.clone(),
            h.meta.operation.clone(),
            ty,
            h.meta.interval_label().to_string(),
        ]);
    }
    println!("{table}");
    println!("{} harnesses.", harnesses.len());
}
