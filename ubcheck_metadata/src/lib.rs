// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared types for the `ubcheck` verification campaign: harness identities,
//! verdicts, and the JSON report consumed by CI gating and human review.

use serde::{Deserialize, Serialize};

pub use harness::*;
pub use operation::*;
pub use verdict::*;

mod harness;
mod operation;
mod verdict;

/// The structure of the `ubcheck-report.json` file emitted after a campaign.
///
/// One entry per executed harness, plus the combinations that were excluded
/// from expansion (with the reason they were excluded) and free-form scope
/// notes. The report is the interface to downstream CI gating, so changes to
/// this structure are breaking changes for consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignReport {
    /// Version of the driver that produced this report.
    pub tool_version: String,
    /// RFC 3339 timestamp of when the campaign finished.
    pub finished_at: String,
    /// State budget each harness ran under.
    pub max_states: u64,
    /// One entry per executed harness, in expansion order.
    pub results: Vec<HarnessReport>,
    /// Combinations deliberately excluded from expansion.
    pub excluded: Vec<ExcludedCombo>,
    /// Known limitations of the campaign's coverage, e.g. the interval
    /// catalog's non-coverage guarantee.
    pub scope_notes: Vec<String>,
}

impl CampaignReport {
    /// Whether the campaign as a whole should gate a CI pipeline red.
    /// Resource exhaustion is inconclusive, not failing.
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.verdict.is_failure())
    }
}

/// An (operation, type) combination that the expansion driver refused to
/// instantiate, together with the recorded reason.
///
/// Exclusions are configuration decisions (e.g. "no wider type exists for
/// `u128` widening multiply"), never silent skips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExcludedCombo {
    pub operation: String,
    pub type_name: String,
    pub reason: String,
}
