// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};

use crate::Verdict;

/// We emit this structure for every harness the expansion driver materializes.
///
/// The `pretty_name` is the harness's unique identity within a campaign; the
/// remaining fields break that identity apart for filtering and aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HarnessMetadata {
    /// Unique generated name, e.g. `unchecked_mul_u32_a_max_b_mid`.
    pub pretty_name: String,
    /// The operation under verification, e.g. `unchecked_add`.
    pub operation: String,
    /// The operand primitive type, e.g. `i8` or `f64`.
    pub type_name: String,
    /// Second type for widening/truncating operations (`u16` widening multiply
    /// carries `u32` here; `f32` truncation carries the integer target).
    pub target_type: Option<String>,
    /// Name of the interval catalog entry this harness is constrained to, or
    /// `None` when the full representable range is checked in one harness.
    pub interval: Option<String>,
}

impl HarnessMetadata {
    /// The interval label used in reports: the catalog entry name, or "full".
    pub fn interval_label(&self) -> &str {
        self.interval.as_deref().unwrap_or("full")
    }

    /// Aggregation key for per-operation-per-type report rows.
    pub fn group_key(&self) -> (String, String) {
        let ty = match &self.target_type {
            Some(target) => format!("{} -> {}", self.type_name, target),
            None => self.type_name.clone(),
        };
        (self.operation.clone(), ty)
    }
}

/// The result of running a single harness, as recorded in the campaign report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessReport {
    pub harness: HarnessMetadata,
    pub verdict: Verdict,
    /// Wall-clock runtime of the verification run, in milliseconds.
    pub runtime_ms: u128,
}
