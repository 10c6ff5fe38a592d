// Copyright ubcheck Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};

/// Our notion of the outcome of one harness's verification run.
///
/// `ResourceExhausted` is deliberately distinct from `Counterexample`: an
/// exhausted budget says nothing about the property and must never be
/// upgraded to a proof or downgraded to a disproof. The expected response is
/// a finer-grained interval catalog entry, not a bug report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Every state in the assumed domain was explored without a violation.
    Proved { explored: u64 },
    /// A concrete input assignment violating the obligation.
    Counterexample {
        /// Rendered operand values, in operand order.
        inputs: Vec<String>,
        /// What the violation was, e.g. the mismatching result values.
        detail: String,
    },
    /// The state budget or deadline ran out before the domain was covered.
    ResourceExhausted { explored: u64 },
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Counterexample { .. })
    }

    pub fn is_proved(&self) -> bool {
        matches!(self, Verdict::Proved { .. })
    }

    /// Short classification word used in report tables.
    pub fn word(&self) -> &'static str {
        match self {
            Verdict::Proved { .. } => "PROVED",
            Verdict::Counterexample { .. } => "FAILED",
            Verdict::ResourceExhausted { .. } => "EXHAUSTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_is_not_a_failure() {
        assert!(!Verdict::ResourceExhausted { explored: 10 }.is_failure());
        assert!(!Verdict::ResourceExhausted { explored: 10 }.is_proved());
        assert!(
            Verdict::Counterexample { inputs: vec!["127".into(), "1".into()], detail: String::new() }
                .is_failure()
        );
    }
}
