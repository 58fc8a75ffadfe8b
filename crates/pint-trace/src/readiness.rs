//! Readiness gate for downstream validation runs.
//!
//! Checks a workspace against mapping and population thresholds and
//! reports every unmet condition at once, each with a remediation hint,
//! so the caller never fixes one blocker only to discover the next.

use serde::{Deserialize, Serialize};

/// Thresholds a workspace must clear before validation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessThresholds {
    /// Require a saved column-mapping profile.
    pub require_mapping_profile: bool,
    /// Minimum fraction of mandatory DRs mapped to template columns.
    pub min_mandatory_mapping_pct: f64,
    /// Minimum mean population across mapped mandatory DRs.
    pub min_mandatory_population_pct: f64,
}

impl Default for ReadinessThresholds {
    fn default() -> Self {
        Self {
            require_mapping_profile: true,
            min_mandatory_mapping_pct: 0.95,
            min_mandatory_population_pct: 0.90,
        }
    }
}

/// Current workspace state, precomputed by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessInput {
    pub has_mapping_profile: bool,
    pub mandatory_mapping_pct: f64,
    pub mandatory_population_pct: f64,
}

/// One blocking condition with its remediation route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReason {
    pub message: String,
    /// Where in the workspace UI the blocker is fixed.
    pub remediation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub ready: bool,
    /// Empty exactly when `ready` is true.
    pub reasons: Vec<ReadinessReason>,
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Evaluates every threshold and collects all unmet ones.
pub fn evaluate_readiness(
    thresholds: &ReadinessThresholds,
    input: &ReadinessInput,
) -> ReadinessReport {
    let mut reasons = Vec::new();

    if thresholds.require_mapping_profile && !input.has_mapping_profile {
        reasons.push(ReadinessReason {
            message: "No column-mapping profile has been saved for this workspace".to_string(),
            remediation: "/workspace/mapping".to_string(),
        });
    }

    if input.mandatory_mapping_pct < thresholds.min_mandatory_mapping_pct {
        reasons.push(ReadinessReason {
            message: format!(
                "Only {} of mandatory data requirements are mapped (minimum {})",
                pct(input.mandatory_mapping_pct),
                pct(thresholds.min_mandatory_mapping_pct)
            ),
            remediation: "/workspace/mapping".to_string(),
        });
    }

    if input.mandatory_population_pct < thresholds.min_mandatory_population_pct {
        reasons.push(ReadinessReason {
            message: format!(
                "Mandatory data requirement population is {} (minimum {})",
                pct(input.mandatory_population_pct),
                pct(thresholds.min_mandatory_population_pct)
            ),
            remediation: "/workspace/data-quality".to_string(),
        });
    }

    ReadinessReport {
        ready: reasons.is_empty(),
        reasons,
    }
}
