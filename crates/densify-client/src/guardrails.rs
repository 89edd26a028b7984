//! Guardrails: score-bucketed views over instance-governance targets
//!
//! Once a recommendation has its instance-governance data loaded, these
//! helpers group the alternative instance types by blended compatibility
//! score, one list per compatibility level. Built once per call and never
//! mutated afterwards.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::models::Recommendation;

pub const COMPAT_OK: &str = "OK";
pub const COMPAT_INCOMPATIBLE: &str = "Technically Incompatible";
pub const COMPAT_INSUFFICIENT_RESOURCES: &str = "Insufficient Resources";
pub const COMPAT_OUTSIDE_SPEND_TOLERANCE: &str = "Outside Spend Tolerance";

/// One alternative instance type with its blended score and cost relative
/// to the optimal choice.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardrailsNode {
    pub instance_type: String,
    pub blended_score: i64,
    pub percent_optimal_cost: f64,
}

/// Instance types of one compatibility level, grouped by blended score.
///
/// The ordered map keeps score buckets sorted, so min/max and sorted-score
/// queries read straight off the keys.
#[derive(Debug, Clone, Default)]
pub struct GuardrailsList {
    pub compatibility: String,
    scores: BTreeMap<i64, BTreeMap<String, GuardrailsNode>>,
}

impl GuardrailsList {
    pub fn new(compatibility: impl Into<String>) -> Self {
        Self {
            compatibility: compatibility.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn add_node(&mut self, node: GuardrailsNode) {
        self.scores
            .entry(node.blended_score)
            .or_default()
            .insert(node.instance_type.clone(), node);
    }

    /// Number of distinct score buckets.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of instance types in one score bucket.
    pub fn len_at(&self, score: i64) -> usize {
        self.scores.get(&score).map_or(0, BTreeMap::len)
    }

    /// Number of instance types across all buckets.
    pub fn total_len(&self) -> usize {
        self.scores.values().map(BTreeMap::len).sum()
    }

    pub fn sorted_scores(&self) -> Vec<i64> {
        self.scores.keys().copied().collect()
    }

    pub fn min_score(&self) -> Option<i64> {
        self.scores.keys().next().copied()
    }

    pub fn max_score(&self) -> Option<i64> {
        self.scores.keys().next_back().copied()
    }

    pub fn score_items(&self, score: i64) -> Option<&BTreeMap<String, GuardrailsNode>> {
        self.scores.get(&score)
    }
}

impl Recommendation {
    /// Targets the instance can move to without restriction.
    pub fn guardrails_ok(&self) -> Result<GuardrailsList, Error> {
        self.guardrails_for(COMPAT_OK)
    }

    pub fn guardrails_incompatible(&self) -> Result<GuardrailsList, Error> {
        self.guardrails_for(COMPAT_INCOMPATIBLE)
    }

    pub fn guardrails_insufficient_resources(&self) -> Result<GuardrailsList, Error> {
        self.guardrails_for(COMPAT_INSUFFICIENT_RESOURCES)
    }

    pub fn guardrails_outside_spend_tolerance(&self) -> Result<GuardrailsList, Error> {
        self.guardrails_for(COMPAT_OUTSIDE_SPEND_TOLERANCE)
    }

    /// Bucket the loaded governance targets of one compatibility level by
    /// blended score. Fails when no governance data has been loaded for
    /// this recommendation.
    pub fn guardrails_for(&self, compatibility: &str) -> Result<GuardrailsList, Error> {
        if self.instance_governance.targets.is_empty() {
            return Err(Error::GovernanceUnavailable(self.name.clone()));
        }

        let mut list = GuardrailsList::new(compatibility);
        let wanted = compatibility.to_lowercase();
        for target in &self.instance_governance.targets {
            if target.compatibility.to_lowercase() == wanted {
                list.add_node(GuardrailsNode {
                    instance_type: target.instance_type.clone(),
                    blended_score: target.blended_score,
                    percent_optimal_cost: target.percent_optimal_cost,
                });
            }
        }
        Ok(list)
    }
}
