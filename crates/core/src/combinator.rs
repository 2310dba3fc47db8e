//! Rule combination and matching.
//!
//! A release with no conditions is unrestricted. Otherwise every attached
//! condition must resolve (fail-closed), their rule sets are unioned per
//! dimension into one effective rule, and the context must pass:
//!
//! ```text
//! country  AND  company  AND  (driver OR vehicle)
//! ```
//!
//! where an empty dimension passes and the driver/vehicle pair is checked as
//! one coupled dimension.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::CoreError;
use crate::release::Release;
use crate::rules::{EvaluationContext, RuleSet};
use crate::types::DbId;

/// How the conditions attached to one release are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Union every condition's rule set per dimension, then match once.
    #[default]
    Union,
    /// Match each condition on its own; any full match qualifies.
    AnyCondition,
}

impl FromStr for MatchMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(MatchMode::Union),
            "any" | "any_condition" => Ok(MatchMode::AnyCondition),
            other => Err(CoreError::Validation(format!(
                "Unknown condition match mode: '{other}'. Valid modes: union, any"
            ))),
        }
    }
}

/// Decides whether an evaluation context may receive a release.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleCombinator {
    mode: MatchMode,
}

impl RuleCombinator {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether `context` is authorized for `release` given every condition
    /// of the release's application.
    ///
    /// Never fails: a condition id that does not resolve to a condition of
    /// the same application makes the whole release unavailable.
    pub fn is_available(
        &self,
        release: &Release,
        context: &EvaluationContext,
        conditions: &[Condition],
    ) -> bool {
        if release.condition_ids.is_empty() {
            return true;
        }

        let Some(attached) = resolve_conditions(release, conditions) else {
            return false;
        };

        match self.mode {
            MatchMode::Union => rule_matches(&effective_rule(attached), context),
            MatchMode::AnyCondition => attached.iter().any(|c| rule_matches(&c.rules, context)),
        }
    }
}

/// [`RuleCombinator::is_available`] with the default union semantics.
pub fn is_available(
    release: &Release,
    context: &EvaluationContext,
    conditions: &[Condition],
) -> bool {
    RuleCombinator::default().is_available(release, context, conditions)
}

/// Per-dimension union of the given conditions' rule sets.
pub fn effective_rule<'a>(conditions: impl IntoIterator<Item = &'a Condition>) -> RuleSet {
    conditions
        .into_iter()
        .fold(RuleSet::default(), |mut acc, condition| {
            acc.union_with(&condition.rules);
            acc
        })
}

/// Evaluate one rule set against a context.
pub fn rule_matches(rule: &RuleSet, context: &EvaluationContext) -> bool {
    country_matches(rule, context)
        && company_matches(rule, context)
        && driver_or_vehicle_matches(rule, context)
}

fn country_matches(rule: &RuleSet, context: &EvaluationContext) -> bool {
    rule.countries.is_empty() || member(&rule.countries, context.country.as_ref())
}

fn company_matches(rule: &RuleSet, context: &EvaluationContext) -> bool {
    rule.company_ids.is_empty() || member(&rule.company_ids, context.company_id.as_ref())
}

fn driver_or_vehicle_matches(rule: &RuleSet, context: &EvaluationContext) -> bool {
    let driver = || member(&rule.driver_ids, context.driver_id.as_ref());
    let vehicle = || member(&rule.vehicle_ids, context.vehicle_id.as_ref());

    match (rule.driver_ids.is_empty(), rule.vehicle_ids.is_empty()) {
        (true, true) => true,
        (false, true) => driver(),
        (true, false) => vehicle(),
        (false, false) => driver() || vehicle(),
    }
}

fn member<T: Ord>(set: &BTreeSet<T>, value: Option<&T>) -> bool {
    value.is_some_and(|v| set.contains(v))
}

/// Resolve every condition id of `release`, or `None` if any is missing.
fn resolve_conditions<'a>(
    release: &Release,
    conditions: &'a [Condition],
) -> Option<Vec<&'a Condition>> {
    let by_id: HashMap<DbId, &Condition> = conditions
        .iter()
        .filter(|c| c.application_id == release.application_id)
        .map(|c| (c.id, c))
        .collect();

    let mut attached = Vec::with_capacity(release.condition_ids.len());
    for condition_id in &release.condition_ids {
        match by_id.get(condition_id) {
            Some(condition) => attached.push(*condition),
            None => {
                tracing::debug!(
                    release_id = release.id,
                    condition_id,
                    "Release references an unknown condition, treating as unavailable"
                );
                return None;
            }
        }
    }
    Some(attached)
}
