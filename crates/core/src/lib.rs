//! Release eligibility engine.
//!
//! Pure domain logic for deciding which release an evaluation context should
//! be offered:
//!
//! - [`rules`]: the four-dimensional [`RuleSet`](rules::RuleSet) and the
//!   caller-supplied [`EvaluationContext`](rules::EvaluationContext).
//! - [`combinator`]: merges the rules of a release's conditions and decides
//!   whether a context is accepted.
//! - [`selector`]: scans active releases by version code and picks the
//!   first acceptable one.
//! - [`storage`]: the read-only seam the selector needs from persistence.
//!
//! Nothing in this crate performs I/O directly.

pub mod activity;
pub mod combinator;
pub mod condition;
pub mod error;
pub mod release;
pub mod rules;
pub mod selector;
pub mod storage;
pub mod types;
pub mod update_check;
pub mod validation;
