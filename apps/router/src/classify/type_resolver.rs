//! Type Resolver — maps an explicit job-type label straight to a role, no scoring.
//!
//! Stages, first hit wins:
//! 1. exact lookup of the normalized label
//! 2. structural rules, in authored order
//! 3. substring scan over the label table, in authored order
//!
//! `None` is a normal outcome: the caller falls back to keyword scoring.

use crate::classify::normalize::normalize_opt;
use crate::classify::role::Role;
use crate::classify::table::RoutingTable;

/// How a label was resolved. Only surfaced in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    Exact,
    Rule,
    Substring,
}

pub fn resolve_type(table: &RoutingTable, raw_label: Option<&str>) -> Option<(Role, LabelMatch)> {
    let label = normalize_opt(raw_label);
    if label.is_empty() {
        return None;
    }

    if let Some(role) = table.label_role(&label) {
        return Some((role, LabelMatch::Exact));
    }

    if let Some(rule) = table.rules().iter().find(|r| r.pattern.is_match(&label)) {
        return Some((rule.role, LabelMatch::Rule));
    }

    table
        .labels()
        .iter()
        .find(|entry| label.contains(entry.label.as_str()))
        .map(|entry| (entry.role, LabelMatch::Substring))
}
