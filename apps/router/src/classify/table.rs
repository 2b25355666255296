//! Routing table — the declarative role profiles, type labels and structural rules.
//!
//! Authored as JSON (`config/routing.json` is embedded as the default), validated
//! and compiled once at startup. Every stage of classification reads from the same
//! `RoutingTable`, so the type resolver, the keyword scorer and the destination
//! pages can never disagree about which roles exist.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::classify::normalize::normalize;
use crate::classify::role::Role;

const EMBEDDED_TABLE: &str = include_str!("../../config/routing.json");

// ────────────────────────────────────────────────────────────────────────────
// Authored form
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRoutingTable {
    pub roles: Vec<RawRoleProfile>,
    pub type_labels: Vec<RawTypeLabel>,
    #[serde(default)]
    pub structural_rules: Vec<RawStructuralRule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRoleProfile {
    pub role: Role,
    /// Destination page, relative to the static base URL.
    pub page: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub boost_tools: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTypeLabel {
    pub label: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStructuralRule {
    pub pattern: String,
    pub role: Role,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("routing table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("role '{0}' has no profile")]
    MissingRole(Role),

    #[error("role '{0}' has more than one profile")]
    DuplicateRole(Role),

    #[error("role '{role}' has invalid weight {weight} (must be positive and finite)")]
    InvalidWeight { role: Role, weight: f64 },

    #[error("role '{0}' has an empty destination page")]
    EmptyPage(Role),

    #[error("role '{0}' lists an empty keyword or tool")]
    EmptyPhrase(Role),

    #[error("type label '{0}' is empty after normalization")]
    EmptyLabel(String),

    #[error("type label '{0}' appears more than once")]
    DuplicateLabel(String),

    #[error("pattern '{pattern}' does not compile: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Compiled form
// ────────────────────────────────────────────────────────────────────────────

/// A keyword or tool phrase compiled to a word-boundary regex.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    regex: Regex,
}

impl PhraseMatcher {
    /// `phrase` is lowercased. Inner whitespace matches any whitespace run, and a
    /// `\b` is anchored on each edge that is a word character so that `c++` or
    /// `aha!` still match while `can` never matches inside `scanner`.
    pub fn new(phrase: &str) -> Result<Self, regex::Error> {
        let phrase = phrase.trim().to_lowercase();
        let body = phrase
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");

        let mut pattern = String::with_capacity(body.len() + 4);
        if phrase.chars().next().is_some_and(is_word_char) {
            pattern.push_str(r"\b");
        }
        pattern.push_str(&body);
        if phrase.chars().last().is_some_and(is_word_char) {
            pattern.push_str(r"\b");
        }

        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Non-overlapping occurrences in already-lowercased `text`.
    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[derive(Debug, Clone)]
pub struct RoleProfile {
    pub role: Role,
    pub page: String,
    pub weight: f64,
    pub keywords: Vec<PhraseMatcher>,
    pub boost_tools: Vec<PhraseMatcher>,
}

#[derive(Debug, Clone)]
pub struct TypeLabel {
    /// Normalized canonical label.
    pub label: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct StructuralRule {
    pub pattern: Regex,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct RoutingTable {
    /// One profile per role, in `Role::ALL` order.
    profiles: Vec<RoleProfile>,
    /// Authored order; earlier labels win the substring scan.
    labels: Vec<TypeLabel>,
    label_index: HashMap<String, Role>,
    /// Authored order; first match wins.
    rules: Vec<StructuralRule>,
}

impl RoutingTable {
    /// The table compiled into the binary from `config/routing.json`.
    pub fn embedded() -> Result<Self, TableError> {
        Self::from_json(EMBEDDED_TABLE)
    }

    /// Loads the table from `path`, or the embedded default when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read routing table {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("Invalid routing table {}", path.display()))
            }
            None => Self::embedded().context("Embedded routing table is invalid"),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, TableError> {
        let doc: RawRoutingTable = serde_json::from_str(raw)?;
        Self::from_raw(doc)
    }

    pub fn from_raw(doc: RawRoutingTable) -> Result<Self, TableError> {
        let mut by_role: HashMap<Role, RoleProfile> = HashMap::new();
        for profile in doc.roles {
            let role = profile.role;
            if by_role.contains_key(&role) {
                return Err(TableError::DuplicateRole(role));
            }
            by_role.insert(role, compile_profile(profile)?);
        }

        let mut profiles = Vec::with_capacity(Role::ALL.len());
        for role in Role::ALL {
            let profile = by_role.remove(&role).ok_or(TableError::MissingRole(role))?;
            profiles.push(profile);
        }

        let mut labels = Vec::with_capacity(doc.type_labels.len());
        let mut label_index = HashMap::new();
        for entry in doc.type_labels {
            let label = normalize(&entry.label);
            if label.is_empty() {
                return Err(TableError::EmptyLabel(entry.label));
            }
            if label_index.insert(label.clone(), entry.role).is_some() {
                return Err(TableError::DuplicateLabel(entry.label));
            }
            labels.push(TypeLabel {
                label,
                role: entry.role,
            });
        }

        let rules = doc
            .structural_rules
            .into_iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|pattern| StructuralRule {
                        pattern,
                        role: rule.role,
                    })
                    .map_err(|source| TableError::InvalidPattern {
                        pattern: rule.pattern,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            profiles,
            labels,
            label_index,
            rules,
        })
    }

    pub fn profiles(&self) -> &[RoleProfile] {
        &self.profiles
    }

    pub fn labels(&self) -> &[TypeLabel] {
        &self.labels
    }

    /// Exact lookup by normalized label.
    pub fn label_role(&self, normalized: &str) -> Option<Role> {
        self.label_index.get(normalized).copied()
    }

    pub fn rules(&self) -> &[StructuralRule] {
        &self.rules
    }
}

fn compile_profile(raw: RawRoleProfile) -> Result<RoleProfile, TableError> {
    let role = raw.role;
    if !raw.weight.is_finite() || raw.weight <= 0.0 {
        return Err(TableError::InvalidWeight {
            role,
            weight: raw.weight,
        });
    }
    if raw.page.trim().is_empty() {
        return Err(TableError::EmptyPage(role));
    }

    let compile = |phrases: Vec<String>| -> Result<Vec<PhraseMatcher>, TableError> {
        phrases
            .iter()
            .map(|phrase| {
                if phrase.trim().is_empty() {
                    return Err(TableError::EmptyPhrase(role));
                }
                PhraseMatcher::new(phrase).map_err(|source| TableError::InvalidPattern {
                    pattern: phrase.clone(),
                    source,
                })
            })
            .collect()
    };

    Ok(RoleProfile {
        role,
        page: raw.page.trim().trim_start_matches('/').to_string(),
        weight: raw.weight,
        keywords: compile(raw.keywords)?,
        boost_tools: compile(raw.boost_tools)?,
    })
}
