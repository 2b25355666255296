//! Decision aggregator — explicit type label first, keyword scoring as the fallback.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::classify::destinations::Destinations;
use crate::classify::keyword_scorer::{score_text, Thresholds};
use crate::classify::role::Role;
use crate::classify::table::RoutingTable;
use crate::classify::type_resolver::resolve_type;

pub const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

#[derive(Debug, Clone, Default)]
pub struct ClassificationInput {
    pub title: String,
    pub company: String,
    pub description: String,
    pub type_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Type,
    Keywords,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub top1: (Role, f64),
    pub top2: (Role, f64),
    pub scores: BTreeMap<Role, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub role: Role,
    pub method: Method,
    pub confident: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

/// Immutable after construction; shared by every request handler.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: RoutingTable,
    destinations: Destinations,
    thresholds: Thresholds,
    max_input_chars: usize,
}

impl Classifier {
    pub fn new(
        table: RoutingTable,
        destinations: Destinations,
        thresholds: Thresholds,
        max_input_chars: usize,
    ) -> Self {
        Self {
            table,
            destinations,
            thresholds,
            max_input_chars,
        }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn classify(&self, input: &ClassificationInput) -> Classification {
        let classification = match resolve_type(&self.table, input.type_label.as_deref()) {
            Some((role, label_match)) => {
                debug!(%role, ?label_match, "type label resolved");
                Classification {
                    role,
                    method: Method::Type,
                    confident: true,
                    url: self.destinations.url_for(role).to_string(),
                    diagnostics: None,
                }
            }
            None => {
                let text = self.free_text(input);
                let verdict = score_text(&self.table, &text, &self.thresholds);
                let top1 = verdict.top1();
                Classification {
                    role: top1.0,
                    method: Method::Keywords,
                    confident: verdict.confident,
                    url: self.destinations.url_for(top1.0).to_string(),
                    diagnostics: Some(Diagnostics {
                        top1,
                        top2: verdict.top2(),
                        scores: verdict.scores(),
                    }),
                }
            }
        };

        info!(
            role = %classification.role,
            method = ?classification.method,
            confident = classification.confident,
            "classified job listing"
        );

        classification
    }

    /// `title company description`, capped at `max_input_chars` characters.
    fn free_text(&self, input: &ClassificationInput) -> String {
        let joined = [
            input.title.as_str(),
            input.company.as_str(),
            input.description.as_str(),
        ]
        .join(" ");

        match joined.char_indices().nth(self.max_input_chars) {
            Some((cut, _)) => joined[..cut].to_string(),
            None => joined,
        }
    }
}
