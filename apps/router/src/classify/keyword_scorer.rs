//! Keyword Scorer — weighted whole-word evidence for every role, plus a confidence verdict.
//!
//! Algorithm:
//! 1. For each role profile:
//!    score = weight × (Σ keyword hits × 1.0 + Σ boost-tool hits × 1.5)
//! 2. Rank roles by score, descending. The sort is stable over declaration order,
//!    so equal scores resolve to the earlier-declared role.
//! 3. Confident iff top1 ≥ min_score AND top1 − top2 ≥ margin.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::classify::role::Role;
use crate::classify::table::RoutingTable;

pub const KEYWORD_HIT: f64 = 1.0;
pub const TOOL_HIT: f64 = 1.5;

/// Confidence thresholds for a keyword-derived result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub min_score: f64,
    pub margin: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_score: 2.0,
            margin: 1.0,
        }
    }
}

impl Thresholds {
    pub fn is_confident(&self, top1: f64, top2: f64) -> bool {
        top1 >= self.min_score && top1 - top2 >= self.margin
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordVerdict {
    /// All roles, best first.
    pub ranked: Vec<(Role, f64)>,
    pub confident: bool,
}

impl KeywordVerdict {
    pub fn top1(&self) -> (Role, f64) {
        self.ranked
            .first()
            .copied()
            .unwrap_or((Role::ALL[0], 0.0))
    }

    pub fn top2(&self) -> (Role, f64) {
        self.ranked
            .get(1)
            .copied()
            .unwrap_or((Role::ALL[1], 0.0))
    }

    pub fn scores(&self) -> BTreeMap<Role, f64> {
        self.ranked.iter().copied().collect()
    }
}

/// Raw per-role scores, in declaration order. `text` must already be lowercased.
pub fn score_roles(table: &RoutingTable, text: &str) -> Vec<(Role, f64)> {
    table
        .profiles()
        .iter()
        .map(|profile| {
            let keyword_hits: usize = profile.keywords.iter().map(|k| k.count(text)).sum();
            let tool_hits: usize = profile.boost_tools.iter().map(|t| t.count(text)).sum();
            let score = profile.weight * (keyword_hits as f64 * KEYWORD_HIT)
                + profile.weight * (tool_hits as f64 * TOOL_HIT);
            (profile.role, score)
        })
        .collect()
}

/// Stable sort, best first.
pub fn rank(mut scores: Vec<(Role, f64)>) -> Vec<(Role, f64)> {
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    scores
}

pub fn score_text(table: &RoutingTable, text: &str, thresholds: &Thresholds) -> KeywordVerdict {
    let lowered = text.to_lowercase();
    let ranked = rank(score_roles(table, &lowered));

    let mut verdict = KeywordVerdict {
        ranked,
        confident: false,
    };
    let (role1, score1) = verdict.top1();
    let (role2, score2) = verdict.top2();
    verdict.confident = thresholds.is_confident(score1, score2);

    debug!(
        top1 = %role1,
        score1,
        top2 = %role2,
        score2,
        confident = verdict.confident,
        "keyword scores"
    );

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Each role gets one distinctive keyword; `overrides` patches individual profiles.
    fn test_table(overrides: &[(Role, serde_json::Value)]) -> RoutingTable {
        let roles: Vec<_> = Role::ALL
            .iter()
            .map(|role| {
                let mut profile = json!({
                    "role": role,
                    "page": "x.html",
                    "keywords": [format!("kw{}", *role as usize)]
                });
                for (target, patch) in overrides {
                    if target == role {
                        for (k, v) in patch.as_object().unwrap() {
                            profile[k] = v.clone();
                        }
                    }
                }
                profile
            })
            .collect();
        RoutingTable::from_json(&json!({ "roles": roles, "type_labels": [] }).to_string())
            .unwrap()
    }

    fn score_of(scores: &[(Role, f64)], role: Role) -> f64 {
        scores.iter().find(|(r, _)| *r == role).unwrap().1
    }

    #[test]
    fn test_single_keyword_hit_scores_weight() {
        let table = test_table(&[(Role::MechDesigner, json!({ "weight": 1.25 }))]);
        let scores = score_roles(&table, "we need kw3 today");
        for (role, score) in &scores {
            if *role == Role::MechDesigner {
                assert!((score - 1.25).abs() < f64::EPSILON);
            } else {
                assert_eq!(*score, 0.0, "{role}");
            }
        }
    }

    #[test]
    fn test_boost_tool_scores_one_and_a_half() {
        let table = test_table(&[(Role::PcbDesigner, json!({ "boost_tools": ["altium"] }))]);
        let scores = score_roles(&table, "altium and altium again, plus kw4");
        assert!((score_of(&scores, Role::PcbDesigner) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weight_multiplies_keywords_and_tools() {
        let table = test_table(&[(
            Role::ProductManager,
            json!({ "weight": 2.0, "keywords": ["roadmap"], "boost_tools": ["jira"] }),
        )]);
        let scores = score_roles(&table, "roadmap jira");
        assert!((score_of(&scores, Role::ProductManager) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scanner_does_not_count_for_can() {
        let table = test_table(&[(
            Role::IntegrationEngineer,
            json!({ "keywords": ["can"], "boost_tools": ["can"] }),
        )]);
        let scores = score_roles(&table, "barcode scanner and cannula");
        assert_eq!(score_of(&scores, Role::IntegrationEngineer), 0.0);

        let scores = score_roles(&table, "scanner on the can network");
        assert!((score_of(&scores, Role::IntegrationEngineer) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_multi_word_phrase_respects_boundaries() {
        let table = test_table(&[(Role::FirmwareDeveloper, json!({ "keywords": ["bare metal"] }))]);
        assert_eq!(
            score_of(&score_roles(&table, "rebare metals"), Role::FirmwareDeveloper),
            0.0
        );
        assert_eq!(
            score_of(&score_roles(&table, "bare metal c"), Role::FirmwareDeveloper),
            1.0
        );
    }

    #[test]
    fn test_overlapping_phrases_count_independently() {
        let table = RoutingTable::embedded().unwrap();
        let scores = score_roles(&table, "system integration");
        // "integration" and "system integration" both hit.
        assert_eq!(score_of(&scores, Role::IntegrationEngineer), 2.0);
    }

    #[test]
    fn test_score_text_is_case_insensitive() {
        let table = RoutingTable::embedded().unwrap();
        let verdict = score_text(&table, "FIRMWARE, Embedded, RTOS", &Thresholds::default());
        assert_eq!(verdict.top1(), (Role::FirmwareDeveloper, 3.0));
        assert!(verdict.confident);
    }

    #[test]
    fn test_confidence_thresholds() {
        let t = Thresholds::default();
        assert!(t.is_confident(3.0, 1.0));
        assert!(!t.is_confident(2.5, 1.8));
        assert!(!t.is_confident(1.0, 0.0));
        assert!(t.is_confident(2.0, 1.0));
    }

    #[test]
    fn test_tunable_thresholds() {
        let lenient = Thresholds {
            min_score: 1.0,
            margin: 0.5,
        };
        assert!(lenient.is_confident(1.0, 0.0));
        assert!(!lenient.is_confident(1.0, 0.75));
    }

    #[test]
    fn test_winner_and_verdict_from_scores() {
        let table = test_table(&[]);
        // kw0 → DomainExpert ×3, kw1 → FirmwareDeveloper ×1
        let verdict = score_text(&table, "kw0 kw0 kw0 kw1", &Thresholds::default());
        assert_eq!(verdict.top1(), (Role::DomainExpert, 3.0));
        assert_eq!(verdict.top2(), (Role::FirmwareDeveloper, 1.0));
        assert!(verdict.confident);

        // below min_score
        let verdict = score_text(&table, "kw5", &Thresholds::default());
        assert_eq!(verdict.top1(), (Role::ProcurementSpecialist, 1.0));
        assert!(!verdict.confident);
    }

    #[test]
    fn test_tie_resolves_to_declaration_order() {
        let table = test_table(&[]);
        // ProductManager (kw7) and PcbDesigner (kw4) tie at 2.0
        let verdict = score_text(&table, "kw7 kw4 kw7 kw4", &Thresholds::default());
        assert_eq!(verdict.top1(), (Role::PcbDesigner, 2.0));
        assert_eq!(verdict.top2(), (Role::ProductManager, 2.0));
        assert!(!verdict.confident);
    }

    #[test]
    fn test_all_zero_falls_back_to_first_role() {
        let table = RoutingTable::embedded().unwrap();
        let verdict = score_text(&table, "", &Thresholds::default());
        assert_eq!(verdict.top1(), (Role::DomainExpert, 0.0));
        assert_eq!(verdict.top2(), (Role::FirmwareDeveloper, 0.0));
        assert!(!verdict.confident);
        assert_eq!(verdict.scores().len(), Role::ALL.len());
        assert!(verdict.scores().values().all(|s| *s == 0.0));
    }

    #[test]
    fn test_ranked_is_descending() {
        let table = test_table(&[]);
        let verdict = score_text(&table, "kw2 kw6 kw6 kw1 kw6", &Thresholds::default());
        let scores: Vec<f64> = verdict.ranked.iter().map(|(_, s)| *s).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(verdict.top1().0, Role::ProductArchitect);
    }
}
