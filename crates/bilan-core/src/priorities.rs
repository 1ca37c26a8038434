//! Priority Extractor — ranks individual skills into remediation buckets.
//!
//! Works at skill granularity, not domain granularity: the output feeds the
//! "priorités", "gains rapides" and "points bloquants" report sections.

use std::cmp::Ordering;

use crate::model::{BilanDataset, Competency, ScoringPolicy};
use crate::results::{DomainScore, PriorityItem};

const TOP_PRIORITIES_CAP: usize = 5;
const QUICK_WINS_CAP: usize = 4;
const HIGH_RISK_CAP: usize = 3;

/// Friction at the top of the scale marks a severe blockage.
const SEVERE_FRICTION: u8 = 3;

/// Mastery one step below the top tier, eligible for a quick win.
const QUICK_WIN_MASTERY: u8 = 2;

/// The three capped priority lists.
#[derive(Debug, Clone, Default)]
pub struct PriorityBuckets {
    pub top_priorities: Vec<PriorityItem>,
    pub quick_wins: Vec<PriorityItem>,
    pub high_risk: Vec<PriorityItem>,
}

/// Extract prioritized skills from the dataset and the domain breakdown.
///
/// Ordering inside each list: ascending mastery, then descending policy
/// domain weight.
pub fn extract_priorities(
    dataset: &BilanDataset,
    domain_scores: &[DomainScore],
    policy: &ScoringPolicy,
) -> PriorityBuckets {
    let evaluated: Vec<(&str, &Competency)> = dataset
        .all_competencies()
        .filter(|(_, c)| c.is_evaluated())
        .collect();

    let attention_domains: Vec<&DomainScore> = domain_scores
        .iter()
        .filter(|d| d.priority.needs_attention())
        .collect();
    let is_attention = |domain: &str| attention_domains.iter().any(|d| d.domain == domain);
    let domain_score = |domain: &str| {
        domain_scores
            .iter()
            .find(|d| d.domain == domain)
            .map(|d| d.score)
            .unwrap_or(0)
    };

    let mut top: Vec<(&str, &Competency)> = evaluated
        .iter()
        .filter(|&&(domain, c)| c.mastery.is_some_and(|m| m <= 1) && is_attention(domain))
        .copied()
        .collect();
    sort_by_mastery_then_weight(&mut top, policy);
    let top_priorities = top
        .into_iter()
        .take(TOP_PRIORITIES_CAP)
        .map(|(domain, c)| PriorityItem {
            skill_id: Some(c.skill_id.clone()),
            skill_label: c.skill_label.clone(),
            domain: domain.to_string(),
            reason: format!(
                "Mastery {}/3 dans un domaine prioritaire ({domain} : {}%)",
                c.mastery.unwrap_or(0),
                domain_score(domain)
            ),
            impact: "Impact direct sur le score global — domaine à poids élevé".into(),
            exercise_type: Some(match c.error_types.first() {
                Some(tag) => format!("Exercices ciblés erreur \"{tag}\""),
                None => "Exercices de base".into(),
            }),
        })
        .collect();

    let mut wins: Vec<(&str, &Competency)> = evaluated
        .iter()
        .filter(|&&(_, c)| c.mastery == Some(QUICK_WIN_MASTERY) && c.friction.unwrap_or(0) <= 1)
        .copied()
        .collect();
    sort_by_mastery_then_weight(&mut wins, policy);
    let mut quick_wins: Vec<PriorityItem> = wins
        .into_iter()
        .map(|(domain, c)| PriorityItem {
            skill_id: Some(c.skill_id.clone()),
            skill_label: c.skill_label.clone(),
            domain: domain.to_string(),
            reason: format!(
                "Mastery {}/3 avec friction faible — gain rapide possible",
                c.mastery.unwrap_or(0)
            ),
            impact: "Consolidation rapide avec 2-3 exercices ciblés".into(),
            exercise_type: Some("Exercices de consolidation".into()),
        })
        .collect();
    // A mediocre-but-not-terrible mini-test is itself a quick win.
    let mini_score = dataset.exam_prep.mini_test.score;
    if (3..=4).contains(&mini_score) {
        quick_wins.push(PriorityItem {
            skill_id: None,
            skill_label: "Automatismes (sans calculatrice)".into(),
            domain: "exam_prep".into(),
            reason: format!("Mini-test {mini_score}/6 — marge de progression rapide"),
            impact: "Gain direct sur la partie automatismes de l'épreuve".into(),
            exercise_type: Some("Entraînement quotidien 10min sans calculatrice".into()),
        });
    }
    quick_wins.truncate(QUICK_WINS_CAP);

    let mut risk: Vec<(&str, &Competency)> = evaluated
        .iter()
        .filter(|&&(domain, c)| {
            (c.mastery == Some(0) || c.friction == Some(SEVERE_FRICTION)) && is_attention(domain)
        })
        .copied()
        .collect();
    sort_by_mastery_then_weight(&mut risk, policy);
    let high_risk = risk
        .into_iter()
        .take(HIGH_RISK_CAP)
        .map(|(domain, c)| PriorityItem {
            skill_id: Some(c.skill_id.clone()),
            skill_label: c.skill_label.clone(),
            domain: domain.to_string(),
            reason: if c.mastery == Some(0) {
                "Mastery 0/3 — compétence non acquise".into()
            } else {
                format!(
                    "Friction {}/3 — blocage sévère",
                    c.friction.unwrap_or(0)
                )
            },
            impact: "Point bloquant pour la progression — traitement prioritaire en séance".into(),
            exercise_type: Some("Reprise des fondamentaux + accompagnement individuel".into()),
        })
        .collect();

    PriorityBuckets {
        top_priorities,
        quick_wins,
        high_risk,
    }
}

fn sort_by_mastery_then_weight(items: &mut [(&str, &Competency)], policy: &ScoringPolicy) {
    items.sort_by(|&(da, ca), &(db, cb)| {
        let mastery = ca.mastery.unwrap_or(0).cmp(&cb.mastery.unwrap_or(0));
        if mastery != Ordering::Equal {
            return mastery;
        }
        policy
            .weight_for(db)
            .partial_cmp(&policy.weight_for(da))
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::score_domains;
    use crate::model::{CompetencyStatus, PolicyThresholds, Threshold};
    use std::collections::BTreeMap;

    fn policy() -> ScoringPolicy {
        let mut domain_weights = BTreeMap::new();
        domain_weights.insert("algebra".to_string(), 0.4);
        domain_weights.insert("analysis".to_string(), 0.3);
        domain_weights.insert("geometry".to_string(), 0.2);
        ScoringPolicy {
            domain_weights,
            thresholds: PolicyThresholds {
                confirmed: Threshold {
                    readiness: 60.0,
                    risk: 55.0,
                },
                conditional: Threshold {
                    readiness: 48.0,
                    risk: 70.0,
                },
            },
        }
    }

    fn comp(skill_id: &str, mastery: u8, friction: u8) -> Competency {
        Competency {
            skill_id: skill_id.into(),
            skill_label: skill_id.into(),
            mastery: Some(mastery),
            status: CompetencyStatus::Studied,
            confidence: Some(2),
            friction: Some(friction),
            error_types: vec![],
            evidence: String::new(),
        }
    }

    fn dataset(domains: &[(&str, Vec<Competency>)]) -> BilanDataset {
        let mut competencies = BTreeMap::new();
        for (name, items) in domains {
            competencies.insert(name.to_string(), items.clone());
        }
        BilanDataset {
            competencies,
            ..Default::default()
        }
    }

    fn buckets(data: &BilanDataset) -> PriorityBuckets {
        let scores = score_domains(&data.competencies);
        extract_priorities(data, &scores, &policy())
    }

    #[test]
    fn weak_skill_in_weak_domain_is_top_priority() {
        let data = dataset(&[(
            "algebra",
            vec![comp("alg_eq1", 1, 0), comp("alg_eq2", 0, 0)],
        )]);
        let b = buckets(&data);
        assert_eq!(b.top_priorities.len(), 2);
        // Ascending mastery: the 0 comes first.
        assert_eq!(b.top_priorities[0].skill_label, "alg_eq2");
        assert!(b.top_priorities[0].reason.contains("Mastery 0/3"));
    }

    #[test]
    fn strong_domain_contributes_no_top_priority() {
        let data = dataset(&[(
            "algebra",
            vec![comp("a1", 3, 0), comp("a2", 3, 0), comp("a3", 1, 0)],
        )]);
        // Domain score (3+3+1)/3 = 2.33/3 => 78, low priority tier.
        let b = buckets(&data);
        assert!(b.top_priorities.is_empty());
    }

    #[test]
    fn quick_wins_require_low_friction() {
        let data = dataset(&[(
            "algebra",
            vec![comp("smooth", 2, 0), comp("stuck", 2, 3), comp("low", 1, 0)],
        )]);
        let b = buckets(&data);
        let labels: Vec<&str> = b.quick_wins.iter().map(|p| p.skill_label.as_str()).collect();
        assert!(labels.contains(&"smooth"));
        assert!(!labels.contains(&"stuck"));
        assert!(!labels.contains(&"low"));
    }

    #[test]
    fn mediocre_mini_test_adds_automatisms_quick_win() {
        let mut data = dataset(&[("algebra", vec![comp("a1", 3, 0)])]);
        data.exam_prep.mini_test.score = 4;
        let b = buckets(&data);
        assert!(b
            .quick_wins
            .iter()
            .any(|p| p.skill_label.contains("Automatismes")));

        data.exam_prep.mini_test.score = 6;
        let b = buckets(&data);
        assert!(!b
            .quick_wins
            .iter()
            .any(|p| p.skill_label.contains("Automatismes")));
    }

    #[test]
    fn high_risk_catches_zero_mastery_and_severe_friction() {
        let data = dataset(&[(
            "algebra",
            vec![comp("zero", 0, 0), comp("blocked", 1, 3), comp("fine", 1, 1)],
        )]);
        let b = buckets(&data);
        let labels: Vec<&str> = b.high_risk.iter().map(|p| p.skill_label.as_str()).collect();
        assert_eq!(labels, vec!["zero", "blocked"]);
        assert!(b.high_risk[1].reason.contains("Friction 3/3"));
    }

    #[test]
    fn lists_are_capped() {
        let many: Vec<Competency> = (0..10).map(|i| comp(&format!("s{i}"), 0, 3)).collect();
        let data = dataset(&[("algebra", many)]);
        let b = buckets(&data);
        assert!(b.top_priorities.len() <= 5);
        assert!(b.high_risk.len() <= 3);
        assert!(b.quick_wins.len() <= 4);
    }

    #[test]
    fn equal_mastery_orders_by_descending_weight() {
        let data = dataset(&[
            ("algebra", vec![comp("alg", 1, 0), comp("alg2", 0, 0)]),
            ("analysis", vec![comp("ana", 1, 0), comp("ana2", 0, 0)]),
            ("geometry", vec![comp("geo", 1, 0), comp("geo2", 0, 0)]),
        ]);
        let b = buckets(&data);
        let mastery_one: Vec<&str> = b
            .top_priorities
            .iter()
            .filter(|p| p.reason.contains("Mastery 1/3"))
            .map(|p| p.domain.as_str())
            .collect();
        // algebra (0.4) before analysis (0.3) before geometry (0.2).
        assert_eq!(mastery_one, vec!["algebra", "analysis"]);
        let mastery_zero: Vec<&str> = b
            .top_priorities
            .iter()
            .filter(|p| p.reason.contains("Mastery 0/3"))
            .map(|p| p.domain.as_str())
            .collect();
        assert_eq!(mastery_zero, vec!["algebra", "analysis", "geometry"]);
    }

    #[test]
    fn exercise_type_references_first_error_tag() {
        let mut weak = comp("alg_eq1", 1, 0);
        weak.error_types = vec!["signe".into(), "calcul".into()];
        let data = dataset(&[("algebra", vec![weak, comp("alg_eq2", 0, 0)])]);
        let b = buckets(&data);
        let item = b
            .top_priorities
            .iter()
            .find(|p| p.skill_label == "alg_eq1")
            .unwrap();
        assert_eq!(
            item.exercise_type.as_deref(),
            Some("Exercices ciblés erreur \"signe\"")
        );
    }
}
