//! Composite Index Aggregator — headline indices and the pallier decision.

use crate::model::{BilanDataset, ExamPrep, Feeling, ScoringPolicy};
use crate::results::{CoverageProgramme, DomainPriority, DomainScore, Recommendation};

/// Readiness blend weights: mastery / coverage / exam readiness.
const READINESS_WEIGHTS: (f64, f64, f64) = (0.50, 0.15, 0.35);

/// Risk blend weights: domain tiers / stress / friction.
const RISK_WEIGHTS: (f64, f64, f64) = (0.50, 0.30, 0.20);

/// High-priority domains contribute half their weight to tier risk.
const HIGH_TIER_RISK_FACTOR: f64 = 0.5;

/// Friction at or above this mark (0-3 scale) signals a blockage.
pub const HIGH_FRICTION_CUTOFF: u8 = 2;

/// Headline indices plus the decision and its audit trail.
#[derive(Debug, Clone)]
pub struct CompositeIndices {
    pub mastery_index: u8,
    pub coverage_index: u8,
    pub exam_readiness_index: u8,
    pub readiness_score: u8,
    pub risk_index: u8,
    pub recommendation: Recommendation,
    pub recommendation_message: String,
    pub justification: String,
    pub upgrade_conditions: Vec<String>,
}

/// Combine domain scores, coverage, exam-prep signals and the prerequisite
/// penalty into the composite indices and the three-state recommendation.
pub fn aggregate_indices(
    dataset: &BilanDataset,
    policy: &ScoringPolicy,
    domain_scores: &[DomainScore],
    coverage: Option<&CoverageProgramme>,
    prerequisite_penalty: f64,
) -> CompositeIndices {
    let mastery_index = mastery_index(policy, domain_scores);
    let coverage_index = coverage_index(coverage, domain_scores);
    let exam_readiness_index = exam_readiness_index(&dataset.exam_prep);

    let (wm, wc, we) = READINESS_WEIGHTS;
    let readiness = wm * f64::from(mastery_index)
        + wc * f64::from(coverage_index)
        + we * f64::from(exam_readiness_index)
        - prerequisite_penalty;
    let readiness_score = readiness.clamp(0.0, 100.0).round() as u8;

    let risk_index = risk_index(dataset, policy, domain_scores);

    let (recommendation, recommendation_message) =
        recommend(readiness_score, risk_index, policy);
    let (justification, upgrade_conditions) = justify(
        mastery_index,
        coverage_index,
        exam_readiness_index,
        readiness_score,
        risk_index,
        recommendation,
        policy,
    );

    CompositeIndices {
        mastery_index,
        coverage_index,
        exam_readiness_index,
        readiness_score,
        risk_index,
        recommendation,
        recommendation_message,
        justification,
        upgrade_conditions,
    }
}

/// Policy-weighted mean of domain scores over domains with evaluated data.
fn mastery_index(policy: &ScoringPolicy, domain_scores: &[DomainScore]) -> u8 {
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for ds in domain_scores.iter().filter(|d| d.evaluated_count > 0) {
        let w = policy.weight_for(&ds.domain);
        weighted_sum += w * f64::from(ds.score);
        weight_sum += w;
    }
    if weight_sum > 0.0 {
        (weighted_sum / weight_sum).round() as u8
    } else {
        0
    }
}

/// Program-coverage reading when chapter data exists, otherwise the share
/// of evaluated competencies over all competencies.
fn coverage_index(coverage: Option<&CoverageProgramme>, domain_scores: &[DomainScore]) -> u8 {
    if let Some(cp) = coverage {
        return (cp.seen_chapter_ratio * 100.0).round() as u8;
    }
    let total: usize = domain_scores.iter().map(|d| d.total_count).sum();
    let evaluated: usize = domain_scores.iter().map(|d| d.evaluated_count).sum();
    if total == 0 {
        0
    } else {
        (evaluated as f64 / total as f64 * 100.0).round() as u8
    }
}

/// Automatisms + time + writing + stress, blended 40/20/25/15.
fn exam_readiness_index(exam_prep: &ExamPrep) -> u8 {
    let mini_test = f64::from(exam_prep.mini_test.score.min(6)) / 6.0 * 100.0;
    let time = if exam_prep.mini_test.completed_in_time {
        100.0
    } else {
        40.0
    };
    let ratings = &exam_prep.self_ratings;
    let writing = (f64::from(ratings.redaction.min(3)) + f64::from(ratings.justifications.min(3)))
        / 2.0
        / 3.0
        * 100.0;
    // Inverted: maximum stress means zero readiness on this component.
    let stress = f64::from(3 - ratings.stress.min(3)) / 3.0 * 100.0;

    let readiness = 0.40 * mini_test + 0.20 * time + 0.25 * writing + 0.15 * stress;
    readiness.clamp(0.0, 100.0).round() as u8
}

/// Inverse-weighted blend: policy-weight share of critical/high domains,
/// stress signal, and friction signal.
fn risk_index(dataset: &BilanDataset, policy: &ScoringPolicy, domain_scores: &[DomainScore]) -> u8 {
    let mut risk_weight = 0.0;
    let mut total_weight = 0.0;
    for ds in domain_scores.iter().filter(|d| d.evaluated_count > 0) {
        let w = policy.weight_for(&ds.domain);
        total_weight += w;
        match ds.priority {
            DomainPriority::Critical => risk_weight += w,
            DomainPriority::High => risk_weight += w * HIGH_TIER_RISK_FACTOR,
            _ => {}
        }
    }
    let tier_risk = if total_weight > 0.0 {
        risk_weight / total_weight * 100.0
    } else {
        0.0
    };

    let stress_scaled = f64::from(dataset.exam_prep.self_ratings.stress.min(3)) / 3.0 * 100.0;
    let feeling_risk = match dataset.exam_prep.signals.feeling {
        Feeling::Panic => 100.0,
        Feeling::Unsure => 60.0,
        Feeling::Neutral => 40.0,
        Feeling::Ok => 20.0,
    };
    let stress_risk = 0.6 * stress_scaled + 0.4 * feeling_risk;

    let evaluated: Vec<_> = dataset
        .all_competencies()
        .filter(|(_, c)| c.is_evaluated())
        .collect();
    let friction_risk = if evaluated.is_empty() {
        0.0
    } else {
        let high = evaluated
            .iter()
            .filter(|(_, c)| c.friction.is_some_and(|f| f >= HIGH_FRICTION_CUTOFF))
            .count();
        high as f64 / evaluated.len() as f64 * 100.0
    };

    let (wt, ws, wf) = RISK_WEIGHTS;
    (wt * tier_risk + ws * stress_risk + wf * friction_risk)
        .clamp(0.0, 100.0)
        .round() as u8
}

/// Three-state classifier; the confirmed pair is checked first.
fn recommend(readiness: u8, risk: u8, policy: &ScoringPolicy) -> (Recommendation, String) {
    let t = &policy.thresholds;
    if f64::from(readiness) >= t.confirmed.readiness && f64::from(risk) <= t.confirmed.risk {
        (
            Recommendation::Pallier2Confirmed,
            "Profil compatible avec le Pallier 2 Excellence".to_string(),
        )
    } else if f64::from(readiness) >= t.conditional.readiness
        && f64::from(risk) <= t.conditional.risk
    {
        (
            Recommendation::Pallier2Conditional,
            "Pallier 2 possible avec accompagnement renforcé".to_string(),
        )
    } else {
        (
            Recommendation::Pallier1,
            "Le Pallier 1 Fondamentaux est recommandé pour consolider les bases".to_string(),
        )
    }
}

/// Audit-friendly justification plus the gaps that must close to move up.
fn justify(
    mastery: u8,
    coverage: u8,
    exam_readiness: u8,
    readiness: u8,
    risk: u8,
    recommendation: Recommendation,
    policy: &ScoringPolicy,
) -> (String, Vec<String>) {
    let t = &policy.thresholds;
    let mut parts: Vec<String> = Vec::new();
    let mut upgrade_conditions: Vec<String> = Vec::new();

    match recommendation {
        Recommendation::Pallier2Confirmed => {
            parts.push(format!(
                "MasteryIndex ({mastery}%) et ExamReadinessIndex ({exam_readiness}%) au-dessus des seuils."
            ));
            if coverage < 70 {
                parts.push(format!(
                    "Attention : couverture programme à {coverage}% — chapitres non abordés à planifier."
                ));
            }
        }
        Recommendation::Pallier2Conditional => {
            if f64::from(readiness) < t.confirmed.readiness {
                parts.push(format!(
                    "ReadinessScore ({readiness}%) sous le seuil confirmé ({}%).",
                    t.confirmed.readiness
                ));
                upgrade_conditions.push(format!(
                    "Atteindre {}% de ReadinessScore (actuellement {readiness}%)",
                    t.confirmed.readiness
                ));
            }
            if f64::from(risk) > t.confirmed.risk {
                parts.push(format!(
                    "RiskIndex ({risk}%) au-dessus du seuil confirmé ({}%).",
                    t.confirmed.risk
                ));
                upgrade_conditions.push(format!(
                    "Réduire le RiskIndex sous {}% (actuellement {risk}%)",
                    t.confirmed.risk
                ));
            }
            parts.push("Pallier 2 possible avec accompagnement renforcé.".to_string());
        }
        Recommendation::Pallier1 => {
            parts.push(
                "Profil nécessitant une consolidation des fondamentaux avant le Pallier 2."
                    .to_string(),
            );
            if mastery < 40 {
                upgrade_conditions.push(format!(
                    "Améliorer le MasteryIndex au-dessus de 40% (actuellement {mastery}%)"
                ));
            }
            if exam_readiness < 40 {
                upgrade_conditions.push(format!(
                    "Améliorer l'ExamReadinessIndex au-dessus de 40% (actuellement {exam_readiness}%)"
                ));
            }
        }
    }

    (parts.join(" "), upgrade_conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::score_domains;
    use crate::model::{
        Competency, CompetencyStatus, MiniTest, PolicyThresholds, SelfRatings, Signals, Threshold,
    };
    use std::collections::BTreeMap;

    fn policy() -> ScoringPolicy {
        let mut domain_weights = BTreeMap::new();
        domain_weights.insert("algebra".to_string(), 0.5);
        domain_weights.insert("analysis".to_string(), 0.5);
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

    fn dataset(alg_mastery: u8, ana_mastery: u8) -> BilanDataset {
        let mut competencies = BTreeMap::new();
        competencies.insert(
            "algebra".to_string(),
            vec![comp("a1", alg_mastery, 0), comp("a2", alg_mastery, 0)],
        );
        competencies.insert(
            "analysis".to_string(),
            vec![comp("b1", ana_mastery, 0), comp("b2", ana_mastery, 0)],
        );
        BilanDataset {
            competencies,
            exam_prep: ExamPrep {
                mini_test: MiniTest {
                    score: 5,
                    time_used_minutes: 12,
                    completed_in_time: true,
                },
                self_ratings: SelfRatings {
                    redaction: 2,
                    justifications: 2,
                    stress: 1,
                    ..Default::default()
                },
                signals: Signals {
                    verified_answers: true,
                    feeling: Feeling::Ok,
                },
            },
            ..Default::default()
        }
    }

    fn indices_for(data: &BilanDataset, penalty: f64) -> CompositeIndices {
        let scores = score_domains(&data.competencies);
        aggregate_indices(data, &policy(), &scores, None, penalty)
    }

    #[test]
    fn strong_profile_is_confirmed() {
        let data = dataset(3, 3);
        let out = indices_for(&data, 0.0);
        assert_eq!(out.mastery_index, 100);
        assert_eq!(out.recommendation, Recommendation::Pallier2Confirmed);
        assert!(out.justification.contains("MasteryIndex"));
    }

    #[test]
    fn weak_profile_falls_to_pallier1() {
        let mut data = dataset(0, 0);
        data.exam_prep.mini_test.score = 1;
        data.exam_prep.mini_test.completed_in_time = false;
        data.exam_prep.self_ratings.stress = 3;
        data.exam_prep.self_ratings.redaction = 0;
        data.exam_prep.self_ratings.justifications = 0;
        data.exam_prep.signals.feeling = Feeling::Panic;
        let out = indices_for(&data, 0.0);
        assert_eq!(out.recommendation, Recommendation::Pallier1);
        assert!(!out.upgrade_conditions.is_empty());
    }

    #[test]
    fn confirmed_checked_before_conditional() {
        // Readiness above both thresholds with low risk must land confirmed,
        // never conditional.
        let data = dataset(3, 3);
        let out = indices_for(&data, 0.0);
        assert!(f64::from(out.readiness_score) >= 60.0);
        assert_eq!(out.recommendation, Recommendation::Pallier2Confirmed);
    }

    #[test]
    fn penalty_lowers_readiness_monotonically() {
        let data = dataset(2, 2);
        let without = indices_for(&data, 0.0);
        let with = indices_for(&data, 6.0);
        assert_eq!(
            f64::from(without.readiness_score) - f64::from(with.readiness_score),
            6.0
        );
    }

    #[test]
    fn readiness_clamped_to_zero() {
        let mut data = dataset(0, 0);
        data.exam_prep = ExamPrep::default();
        data.exam_prep.mini_test.completed_in_time = false;
        let out = indices_for(&data, 100.0);
        assert_eq!(out.readiness_score, 0);
    }

    #[test]
    fn exam_readiness_formula_known_value() {
        // mini-test 3/6 (50), in time (100), writing 1.5/3 (50), stress 0 (100):
        // 0.4*50 + 0.2*100 + 0.25*50 + 0.15*100 = 67.5 -> 68
        let prep = ExamPrep {
            mini_test: MiniTest {
                score: 3,
                time_used_minutes: 10,
                completed_in_time: true,
            },
            self_ratings: SelfRatings {
                redaction: 1,
                justifications: 2,
                stress: 0,
                ..Default::default()
            },
            signals: Signals::default(),
        };
        assert_eq!(exam_readiness_index(&prep), 68);
    }

    #[test]
    fn coverage_index_prefers_programme_reading() {
        let data = dataset(2, 2);
        let scores = score_domains(&data.competencies);
        let cp = CoverageProgramme {
            total_chapters: 10,
            seen_chapters: 3,
            in_progress_chapters: 1,
            seen_chapter_ratio: 0.4,
            evaluated_skill_ratio: 1.0,
        };
        let out = aggregate_indices(&data, &policy(), &scores, Some(&cp), 0.0);
        assert_eq!(out.coverage_index, 40);
    }

    #[test]
    fn coverage_index_fallback_uses_competency_counts() {
        let mut data = dataset(2, 2);
        // Make one of four competencies not studied: 3/4 evaluated.
        data.competencies.get_mut("algebra").unwrap()[0]
            .set_status(CompetencyStatus::NotStudied);
        let scores = score_domains(&data.competencies);
        let out = aggregate_indices(&data, &policy(), &scores, None, 0.0);
        assert_eq!(out.coverage_index, 75);
    }

    #[test]
    fn critical_domains_raise_risk() {
        let calm = dataset(3, 3);
        let weak = dataset(0, 3);
        let calm_out = indices_for(&calm, 0.0);
        let weak_out = indices_for(&weak, 0.0);
        assert!(weak_out.risk_index > calm_out.risk_index);
    }

    #[test]
    fn friction_raises_risk() {
        let mut data = dataset(2, 2);
        for c in data.competencies.get_mut("algebra").unwrap() {
            c.friction = Some(3);
        }
        let baseline = indices_for(&dataset(2, 2), 0.0);
        let frictioned = indices_for(&data, 0.0);
        assert!(frictioned.risk_index > baseline.risk_index);
    }
}
