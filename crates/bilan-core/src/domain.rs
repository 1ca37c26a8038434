//! Domain Scorer — per-domain statistics from raw competencies.

use std::collections::BTreeMap;

use crate::model::{Competency, CompetencyStatus};
use crate::results::{DomainPriority, DomainScore};

/// Mastery values at or below this mark count as gaps.
pub const LOW_MASTERY_CUTOFF: u8 = 1;

/// Top of the mastery self-assessment scale.
pub const MASTERY_SCALE: f64 = 3.0;

/// How many dominant error tags a domain reports.
const DOMINANT_ERROR_COUNT: usize = 2;

/// Priority tier for a domain score.
pub fn priority_for_score(score: u8) -> DomainPriority {
    match score {
        0..=34 => DomainPriority::Critical,
        35..=49 => DomainPriority::High,
        50..=69 => DomainPriority::Medium,
        _ => DomainPriority::Low,
    }
}

/// Compute one [`DomainScore`] per domain present in the dataset, in
/// domain-id order.
///
/// A domain with zero evaluated competencies scores 0 without error.
pub fn score_domains(competencies: &BTreeMap<String, Vec<Competency>>) -> Vec<DomainScore> {
    competencies
        .iter()
        .map(|(domain, items)| score_domain(domain, items))
        .collect()
}

fn score_domain(domain: &str, items: &[Competency]) -> DomainScore {
    let evaluated: Vec<&Competency> = items.iter().filter(|c| c.is_evaluated()).collect();
    let not_studied_count = items
        .iter()
        .filter(|c| c.status == CompetencyStatus::NotStudied)
        .count();
    let unknown_count = items
        .iter()
        .filter(|c| c.status == CompetencyStatus::Unknown)
        .count();

    let score = if evaluated.is_empty() {
        0
    } else {
        let mean: f64 = evaluated
            .iter()
            .map(|c| f64::from(c.mastery.unwrap_or(0)))
            .sum::<f64>()
            / evaluated.len() as f64;
        (mean / MASTERY_SCALE * 100.0).round() as u8
    };

    let gaps = evaluated
        .iter()
        .filter(|c| c.mastery.is_some_and(|m| m <= LOW_MASTERY_CUTOFF))
        .map(|c| c.skill_label.clone())
        .collect();

    DomainScore {
        domain: domain.to_string(),
        score,
        evaluated_count: evaluated.len(),
        total_count: items.len(),
        not_studied_count,
        unknown_count,
        gaps,
        dominant_errors: dominant_errors(items),
        priority: priority_for_score(score),
    }
}

/// Most frequent error tags across a domain; ties keep first-seen order.
fn dominant_errors(items: &[Competency]) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for tag in items.iter().flat_map(|c| c.error_types.iter()) {
        match counts.iter_mut().find(|(t, _)| *t == tag.as_str()) {
            Some((_, n)) => *n += 1,
            None => counts.push((tag, 1)),
        }
    }
    // Stable sort preserves first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(DOMINANT_ERROR_COUNT)
        .map(|(t, _)| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(skill_id: &str, mastery: Option<u8>, status: CompetencyStatus) -> Competency {
        Competency {
            skill_id: skill_id.into(),
            skill_label: skill_id.into(),
            mastery,
            status,
            confidence: mastery.map(|_| 2),
            friction: mastery.map(|_| 1),
            error_types: vec![],
            evidence: String::new(),
        }
    }

    fn dataset(items: Vec<Competency>) -> BTreeMap<String, Vec<Competency>> {
        let mut map = BTreeMap::new();
        map.insert("algebra".to_string(), items);
        map
    }

    #[test]
    fn not_studied_counted_separately_from_evaluated() {
        let scores = score_domains(&dataset(vec![
            comp("s1", None, CompetencyStatus::NotStudied),
            comp("s2", None, CompetencyStatus::NotStudied),
            comp("s3", Some(3), CompetencyStatus::Studied),
        ]));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].not_studied_count, 2);
        assert_eq!(scores[0].evaluated_count, 1);
        assert_eq!(scores[0].total_count, 3);
    }

    #[test]
    fn unknown_counted_separately() {
        let scores = score_domains(&dataset(vec![
            comp("s1", None, CompetencyStatus::Unknown),
            comp("s2", Some(2), CompetencyStatus::Studied),
        ]));
        assert_eq!(scores[0].unknown_count, 1);
        assert_eq!(scores[0].evaluated_count, 1);
    }

    #[test]
    fn zero_evaluated_scores_zero_and_critical() {
        let scores = score_domains(&dataset(vec![
            comp("s1", None, CompetencyStatus::NotStudied),
            comp("s2", None, CompetencyStatus::Unknown),
        ]));
        assert_eq!(scores[0].score, 0);
        assert_eq!(scores[0].priority, DomainPriority::Critical);
    }

    #[test]
    fn score_is_mean_mastery_rescaled() {
        // (1 + 2) / 2 = 1.5 of 3 => 50
        let scores = score_domains(&dataset(vec![
            comp("s1", Some(1), CompetencyStatus::Studied),
            comp("s2", Some(2), CompetencyStatus::Studied),
        ]));
        assert_eq!(scores[0].score, 50);
        assert_eq!(scores[0].priority, DomainPriority::Medium);
    }

    #[test]
    fn full_mastery_scores_100() {
        let scores = score_domains(&dataset(vec![comp("s1", Some(3), CompetencyStatus::Studied)]));
        assert_eq!(scores[0].score, 100);
        assert_eq!(scores[0].priority, DomainPriority::Low);
    }

    #[test]
    fn gaps_respect_low_mastery_cutoff() {
        let scores = score_domains(&dataset(vec![
            comp("weak", Some(1), CompetencyStatus::Studied),
            comp("zero", Some(0), CompetencyStatus::Studied),
            comp("fine", Some(2), CompetencyStatus::Studied),
        ]));
        assert_eq!(scores[0].gaps, vec!["weak".to_string(), "zero".to_string()]);
    }

    #[test]
    fn gaps_exclude_unevaluated_records() {
        let scores = score_domains(&dataset(vec![comp("ns", None, CompetencyStatus::NotStudied)]));
        assert!(scores[0].gaps.is_empty());
    }

    #[test]
    fn dominant_errors_break_ties_by_first_seen() {
        let mut a = comp("s1", Some(2), CompetencyStatus::Studied);
        a.error_types = vec!["signe".into(), "calcul".into()];
        let mut b = comp("s2", Some(2), CompetencyStatus::Studied);
        b.error_types = vec!["calcul".into(), "redaction".into()];
        let scores = score_domains(&dataset(vec![a, b]));
        // calcul appears twice; signe and redaction once each, signe first seen.
        assert_eq!(
            scores[0].dominant_errors,
            vec!["calcul".to_string(), "signe".to_string()]
        );
    }

    #[test]
    fn priority_monotone_in_score() {
        assert_eq!(priority_for_score(0), DomainPriority::Critical);
        assert_eq!(priority_for_score(34), DomainPriority::Critical);
        assert_eq!(priority_for_score(35), DomainPriority::High);
        assert_eq!(priority_for_score(49), DomainPriority::High);
        assert_eq!(priority_for_score(50), DomainPriority::Medium);
        assert_eq!(priority_for_score(69), DomainPriority::Medium);
        assert_eq!(priority_for_score(70), DomainPriority::Low);
        assert_eq!(priority_for_score(100), DomainPriority::Low);
    }

    #[test]
    fn domains_emitted_in_id_order() {
        let mut map = BTreeMap::new();
        map.insert(
            "geometry".to_string(),
            vec![comp("g1", Some(2), CompetencyStatus::Studied)],
        );
        map.insert(
            "algebra".to_string(),
            vec![comp("a1", Some(2), CompetencyStatus::Studied)],
        );
        let scores = score_domains(&map);
        assert_eq!(scores[0].domain, "algebra");
        assert_eq!(scores[1].domain, "geometry");
    }
}
