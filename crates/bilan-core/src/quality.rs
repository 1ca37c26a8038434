//! Trust & Data-Quality Evaluator — input completeness and coherence.
//!
//! This module reasons only about the *inputs*: how complete and how
//! internally consistent they are. It never reads the composite indices,
//! which keeps the trust signal independent from what the scores say.

use crate::aggregate::HIGH_FRICTION_CUTOFF;
use crate::model::{BilanDataset, ChapterDefinition, ChaptersSelection, CompetencyStatus, Feeling};
use crate::results::{
    Alert, AlertKind, CoverageProgramme, DataQuality, DomainScore, InconsistencyFlag,
    QualityBucket, Severity, TrustLevel,
};

/// A domain is active once it has this many evaluated competencies.
const ACTIVE_DOMAIN_MIN_EVALUATED: usize = 2;

/// Trust-level cut points.
const TRUST_GREEN_FLOOR: u8 = 70;
const TRUST_ORANGE_FLOOR: u8 = 40;

/// Seen-chapter ratio under which the program counts as barely covered.
const PROGRAM_COVERAGE_FLOOR: f64 = 0.30;

/// Domain score under which a seen chapter flags advanced gaps.
const ADVANCED_GAP_SCORE: u8 = 40;

/// Build the completeness counters from the raw dataset.
///
/// `coherence_issues` mirrors the number of detected inconsistencies.
pub fn assess_data_quality(
    dataset: &BilanDataset,
    inconsistencies: &[InconsistencyFlag],
) -> DataQuality {
    let mut active_domains = 0usize;
    let mut evaluated = 0usize;
    let mut not_studied = 0usize;
    let mut unknown = 0usize;

    for items in dataset.competencies.values() {
        let domain_evaluated = items.iter().filter(|c| c.is_evaluated()).count();
        if domain_evaluated >= ACTIVE_DOMAIN_MIN_EVALUATED {
            active_domains += 1;
        }
        evaluated += domain_evaluated;
        not_studied += items
            .iter()
            .filter(|c| c.status == CompetencyStatus::NotStudied)
            .count();
        unknown += items
            .iter()
            .filter(|c| c.status == CompetencyStatus::Unknown)
            .count();
    }

    let quality = if active_domains >= 4 && unknown <= 2 {
        QualityBucket::Good
    } else if active_domains >= 3 {
        QualityBucket::Partial
    } else {
        QualityBucket::Insufficient
    };

    let critical_fields_missing = [
        dataset.context.declared_average.is_none(),
        dataset.context.establishment.is_none(),
        evaluated < 5,
    ]
    .iter()
    .filter(|missing| **missing)
    .count();

    DataQuality {
        active_domains,
        evaluated_competencies: evaluated,
        not_studied_competencies: not_studied,
        unknown_competencies: unknown,
        low_confidence: active_domains < 3,
        quality,
        coherence_issues: inconsistencies.len(),
        mini_test_filled: dataset.exam_prep.mini_test.score > 0,
        critical_fields_missing,
    }
}

/// Detect internally contradictory signals for audit transparency.
pub fn detect_inconsistencies(dataset: &BilanDataset) -> Vec<InconsistencyFlag> {
    let mut flags = Vec::new();
    let mini = &dataset.exam_prep.mini_test;

    if mini.score >= 5 && dataset.exam_prep.signals.feeling == Feeling::Panic {
        flags.push(InconsistencyFlag {
            code: "INCONSISTENT_SIGNAL".into(),
            message: "Mini-test excellent (≥5/6) mais ressenti \"panic\" — incohérence à vérifier en séance"
                .into(),
            fields: vec!["exam_prep.mini_test.score".into(), "exam_prep.signals.feeling".into()],
            severity: Severity::Warning,
        });
    }

    if mini.completed_in_time && mini.score <= 2 && mini.time_used_minutes <= 8 {
        flags.push(InconsistencyFlag {
            code: "RUSHED_TEST".into(),
            message:
                "Mini-test terminé très vite (≤8min) avec score faible (≤2/6) — possibles réponses aléatoires"
                    .into(),
            fields: vec![
                "exam_prep.mini_test.time_used_minutes".into(),
                "exam_prep.mini_test.score".into(),
            ],
            severity: Severity::Warning,
        });
    }

    let studied_no_mastery: Vec<String> = dataset
        .all_competencies()
        .filter(|(_, c)| c.status == CompetencyStatus::Studied && c.mastery.is_none())
        .map(|(_, c)| c.skill_label.clone())
        .collect();
    if studied_no_mastery.len() >= 2 {
        flags.push(InconsistencyFlag {
            code: "STUDIED_NO_MASTERY".into(),
            message: format!(
                "{} compétences marquées \"studied\" sans mastery — données incomplètes",
                studied_no_mastery.len()
            ),
            fields: studied_no_mastery,
            severity: Severity::Error,
        });
    }

    if let Some(avg) = dataset.context.declared_average {
        if avg >= 14.0 {
            let evaluated: Vec<u8> = dataset
                .all_competencies()
                .filter(|(_, c)| c.is_evaluated())
                .filter_map(|(_, c)| c.mastery)
                .collect();
            if !evaluated.is_empty() {
                let global =
                    evaluated.iter().map(|m| f64::from(*m)).sum::<f64>() / evaluated.len() as f64
                        / 3.0
                        * 100.0;
                if global < 40.0 {
                    flags.push(InconsistencyFlag {
                        code: "HIGH_AVERAGE_LOW_MASTERY".into(),
                        message: format!(
                            "Moyenne déclarée élevée ({avg}) mais mastery globale faible (<40%) — possible surévaluation ou programme non couvert"
                        ),
                        fields: vec!["context.declared_average".into(), "competencies".into()],
                        severity: Severity::Warning,
                    });
                }
            }
        }
    }

    flags
}

/// Trust score (0-100): starts at 100 and decreases with missing or
/// contradictory data.
pub fn trust_score(
    dataset: &BilanDataset,
    quality: &DataQuality,
    inconsistencies: &[InconsistencyFlag],
) -> (u8, TrustLevel) {
    let mut score: f64 = 100.0;

    score -= (4usize.saturating_sub(quality.active_domains)) as f64 * 15.0;
    score -= (quality.unknown_competencies as f64 * 5.0).min(20.0);
    score -= inconsistencies
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count() as f64
        * 10.0;
    score -= inconsistencies
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .count() as f64
        * 5.0;
    if !dataset.exam_prep.mini_test.completed_in_time {
        score -= 10.0;
    }
    if quality.evaluated_competencies < 8 {
        score -= 15.0;
    }
    score -= quality.critical_fields_missing as f64 * 8.0;

    let score = score.clamp(0.0, 100.0).round() as u8;
    let level = if score >= TRUST_GREEN_FLOOR {
        TrustLevel::Green
    } else if score >= TRUST_ORANGE_FLOOR {
        TrustLevel::Orange
    } else {
        TrustLevel::Red
    };
    (score, level)
}

/// Detect alerts with staff-facing impact descriptions.
pub fn detect_alerts(
    dataset: &BilanDataset,
    quality: &DataQuality,
    domain_scores: &[DomainScore],
    coverage: Option<&CoverageProgramme>,
    selection: Option<&ChaptersSelection>,
    chapters: &[ChapterDefinition],
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if dataset.exam_prep.self_ratings.stress >= 2 {
        alerts.push(Alert {
            kind: AlertKind::Warning,
            code: "HIGH_STRESS".into(),
            message: "Gestion du stress à travailler (auto-évaluation ≥ 2/3)".into(),
            impact: Some(
                "Risque de sous-performance à l'épreuve malgré un bon niveau technique".into(),
            ),
        });
    }

    if dataset.exam_prep.mini_test.score <= 2 {
        alerts.push(Alert {
            kind: AlertKind::Danger,
            code: "WEAK_AUTOMATISMS".into(),
            message: "Automatismes très fragiles (mini-test ≤ 2/6)".into(),
            impact: Some(
                "Partie automatismes de l'épreuve (sans calculatrice) fortement compromise".into(),
            ),
        });
    }

    if dataset.exam_prep.signals.feeling == Feeling::Panic {
        alerts.push(Alert {
            kind: AlertKind::Danger,
            code: "PANIC_SIGNAL".into(),
            message: "Signal de détresse — suivi prioritaire recommandé".into(),
            impact: Some(
                "Nécessite un accompagnement psycho-pédagogique avant le travail technique".into(),
            ),
        });
    }

    let high_friction = dataset
        .all_competencies()
        .filter(|(_, c)| c.friction.is_some_and(|f| f >= HIGH_FRICTION_CUTOFF))
        .count();
    if high_friction >= 2 {
        alerts.push(Alert {
            kind: AlertKind::Warning,
            code: "MULTIPLE_BLOCKAGES".into(),
            message: format!(
                "Blocages identifiés sur {high_friction} compétences (friction ≥ {HIGH_FRICTION_CUTOFF})"
            ),
            impact: Some("Risque de décrochage si les blocages ne sont pas traités en priorité".into()),
        });
    }

    if let Some(hours) = dataset.methodology.weekly_work_hours {
        if hours < 2.0 {
            alerts.push(Alert {
                kind: AlertKind::Info,
                code: "LOW_WORK_VOLUME".into(),
                message: "Volume de travail hebdomadaire à augmenter (< 2h)".into(),
                impact: Some(
                    "Progression limitée sans augmentation du temps de travail personnel".into(),
                ),
            });
        }
    }

    if dataset.methodology.max_concentration.as_deref() == Some("30min") {
        alerts.push(Alert {
            kind: AlertKind::Info,
            code: "LOW_ENDURANCE".into(),
            message: "Endurance de concentration à développer (≤ 30min)".into(),
            impact: Some(
                "L'épreuve dure 2h — endurance insuffisante pour maintenir la qualité".into(),
            ),
        });
    }

    if quality.low_confidence {
        alerts.push(Alert {
            kind: AlertKind::Warning,
            code: "LOW_DATA_QUALITY".into(),
            message: format!(
                "Données insuffisantes : seulement {} domaine(s) actif(s)",
                quality.active_domains
            ),
            impact: Some(
                "Le scoring et les recommandations sont moins fiables — à confirmer en séance".into(),
            ),
        });
    }

    if quality.unknown_competencies >= 3 {
        alerts.push(Alert {
            kind: AlertKind::Info,
            code: "HIGH_UNKNOWN".into(),
            message: format!(
                "{} compétences en statut \"unknown\" — l'élève ne sait pas situer sa progression",
                quality.unknown_competencies
            ),
            impact: Some(
                "Pénalise la qualité des données — évaluation diagnostique en séance recommandée"
                    .into(),
            ),
        });
    }

    alerts.extend(chapter_alerts(domain_scores, coverage, selection, chapters));
    alerts
}

/// Chapter-aware alerts, only emitted when coverage data exists.
fn chapter_alerts(
    domain_scores: &[DomainScore],
    coverage: Option<&CoverageProgramme>,
    selection: Option<&ChaptersSelection>,
    chapters: &[ChapterDefinition],
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let (Some(cp), Some(selection)) = (coverage, selection) else {
        return alerts;
    };

    if cp.seen_chapter_ratio < PROGRAM_COVERAGE_FLOOR {
        alerts.push(Alert {
            kind: AlertKind::Warning,
            code: "PROGRAM_NOT_COVERED".into(),
            message: format!(
                "Programme peu couvert : {:.0}% des chapitres vus ou en cours",
                cp.seen_chapter_ratio * 100.0
            ),
            impact: Some(
                "La couverture du programme doit accélérer pour tenir l'échéance de l'épreuve"
                    .into(),
            ),
        });
    }

    // Chapters already reached whose domain is still weak.
    let mut weak_domains: Vec<&str> = Vec::new();
    for chapter in chapters {
        let reached = selection.selected.contains(&chapter.chapter_id)
            || selection.in_progress.contains(&chapter.chapter_id);
        if !reached {
            continue;
        }
        let weak = domain_scores.iter().any(|d| {
            d.domain == chapter.domain_id && d.evaluated_count > 0 && d.score < ADVANCED_GAP_SCORE
        });
        if weak && !weak_domains.contains(&chapter.domain_id.as_str()) {
            weak_domains.push(&chapter.domain_id);
        }
    }
    if !weak_domains.is_empty() {
        alerts.push(Alert {
            kind: AlertKind::Warning,
            code: "ADVANCED_GAPS".into(),
            message: format!(
                "Lacunes sur des chapitres déjà abordés : {}",
                weak_domains.join(", ")
            ),
            impact: Some("Consolidation nécessaire avant d'avancer dans le programme".into()),
        });
    }

    alerts
}
