//! Central scoring orchestrator.
//!
//! Wires the component evaluators together into the single result object.
//! Pure function of its inputs: everything is recomputed on every call, no
//! caches, no shared state, so concurrent invocations need no coordination.

use crate::aggregate::aggregate_indices;
use crate::coverage::compute_coverage;
use crate::domain::score_domains;
use crate::model::{BilanDataset, ChapterDefinition, ChaptersSelection, ScoringPolicy, SkillMeta};
use crate::prerequisites::assess_prerequisites;
use crate::priorities::extract_priorities;
use crate::quality::{assess_data_quality, detect_alerts, detect_inconsistencies, trust_score};
use crate::results::{Alert, AlertKind, ScoringV2Result, Severity};

/// Compute the full diagnosis from a student's dataset.
///
/// `selection`, `chapters` and `skill_meta` are optional inputs; their
/// absence degrades to documented defaults (no coverage block, no
/// prerequisite penalty) rather than an error.
pub fn compute_scoring_v2(
    dataset: &BilanDataset,
    policy: &ScoringPolicy,
    selection: Option<&ChaptersSelection>,
    chapters: &[ChapterDefinition],
    skill_meta: Option<&[SkillMeta]>,
) -> ScoringV2Result {
    let domain_scores = score_domains(&dataset.competencies);
    let coverage = compute_coverage(selection, chapters, dataset);
    let prerequisites = assess_prerequisites(dataset, skill_meta, selection);

    let indices = aggregate_indices(
        dataset,
        policy,
        &domain_scores,
        coverage.as_ref(),
        prerequisites.penalty,
    );

    let inconsistencies = detect_inconsistencies(dataset);
    let data_quality = assess_data_quality(dataset, &inconsistencies);
    let (trust, trust_level) = trust_score(dataset, &data_quality, &inconsistencies);

    let mut alerts = detect_alerts(
        dataset,
        &data_quality,
        &domain_scores,
        coverage.as_ref(),
        selection,
        chapters,
    );
    for flag in &inconsistencies {
        alerts.push(Alert {
            kind: match flag.severity {
                Severity::Error => AlertKind::Danger,
                Severity::Warning => AlertKind::Warning,
            },
            code: flag.code.clone(),
            message: flag.message.clone(),
            impact: Some(format!("Champs concernés : {}", flag.fields.join(", "))),
        });
    }

    let buckets = extract_priorities(dataset, &domain_scores, policy);

    ScoringV2Result {
        mastery_index: indices.mastery_index,
        coverage_index: indices.coverage_index,
        exam_readiness_index: indices.exam_readiness_index,
        readiness_score: indices.readiness_score,
        risk_index: indices.risk_index,
        recommendation: indices.recommendation,
        recommendation_message: indices.recommendation_message,
        justification: indices.justification,
        upgrade_conditions: indices.upgrade_conditions,
        domain_scores,
        alerts,
        data_quality,
        trust_score: trust,
        trust_level,
        top_priorities: buckets.top_priorities,
        quick_wins: buckets.quick_wins,
        high_risk: buckets.high_risk,
        inconsistencies,
        coverage_programme: coverage,
    }
}
