//! Prerequisite Non-Sanction Evaluator.
//!
//! Curriculum gaps the student has not reached yet must never be punished;
//! a *known* weak core prerequisite in an unreached chapter should be. A
//! prerequisite with no recorded mastery carries no information and
//! therefore no penalty.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{BilanDataset, ChaptersSelection, SkillMeta};

/// Present mastery at or below this mark qualifies a core prerequisite.
pub const LOW_PREREQUISITE_MASTERY: u8 = 2;

/// Readiness points deducted per qualifying skill.
pub const PENALTY_PER_SKILL: f64 = 3.0;

/// Ceiling on the combined penalty: one evaluator pass can never zero out
/// a readiness score.
pub const MAX_PENALTY: f64 = 12.0;

/// A core prerequisite skill with low recorded mastery in an unreached
/// chapter ("base à consolider").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakPrerequisite {
    pub skill_id: String,
    pub skill_label: String,
    pub domain: String,
    pub mastery: u8,
}

/// Outcome of the evaluator: a bounded readiness deduction plus the
/// qualifying skills for the renderer to surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrerequisiteAssessment {
    pub penalty: f64,
    pub weak_prerequisites: Vec<WeakPrerequisite>,
}

/// Assess core prerequisites located in `not_yet` chapters.
///
/// Absent metadata is behaviorally identical to metadata with no qualifying
/// skills: zero penalty, empty list.
pub fn assess_prerequisites(
    dataset: &BilanDataset,
    skill_meta: Option<&[SkillMeta]>,
    selection: Option<&ChaptersSelection>,
) -> PrerequisiteAssessment {
    let (Some(meta), Some(selection)) = (skill_meta, selection) else {
        return PrerequisiteAssessment::default();
    };

    let not_yet: HashSet<&str> = selection.not_yet.iter().map(String::as_str).collect();

    let mut assessment = PrerequisiteAssessment::default();
    for sm in meta {
        if !sm.is_core_prerequisite() || !not_yet.contains(sm.chapter_id.as_str()) {
            continue;
        }
        let Some((domain, comp)) = dataset.competency(&sm.skill_id) else {
            continue;
        };
        // No recorded mastery: not yet evaluated, no information, no penalty.
        let Some(mastery) = comp.mastery else {
            continue;
        };
        if mastery <= LOW_PREREQUISITE_MASTERY {
            assessment.weak_prerequisites.push(WeakPrerequisite {
                skill_id: comp.skill_id.clone(),
                skill_label: comp.skill_label.clone(),
                domain: domain.to_string(),
                mastery,
            });
        }
    }

    assessment.penalty =
        (assessment.weak_prerequisites.len() as f64 * PENALTY_PER_SKILL).min(MAX_PENALTY);
    assessment
}
