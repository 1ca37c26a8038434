//! Quick bilan example — minimal programmatic usage of the engine.
//!
//! Builds a small dataset in code, scores it and prints the student-facing
//! bilan.
//!
//! ```bash
//! cargo run --example quick_bilan
//! ```

use std::collections::BTreeMap;

use bilan_core::engine::compute_scoring_v2;
use bilan_core::model::*;
use bilan_report::{render_eleve_bilan, RenderContext};

fn main() {
    let mut competencies = BTreeMap::new();
    competencies.insert(
        "algebra".to_string(),
        vec![
            Competency {
                skill_id: "alg_eq1".into(),
                skill_label: "Équations du premier degré".into(),
                mastery: Some(3),
                status: CompetencyStatus::Studied,
                confidence: Some(3),
                friction: Some(0),
                error_types: vec![],
                evidence: String::new(),
            },
            Competency {
                skill_id: "alg_suites".into(),
                skill_label: "Suites numériques".into(),
                mastery: Some(1),
                status: CompetencyStatus::InProgress,
                confidence: Some(1),
                friction: Some(2),
                error_types: vec!["calcul".into()],
                evidence: String::new(),
            },
        ],
    );

    let dataset = BilanDataset {
        identity: StudentIdentity {
            first_name: "Amine".into(),
            last_name: "Ben Ali".into(),
        },
        competencies,
        exam_prep: ExamPrep {
            mini_test: MiniTest {
                score: 4,
                time_used_minutes: 12,
                completed_in_time: true,
            },
            self_ratings: SelfRatings {
                redaction: 2,
                justifications: 2,
                stress: 1,
                ..Default::default()
            },
            signals: Signals::default(),
        },
        ..Default::default()
    };

    let mut domain_weights = BTreeMap::new();
    domain_weights.insert("algebra".to_string(), 1.0);
    let policy = ScoringPolicy {
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
    };

    let scoring = compute_scoring_v2(&dataset, &policy, None, &[], None);

    let ctx = RenderContext {
        first_name: dataset.identity.first_name.clone(),
        last_name: dataset.identity.last_name.clone(),
        tags: ProfileTags::resolve(&dataset, None),
        mini_test_score: dataset.exam_prep.mini_test.score,
        mini_test_time: dataset.exam_prep.mini_test.time_used_minutes,
        mini_test_completed: dataset.exam_prep.mini_test.completed_in_time,
        ..Default::default()
    };

    println!("{}", render_eleve_bilan(&scoring, &ctx));
}
