//! The `bilan score` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use bilan_core::engine::compute_scoring_v2;
use bilan_core::export::BilanExport;
use bilan_core::model::ProfileTags;
use bilan_core::parser;
use bilan_core::prerequisites::assess_prerequisites;
use bilan_core::rag::build_rag_queries;
use bilan_core::results::ScoringV2Result;
use bilan_report::{render_all_bilans, Audience, RenderContext};

pub fn execute(
    dataset_path: PathBuf,
    definition_path: PathBuf,
    output: PathBuf,
    format: String,
) -> Result<()> {
    let definition = parser::parse_definition(&definition_path)?;
    for warning in parser::validate_definition(&definition) {
        tracing::warn!(
            "definition {}: {}",
            definition.key,
            warning.message
        );
    }
    let dataset = parser::load_dataset(&dataset_path)?;

    let tags = ProfileTags::resolve(&dataset, Some(&definition));
    let selection = dataset.chapters.clone();
    let scoring = compute_scoring_v2(
        &dataset,
        &definition.policy,
        selection.as_ref(),
        &definition.chapters,
        Some(&definition.skill_meta),
    );
    let prerequisites = assess_prerequisites(
        &dataset,
        Some(&definition.skill_meta),
        selection.as_ref(),
    );
    let queries = build_rag_queries(
        &dataset,
        &scoring,
        &definition.chapters,
        selection.as_ref(),
        definition.exam_format.as_ref(),
        tags,
    );

    let ctx = RenderContext {
        first_name: dataset.identity.first_name.clone(),
        last_name: dataset.identity.last_name.clone(),
        tags,
        establishment: dataset.context.establishment.clone(),
        learning_style: dataset.methodology.learning_style.clone(),
        problem_reflex: dataset.methodology.problem_reflex.clone(),
        max_concentration: dataset.methodology.max_concentration.clone(),
        weekly_work: dataset.methodology.weekly_work_hours.map(|h| format!("{h}h")),
        mini_test_score: dataset.exam_prep.mini_test.score,
        mini_test_time: dataset.exam_prep.mini_test.time_used_minutes,
        mini_test_completed: dataset.exam_prep.mini_test.completed_in_time,
        verbatims: dataset.free_text.clone(),
        weak_prerequisites: prerequisites.weak_prerequisites,
    };
    let documents = render_all_bilans(&scoring, &ctx);

    print_summary(&scoring);

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown"]
    } else {
        format.split(',').collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let export = BilanExport {
                    id: uuid::Uuid::new_v4(),
                    created_at: chrono::Utc::now(),
                    definition_key: definition.key.clone(),
                    student: dataset.identity.clone(),
                    scoring: scoring.clone(),
                    queries: queries.clone(),
                    documents: documents.clone().into_map(),
                };
                let path = output.join(format!("report-{timestamp}.json"));
                export.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "markdown" | "md" => {
                for audience in Audience::ALL {
                    let path = output.join(format!("bilan-{audience}.md"));
                    let content = match audience {
                        Audience::Eleve => &documents.eleve,
                        Audience::Parents => &documents.parents,
                        Audience::Nexus => &documents.nexus,
                    };
                    std::fs::write(&path, content)?;
                    eprintln!("Markdown bilan: {}", path.display());
                }
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(scoring: &ScoringV2Result) {
    let mut table = Table::new();
    table.set_header(vec!["Domaine", "Score", "Évalués", "Priorité"]);
    for d in &scoring.domain_scores {
        table.add_row(vec![
            Cell::new(&d.domain),
            Cell::new(format!("{}%", d.score)),
            Cell::new(format!("{}/{}", d.evaluated_count, d.total_count)),
            Cell::new(d.priority.to_string()),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "ReadinessScore {}/100 | RiskIndex {}/100 | TrustScore {}/100 ({})",
        scoring.readiness_score, scoring.risk_index, scoring.trust_score, scoring.trust_level
    );
    println!("Recommandation : {}", scoring.recommendation_message);
}
