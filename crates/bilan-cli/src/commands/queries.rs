//! The `bilan queries` command.

use std::path::PathBuf;

use anyhow::Result;

use bilan_core::engine::compute_scoring_v2;
use bilan_core::model::ProfileTags;
use bilan_core::parser;
use bilan_core::rag::build_rag_queries;

pub fn execute(dataset_path: PathBuf, definition_path: PathBuf) -> Result<()> {
    let definition = parser::parse_definition(&definition_path)?;
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
    let queries = build_rag_queries(
        &dataset,
        &scoring,
        &definition.chapters,
        selection.as_ref(),
        definition.exam_format.as_ref(),
        tags,
    );

    for query in &queries {
        println!("{query}");
    }
    eprintln!("{} query(ies)", queries.len());

    Ok(())
}
