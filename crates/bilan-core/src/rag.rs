//! RAG Query Builder — bounded retrieval queries for weak curriculum topics.
//!
//! Queries only ever name content the student has reached: chapters in the
//! `not_yet` list are never queried, so the retrieval layer cannot surface
//! unreached material.

use std::collections::HashSet;

use crate::model::{BilanDataset, ChapterDefinition, ChaptersSelection, ExamFormat, ProfileTags};
use crate::results::ScoringV2Result;

/// Domains scoring at or above this mark are strong: their topics must
/// never appear in any query.
pub const WEAK_SCORE_CUTOFF: u8 = 70;

/// Hard cap on the emitted query list.
pub const MAX_QUERIES: usize = 4;

/// How many error tags feed the error-focused query.
const ERROR_TAG_COUNT: usize = 2;

/// Build at most [`MAX_QUERIES`] retrieval queries from the scoring result.
///
/// Domain queries come first (weakest domain first); one error-type query
/// and one exam-format query follow when room remains.
pub fn build_rag_queries(
    dataset: &BilanDataset,
    result: &ScoringV2Result,
    chapters: &[ChapterDefinition],
    selection: Option<&ChaptersSelection>,
    exam_format: Option<&ExamFormat>,
    tags: ProfileTags,
) -> Vec<String> {
    let reached: HashSet<&str> = selection
        .map(|sel| {
            sel.selected
                .iter()
                .chain(sel.in_progress.iter())
                .map(String::as_str)
                .collect()
        })
        .unwrap_or_default();

    let mut weak_domains: Vec<_> = result
        .domain_scores
        .iter()
        .filter(|d| d.evaluated_count > 0 && d.score < WEAK_SCORE_CUTOFF)
        .collect();
    weak_domains.sort_by_key(|d| d.score);

    let mut queries: Vec<String> = Vec::new();
    for domain in &weak_domains {
        let domain_chapters: Vec<&ChapterDefinition> = chapters
            .iter()
            .filter(|ch| ch.domain_id == domain.domain && reached.contains(ch.chapter_id.as_str()))
            .collect();
        if domain_chapters.is_empty() {
            queries.push(format!(
                "{} {} {} méthode",
                domain.domain, tags.track, tags.level
            ));
            continue;
        }
        for chapter in domain_chapters {
            let topics = if chapter.rag_topics.is_empty() {
                chapter.chapter_label.clone()
            } else {
                chapter.rag_topics.join(" ")
            };
            queries.push(format!(
                "{topics} {} {} exercices méthode",
                tags.track, tags.level
            ));
        }
    }
    queries.truncate(MAX_QUERIES);

    if !dataset.methodology.error_types.is_empty() && queries.len() < MAX_QUERIES {
        let tags_joined = dataset
            .methodology
            .error_types
            .iter()
            .take(ERROR_TAG_COUNT)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        queries.push(format!(
            "erreurs fréquentes {tags_joined} {} méthode correction",
            tags.track
        ));
    }

    if queries.len() < MAX_QUERIES {
        queries.push(exam_query(exam_format, tags));
    }

    queries
}

/// Exactly one exam-format query, emitted regardless of domain weakness.
fn exam_query(exam_format: Option<&ExamFormat>, tags: ProfileTags) -> String {
    match exam_format {
        Some(format) => {
            let calculator = if format.calculator_allowed {
                "avec calculatrice"
            } else {
                "sans calculatrice"
            };
            format!(
                "épreuve {} {} {}min préparation {calculator}",
                tags.track, tags.level, format.duration_minutes
            )
        }
        None => format!("épreuve {} {} préparation", tags.track, tags.level),
    }
}
