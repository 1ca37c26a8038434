//! Coverage Calculator — how much of the program the student has reached,
//! independent of mastery.

use std::collections::{HashMap, HashSet};

use crate::model::{BilanDataset, ChapterDefinition, ChaptersSelection};
use crate::results::CoverageProgramme;

/// Compute program coverage.
///
/// Returns `None` unless both a selection and a non-empty curriculum are
/// supplied — callers must be able to distinguish "no chapter data" from
/// "zero coverage". Unknown chapter ids count toward the chapter totals but
/// contribute no skills: the selection is taken at face value rather than
/// validated against the curriculum.
pub fn compute_coverage(
    selection: Option<&ChaptersSelection>,
    chapters: &[ChapterDefinition],
    dataset: &BilanDataset,
) -> Option<CoverageProgramme> {
    let selection = selection?;
    if chapters.is_empty() {
        return None;
    }

    let total_chapters = chapters.len();
    let seen_chapters = selection.selected.len();
    let in_progress_chapters = selection.in_progress.len();

    let seen_chapter_ratio = if total_chapters == 0 {
        0.0
    } else {
        (seen_chapters + in_progress_chapters) as f64 / total_chapters as f64
    };

    Some(CoverageProgramme {
        total_chapters,
        seen_chapters,
        in_progress_chapters,
        seen_chapter_ratio,
        evaluated_skill_ratio: evaluated_skill_ratio(selection, chapters, dataset),
    })
}

/// Share of evaluated skills among the skills of seen/in-progress chapters.
///
/// Skills of chapters the student has not reached are excluded entirely; a
/// skill with no competency record counts as not evaluated.
fn evaluated_skill_ratio(
    selection: &ChaptersSelection,
    chapters: &[ChapterDefinition],
    dataset: &BilanDataset,
) -> f64 {
    let reached: HashSet<&str> = selection
        .selected
        .iter()
        .chain(selection.in_progress.iter())
        .map(String::as_str)
        .collect();

    let by_skill: HashMap<&str, bool> = dataset
        .all_competencies()
        .map(|(_, c)| (c.skill_id.as_str(), c.is_evaluated()))
        .collect();

    let mut total = 0usize;
    let mut evaluated = 0usize;
    for chapter in chapters {
        if !reached.contains(chapter.chapter_id.as_str()) {
            continue;
        }
        for skill_id in &chapter.skills {
            total += 1;
            if by_skill.get(skill_id.as_str()).copied().unwrap_or(false) {
                evaluated += 1;
            }
        }
    }

    if total == 0 {
        0.0
    } else {
        evaluated as f64 / total as f64
    }
}
