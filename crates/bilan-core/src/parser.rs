//! TOML curriculum-definition parser and JSON dataset loader.
//!
//! Loads definitions from TOML files and directories, and validates them
//! for common configuration mistakes.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::DefinitionError;
use crate::model::{
    BilanDataset, ChapterDefinition, CurriculumDefinition, ExamFormat, PolicyThresholds,
    PrerequisiteLevel, ScoringPolicy, SkillMeta, Threshold,
};

/// Intermediate TOML structure for parsing definition files.
#[derive(Debug, Deserialize)]
struct TomlDefinitionFile {
    definition: TomlDefinitionHeader,
    policy: TomlPolicy,
    #[serde(default)]
    exam_format: Option<TomlExamFormat>,
    #[serde(default)]
    chapters: Vec<TomlChapter>,
    #[serde(default)]
    skill_meta: Vec<TomlSkillMeta>,
}

#[derive(Debug, Deserialize)]
struct TomlDefinitionHeader {
    key: String,
    label: String,
    track: String,
    level: String,
}

#[derive(Debug, Deserialize)]
struct TomlPolicy {
    domain_weights: BTreeMap<String, f64>,
    thresholds: TomlThresholds,
}

#[derive(Debug, Deserialize)]
struct TomlThresholds {
    confirmed: TomlThreshold,
    conditional: TomlThreshold,
}

#[derive(Debug, Deserialize)]
struct TomlThreshold {
    readiness: f64,
    risk: f64,
}

#[derive(Debug, Deserialize)]
struct TomlExamFormat {
    duration_minutes: u32,
    calculator_allowed: bool,
    #[serde(default)]
    structure: String,
}

#[derive(Debug, Deserialize)]
struct TomlChapter {
    chapter_id: String,
    chapter_label: String,
    domain_id: String,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    rag_topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TomlSkillMeta {
    skill_id: String,
    chapter_id: String,
    #[serde(default)]
    prerequisite: bool,
    #[serde(default)]
    prerequisite_level: Option<String>,
}

/// Parse a single TOML file into a [`CurriculumDefinition`].
pub fn parse_definition(path: &Path) -> Result<CurriculumDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read definition file: {}", path.display()))?;
    parse_definition_str(&content, path)
}

/// Parse a TOML string into a [`CurriculumDefinition`] (useful for testing).
pub fn parse_definition_str(content: &str, source_path: &Path) -> Result<CurriculumDefinition> {
    let parsed: TomlDefinitionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    if parsed.definition.key.trim().is_empty() {
        return Err(DefinitionError::EmptyKey.into());
    }
    let track = parsed
        .definition
        .track
        .parse()
        .map_err(|_| DefinitionError::UnknownTrack(parsed.definition.track.clone()))?;
    let level = parsed
        .definition
        .level
        .parse()
        .map_err(|_| DefinitionError::UnknownLevel(parsed.definition.level.clone()))?;

    let chapters = parsed
        .chapters
        .into_iter()
        .map(|ch| ChapterDefinition {
            chapter_id: ch.chapter_id,
            chapter_label: ch.chapter_label,
            domain_id: ch.domain_id,
            skills: ch.skills,
            rag_topics: ch.rag_topics,
        })
        .collect();

    let skill_meta = parsed
        .skill_meta
        .into_iter()
        .map(|sm| SkillMeta {
            skill_id: sm.skill_id,
            chapter_id: sm.chapter_id,
            prerequisite: sm.prerequisite,
            prerequisite_level: match sm.prerequisite_level.as_deref() {
                Some("core") => PrerequisiteLevel::Core,
                _ => PrerequisiteLevel::Secondary,
            },
        })
        .collect();

    Ok(CurriculumDefinition {
        key: parsed.definition.key,
        label: parsed.definition.label,
        track,
        level,
        policy: ScoringPolicy {
            domain_weights: parsed.policy.domain_weights,
            thresholds: PolicyThresholds {
                confirmed: Threshold {
                    readiness: parsed.policy.thresholds.confirmed.readiness,
                    risk: parsed.policy.thresholds.confirmed.risk,
                },
                conditional: Threshold {
                    readiness: parsed.policy.thresholds.conditional.readiness,
                    risk: parsed.policy.thresholds.conditional.risk,
                },
            },
        },
        exam_format: parsed.exam_format.map(|ef| ExamFormat {
            duration_minutes: ef.duration_minutes,
            calculator_allowed: ef.calculator_allowed,
            structure: ef.structure,
        }),
        chapters,
        skill_meta,
    })
}

/// Recursively load all `.toml` definition files from a directory.
pub fn load_definition_dir(dir: &Path) -> Result<Vec<CurriculumDefinition>> {
    let mut definitions = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            definitions.extend(load_definition_dir(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_definition(&path) {
                Ok(def) => definitions.push(def),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(definitions)
}

/// Load a student dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<BilanDataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;
    let dataset: BilanDataset = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse dataset JSON: {}", path.display()))?;
    Ok(dataset)
}

/// A warning from definition validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The chapter ID (if applicable).
    pub chapter_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a definition for common configuration issues.
pub fn validate_definition(def: &CurriculumDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if def.chapters.is_empty() {
        warnings.push(ValidationWarning {
            chapter_id: None,
            message: "definition has no chapters".into(),
        });
    }

    // Duplicate chapter ids
    let mut seen_chapters = std::collections::HashSet::new();
    for ch in &def.chapters {
        if !seen_chapters.insert(&ch.chapter_id) {
            warnings.push(ValidationWarning {
                chapter_id: Some(ch.chapter_id.clone()),
                message: format!("duplicate chapter ID: {}", ch.chapter_id),
            });
        }
    }

    // Duplicate skill ids across chapters
    let mut seen_skills = std::collections::HashSet::new();
    for ch in &def.chapters {
        for skill in &ch.skills {
            if !seen_skills.insert(skill.as_str()) {
                warnings.push(ValidationWarning {
                    chapter_id: Some(ch.chapter_id.clone()),
                    message: format!("skill '{skill}' appears in more than one chapter"),
                });
            }
        }
    }

    // Chapter domain missing from the weight table
    for ch in &def.chapters {
        if !def.policy.domain_weights.contains_key(&ch.domain_id) {
            warnings.push(ValidationWarning {
                chapter_id: Some(ch.chapter_id.clone()),
                message: format!(
                    "domain '{}' has no entry in policy.domain_weights",
                    ch.domain_id
                ),
            });
        }
    }

    // Skill metadata pointing at unknown chapters
    for sm in &def.skill_meta {
        if !def.chapters.iter().any(|ch| ch.chapter_id == sm.chapter_id) {
            warnings.push(ValidationWarning {
                chapter_id: Some(sm.chapter_id.clone()),
                message: format!(
                    "skill_meta '{}' references unknown chapter '{}'",
                    sm.skill_id, sm.chapter_id
                ),
            });
        }
    }

    // A core level on a non-prerequisite is almost certainly a typo
    for sm in &def.skill_meta {
        if !sm.prerequisite && sm.prerequisite_level == PrerequisiteLevel::Core {
            warnings.push(ValidationWarning {
                chapter_id: Some(sm.chapter_id.clone()),
                message: format!(
                    "skill_meta '{}' has prerequisite_level=core but prerequisite=false",
                    sm.skill_id
                ),
            });
        }
    }

    // Weights far from a unit sum distort the mastery index
    let weight_sum: f64 = def.policy.domain_weights.values().sum();
    if (weight_sum - 1.0).abs() > 0.2 {
        warnings.push(ValidationWarning {
            chapter_id: None,
            message: format!("domain weights sum to {weight_sum:.2}, expected close to 1.0"),
        });
    }

    warnings
}
