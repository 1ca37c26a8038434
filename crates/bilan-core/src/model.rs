//! Core data model types for the diagnostic engine.
//!
//! These are the input shapes the whole pipeline consumes: a student's
//! competency dataset, the curriculum (chapters, skills, prerequisite
//! annotations) and the scoring policy that drives the decision thresholds.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared progression state of a single competency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetencyStatus {
    Studied,
    InProgress,
    NotStudied,
    Unknown,
}

impl CompetencyStatus {
    /// `not_studied` and `unknown` carry no usable self-assessment.
    pub fn is_unevaluated(self) -> bool {
        matches!(
            self,
            CompetencyStatus::NotStudied | CompetencyStatus::Unknown
        )
    }
}

/// A skill's recorded evaluation for one student.
///
/// Invariant: `mastery`, `confidence` and `friction` are absent if and only
/// if `status` is `not_studied` or `unknown`. Use [`Competency::set_status`]
/// to transition status without breaking it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competency {
    /// Unique skill identifier (e.g. "alg_eq1").
    pub skill_id: String,
    /// Human-readable skill label.
    pub skill_label: String,
    /// Self-assessed mastery on the 0-3 scale.
    #[serde(default)]
    pub mastery: Option<u8>,
    pub status: CompetencyStatus,
    /// Self-assessed confidence on the 0-3 scale.
    #[serde(default)]
    pub confidence: Option<u8>,
    /// Self-assessed friction (how much the skill blocks progress), 0-3.
    #[serde(default)]
    pub friction: Option<u8>,
    /// Error tags, in the order the student reported them.
    #[serde(default)]
    pub error_types: Vec<String>,
    /// Free-text evidence (quote, exercise reference).
    #[serde(default)]
    pub evidence: String,
}

impl Competency {
    /// A competency counts as evaluated when its status carries information
    /// and a mastery value is present.
    pub fn is_evaluated(&self) -> bool {
        !self.status.is_unevaluated() && self.mastery.is_some()
    }

    /// Transition the status, keeping the numeric-field invariant: leaving
    /// `not_studied`/`unknown` repopulates absent fields with 0, entering
    /// them clears all three.
    pub fn set_status(&mut self, status: CompetencyStatus) {
        self.status = status;
        if status.is_unevaluated() {
            self.mastery = None;
            self.confidence = None;
            self.friction = None;
        } else {
            self.mastery.get_or_insert(0);
            self.confidence.get_or_insert(0);
            self.friction.get_or_insert(0);
        }
    }
}

/// A named curriculum unit belonging to one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterDefinition {
    pub chapter_id: String,
    pub chapter_label: String,
    pub domain_id: String,
    /// Skill ids taught in this chapter.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Retrieval topics; empty falls back to `chapter_label`.
    #[serde(default)]
    pub rag_topics: Vec<String>,
}

/// Weight class of a prerequisite skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrerequisiteLevel {
    Core,
    #[default]
    Secondary,
}

/// Prerequisite annotation attached to a skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMeta {
    pub skill_id: String,
    pub chapter_id: String,
    #[serde(default)]
    pub prerequisite: bool,
    /// Only meaningful when `prerequisite` is true.
    #[serde(default)]
    pub prerequisite_level: PrerequisiteLevel,
}

impl SkillMeta {
    pub fn is_core_prerequisite(&self) -> bool {
        self.prerequisite && self.prerequisite_level == PrerequisiteLevel::Core
    }
}

/// Which chapters the student has seen, started, or not reached yet.
///
/// Ids that don't exist in the curriculum are tolerated everywhere: they
/// count toward the coverage ratios but contribute no skills.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChaptersSelection {
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub in_progress: Vec<String>,
    #[serde(default)]
    pub not_yet: Vec<String>,
}

/// A readiness/risk threshold pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Threshold {
    pub readiness: f64,
    pub risk: f64,
}

/// Decision thresholds, checked confirmed-first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyThresholds {
    pub confirmed: Threshold,
    pub conditional: Threshold,
}

/// Domain weights plus decision thresholds.
///
/// Weights need not sum to 1; the aggregator normalizes over the domains
/// actually present in the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub domain_weights: BTreeMap<String, f64>,
    pub thresholds: PolicyThresholds,
}

/// Fallback weight for a domain missing from the policy table.
const FALLBACK_DOMAIN_WEIGHT: f64 = 0.10;

impl ScoringPolicy {
    /// Weight for a domain; a domain absent from the table is a caller-side
    /// configuration defect, logged and tolerated with a fallback weight.
    pub fn weight_for(&self, domain: &str) -> f64 {
        match self.domain_weights.get(domain) {
            Some(w) => *w,
            None => {
                tracing::warn!("domain '{domain}' missing from policy weights, using fallback");
                FALLBACK_DOMAIN_WEIGHT
            }
        }
    }
}

/// Mini-test facts (automatisms check, scored 0-6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiniTest {
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub time_used_minutes: u32,
    #[serde(default)]
    pub completed_in_time: bool,
}

/// Exam-prep self-ratings, all on the 0-3 scale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelfRatings {
    #[serde(default)]
    pub speed_no_calc: u8,
    #[serde(default)]
    pub calc_reliability: u8,
    #[serde(default)]
    pub redaction: u8,
    #[serde(default)]
    pub justifications: u8,
    #[serde(default)]
    pub stress: u8,
}

/// Declared feeling after the mini-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feeling {
    Ok,
    #[default]
    Neutral,
    Unsure,
    Panic,
}

/// Declarative signals around the mini-test.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signals {
    #[serde(default)]
    pub verified_answers: bool,
    #[serde(default)]
    pub feeling: Feeling,
}

/// Everything the student reported about exam preparation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamPrep {
    #[serde(default)]
    pub mini_test: MiniTest,
    #[serde(default)]
    pub self_ratings: SelfRatings,
    #[serde(default)]
    pub signals: Signals,
}

/// Work-methodology answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Methodology {
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub weekly_work_hours: Option<f64>,
    #[serde(default)]
    pub max_concentration: Option<String>,
    #[serde(default)]
    pub problem_reflex: Option<String>,
    /// Dominant error tags, most significant first.
    #[serde(default)]
    pub error_types: Vec<String>,
}

/// Who the bilan is about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentIdentity {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// School context used by the data-quality evaluator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentContext {
    /// Declared class average, out of 20.
    #[serde(default)]
    pub declared_average: Option<f64>,
    #[serde(default)]
    pub establishment: Option<String>,
}

/// Subject track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    #[default]
    Maths,
    Nsi,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Maths => write!(f, "maths"),
            Track::Nsi => write!(f, "nsi"),
        }
    }
}

impl FromStr for Track {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maths" | "math" => Ok(Track::Maths),
            "nsi" => Ok(Track::Nsi),
            other => Err(format!("unknown track: {other}")),
        }
    }
}

/// School level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Premiere,
    Terminale,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Premiere => write!(f, "premiere"),
            Level::Terminale => write!(f, "terminale"),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "premiere" | "première" => Ok(Level::Premiere),
            "terminale" => Ok(Level::Terminale),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// Track + level, resolved exactly once at the entry point and threaded
/// through the query builder and the renderers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProfileTags {
    pub track: Track,
    pub level: Level,
}

impl ProfileTags {
    /// Dataset values win over definition values; anything still missing
    /// falls back to maths / première.
    pub fn resolve(dataset: &BilanDataset, definition: Option<&CurriculumDefinition>) -> Self {
        Self {
            track: dataset
                .track
                .or(definition.map(|d| d.track))
                .unwrap_or_default(),
            level: dataset
                .level
                .or(definition.map(|d| d.level))
                .unwrap_or_default(),
        }
    }
}

/// The full student-reported dataset the engine consumes.
///
/// Competencies are keyed by domain id; a `BTreeMap` keeps iteration order
/// deterministic so two identical inputs produce byte-identical reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BilanDataset {
    #[serde(default)]
    pub identity: StudentIdentity,
    #[serde(default)]
    pub competencies: BTreeMap<String, Vec<Competency>>,
    #[serde(default)]
    pub exam_prep: ExamPrep,
    #[serde(default)]
    pub methodology: Methodology,
    #[serde(default)]
    pub context: StudentContext,
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub level: Option<Level>,
    /// Chapter selection as submitted with the form, if any.
    #[serde(default)]
    pub chapters: Option<ChaptersSelection>,
    /// Free-text answers, keyed by question label.
    #[serde(default)]
    pub free_text: BTreeMap<String, String>,
}

impl BilanDataset {
    /// Iterate every competency with its domain id.
    pub fn all_competencies(&self) -> impl Iterator<Item = (&str, &Competency)> {
        self.competencies
            .iter()
            .flat_map(|(domain, items)| items.iter().map(move |c| (domain.as_str(), c)))
    }

    /// Look up a competency by skill id across all domains.
    pub fn competency(&self, skill_id: &str) -> Option<(&str, &Competency)> {
        self.all_competencies().find(|(_, c)| c.skill_id == skill_id)
    }
}

/// Target exam structure and rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamFormat {
    pub duration_minutes: u32,
    pub calculator_allowed: bool,
    #[serde(default)]
    pub structure: String,
}

/// One questionnaire definition: curriculum, prerequisite annotations and
/// scoring policy for a track + level combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumDefinition {
    /// Unique key, e.g. "maths-premiere-p2".
    pub key: String,
    pub label: String,
    pub track: Track,
    pub level: Level,
    pub policy: ScoringPolicy,
    #[serde(default)]
    pub exam_format: Option<ExamFormat>,
    #[serde(default)]
    pub chapters: Vec<ChapterDefinition>,
    #[serde(default)]
    pub skill_meta: Vec<SkillMeta>,
}
