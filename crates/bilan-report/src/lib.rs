//! bilan-report — Audience-specific Markdown rendering.
//!
//! Projects a [`ScoringV2Result`] through three fixed templates: élève
//! (motivational), parents (qualitative, no raw scores) and nexus
//! (technical, raw indices). The audience set is closed and every result
//! renders under every audience without panicking.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use bilan_core::model::{Level, ProfileTags, Track};
use bilan_core::prerequisites::WeakPrerequisite;
use bilan_core::results::ScoringV2Result;

mod eleve;
mod nexus;
mod parents;

pub use eleve::render_eleve_bilan;
pub use nexus::render_nexus_bilan;
pub use parents::render_parents_bilan;

/// The three report audiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Eleve,
    Parents,
    Nexus,
}

impl Audience {
    pub const ALL: [Audience; 3] = [Audience::Eleve, Audience::Parents, Audience::Nexus];
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::Eleve => write!(f, "eleve"),
            Audience::Parents => write!(f, "parents"),
            Audience::Nexus => write!(f, "nexus"),
        }
    }
}

/// Identity, display facts and verbatims supplied by the calling layer.
///
/// `tags` is resolved once at the entry point (see
/// [`ProfileTags::resolve`]); renderers never re-derive discipline or level
/// from anywhere else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderContext {
    pub first_name: String,
    pub last_name: String,
    pub tags: ProfileTags,
    #[serde(default)]
    pub establishment: Option<String>,
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub problem_reflex: Option<String>,
    #[serde(default)]
    pub max_concentration: Option<String>,
    #[serde(default)]
    pub weekly_work: Option<String>,
    #[serde(default)]
    pub mini_test_score: u8,
    #[serde(default)]
    pub mini_test_time: u32,
    #[serde(default)]
    pub mini_test_completed: bool,
    /// Free-text verbatims, keyed by question label.
    #[serde(default)]
    pub verbatims: BTreeMap<String, String>,
    /// Weak core prerequisites for the "Bases à consolider" block.
    #[serde(default)]
    pub weak_prerequisites: Vec<WeakPrerequisite>,
}

/// The three rendered documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BilanDocuments {
    pub eleve: String,
    pub parents: String,
    pub nexus: String,
}

impl BilanDocuments {
    /// Flatten into an audience-keyed map, e.g. for JSON export.
    pub fn into_map(self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(Audience::Eleve.to_string(), self.eleve);
        map.insert(Audience::Parents.to_string(), self.parents);
        map.insert(Audience::Nexus.to_string(), self.nexus);
        map
    }
}

/// Render one audience variant. Total over the closed audience set.
pub fn render_bilan(audience: Audience, scoring: &ScoringV2Result, ctx: &RenderContext) -> String {
    match audience {
        Audience::Eleve => render_eleve_bilan(scoring, ctx),
        Audience::Parents => render_parents_bilan(scoring, ctx),
        Audience::Nexus => render_nexus_bilan(scoring, ctx),
    }
}

/// Render all three audience variants from one scoring result.
pub fn render_all_bilans(scoring: &ScoringV2Result, ctx: &RenderContext) -> BilanDocuments {
    BilanDocuments {
        eleve: render_eleve_bilan(scoring, ctx),
        parents: render_parents_bilan(scoring, ctx),
        nexus: render_nexus_bilan(scoring, ctx),
    }
}

/// Qualitative band for a 0-100 score; the parents variant shows these
/// instead of raw numbers.
pub(crate) fn qualitative_label(score: u8) -> &'static str {
    match score {
        80..=100 => "très bon",
        65..=79 => "bon",
        50..=64 => "intermédiaire",
        35..=49 => "fragile",
        _ => "insuffisant",
    }
}

/// French display label for a domain id; unknown ids display as-is.
pub(crate) fn domain_label(domain: &str) -> &str {
    match domain {
        "algebra" => "Algèbre",
        "analysis" => "Analyse",
        "geometry" => "Géométrie",
        "probabilities" | "prob_stats" => "Probabilités & statistiques",
        "python" | "python_programming" => "Langage Python",
        "algo_prog" | "algorithms" | "algorithmic" => "Algorithmique & programmation",
        "algorithmic_advanced" => "Algorithmique avancée",
        "data_structures" => "Structures de données",
        "databases" => "Bases de données",
        "networks" => "Réseaux & OS",
        "systems_architecture" => "Architecture & OS",
        "logic_sets" => "Logique & ensembles",
        "exam_prep" => "Préparation épreuve",
        other => other,
    }
}

/// Display label for the subject track.
pub(crate) fn discipline_label(track: Track) -> &'static str {
    match track {
        Track::Maths => "Mathématiques",
        Track::Nsi => "NSI",
    }
}

/// Display label for the school level.
pub(crate) fn level_label(level: Level) -> &'static str {
    match level {
        Level::Premiere => "Première",
        Level::Terminale => "Terminale",
    }
}

/// Mastery (0-3) as a percentage for display.
pub(crate) fn mastery_percent(mastery: u8) -> u8 {
    (f64::from(mastery.min(3)) / 3.0 * 100.0).round() as u8
}
