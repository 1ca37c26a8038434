//! Derived result types produced by the scoring pipeline.
//!
//! Everything here is recomputed in full on every engine invocation; none
//! of these types is ever mutated incrementally.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remediation priority tier of a domain, non-increasing in its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl DomainPriority {
    /// Tiers that mark a domain as needing attention.
    pub fn needs_attention(self) -> bool {
        matches!(self, DomainPriority::Critical | DomainPriority::High)
    }
}

impl fmt::Display for DomainPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainPriority::Critical => write!(f, "critical"),
            DomainPriority::High => write!(f, "high"),
            DomainPriority::Medium => write!(f, "medium"),
            DomainPriority::Low => write!(f, "low"),
        }
    }
}

/// Per-domain scoring breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: String,
    /// Mean mastery of evaluated competencies, rescaled to 0-100.
    pub score: u8,
    pub evaluated_count: usize,
    pub total_count: usize,
    pub not_studied_count: usize,
    pub unknown_count: usize,
    /// Labels of evaluated competencies at or below the low-mastery cutoff.
    pub gaps: Vec<String>,
    /// Most frequent error tags, ties broken by first-seen order.
    pub dominant_errors: Vec<String>,
    pub priority: DomainPriority,
}

/// Program-coverage statistics, mastery-independent.
///
/// Absent from the result when no chapter selection or curriculum was
/// supplied — absence and zero coverage are distinguishable states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageProgramme {
    pub total_chapters: usize,
    pub seen_chapters: usize,
    pub in_progress_chapters: usize,
    pub seen_chapter_ratio: f64,
    /// Share of evaluated skills among skills of seen/in-progress chapters.
    pub evaluated_skill_ratio: f64,
}

/// Alert severity channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Danger,
    Warning,
    Info,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Danger => write!(f, "danger"),
            AlertKind::Warning => write!(f, "warning"),
            AlertKind::Info => write!(f, "info"),
        }
    }
}

/// A detected alert with an optional staff-facing impact note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub impact: Option<String>,
}

/// Overall input-quality bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBucket {
    Good,
    Partial,
    Insufficient,
}

impl fmt::Display for QualityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityBucket::Good => write!(f, "good"),
            QualityBucket::Partial => write!(f, "partial"),
            QualityBucket::Insufficient => write!(f, "insufficient"),
        }
    }
}

/// Input completeness/coherence counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQuality {
    /// Domains with at least two evaluated competencies.
    pub active_domains: usize,
    pub evaluated_competencies: usize,
    pub not_studied_competencies: usize,
    pub unknown_competencies: usize,
    pub low_confidence: bool,
    pub quality: QualityBucket,
    pub coherence_issues: usize,
    pub mini_test_filled: bool,
    pub critical_fields_missing: usize,
}

/// Severity of an inconsistency flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// An internally contradictory signal detected in the raw data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InconsistencyFlag {
    pub code: String,
    pub message: String,
    /// Input fields involved in the contradiction.
    pub fields: Vec<String>,
    pub severity: Severity,
}

/// One prioritized skill for remediation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityItem {
    #[serde(default)]
    pub skill_id: Option<String>,
    pub skill_label: String,
    pub domain: String,
    /// Short templated justification referencing mastery/status.
    pub reason: String,
    pub impact: String,
    #[serde(default)]
    pub exercise_type: Option<String>,
}

/// Pallier recommendation, the engine's headline decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Pallier2_confirmed")]
    Pallier2Confirmed,
    #[serde(rename = "Pallier2_conditional")]
    Pallier2Conditional,
    #[serde(rename = "Pallier1")]
    Pallier1,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Pallier2Confirmed => write!(f, "Pallier2_confirmed"),
            Recommendation::Pallier2Conditional => write!(f, "Pallier2_conditional"),
            Recommendation::Pallier1 => write!(f, "Pallier1"),
        }
    }
}

/// Display bucket for the trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Green,
    Orange,
    Red,
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustLevel::Green => write!(f, "green"),
            TrustLevel::Orange => write!(f, "orange"),
            TrustLevel::Red => write!(f, "red"),
        }
    }
}

/// The engine's single output object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringV2Result {
    /// Mastery on evaluated competencies (0-100).
    pub mastery_index: u8,
    /// Program coverage (0-100).
    pub coverage_index: u8,
    /// Exam readiness: automatisms + time + writing + stress (0-100).
    pub exam_readiness_index: u8,
    /// Weighted readiness blend minus prerequisite penalty (0-100).
    pub readiness_score: u8,
    /// Risk blend over domain tiers, stress and friction signals (0-100).
    pub risk_index: u8,
    pub recommendation: Recommendation,
    pub recommendation_message: String,
    /// Audit-friendly justification for the decision.
    pub justification: String,
    /// Conditions that would move the profile up a tier.
    pub upgrade_conditions: Vec<String>,
    pub domain_scores: Vec<DomainScore>,
    pub alerts: Vec<Alert>,
    pub data_quality: DataQuality,
    pub trust_score: u8,
    pub trust_level: TrustLevel,
    pub top_priorities: Vec<PriorityItem>,
    pub quick_wins: Vec<PriorityItem>,
    pub high_risk: Vec<PriorityItem>,
    pub inconsistencies: Vec<InconsistencyFlag>,
    #[serde(default)]
    pub coverage_programme: Option<CoverageProgramme>,
}
