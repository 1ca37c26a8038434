//! Bilan export with JSON persistence.
//!
//! The engine itself is a pure function; identity and timestamps belong to
//! the persistence boundary only, so they live here and never inside
//! [`crate::engine`].

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::StudentIdentity;
use crate::results::ScoringV2Result;

/// A complete scored bilan, ready for persistence or display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BilanExport {
    /// Unique export identifier.
    pub id: Uuid,
    /// When the export was created.
    pub created_at: DateTime<Utc>,
    /// Definition key the scoring ran against.
    pub definition_key: String,
    pub student: StudentIdentity,
    pub scoring: ScoringV2Result,
    /// Retrieval queries derived from the scoring (≤ 4).
    pub queries: Vec<String>,
    /// Rendered Markdown documents, keyed by audience.
    #[serde(default)]
    pub documents: BTreeMap<String, String>,
}

impl BilanExport {
    /// Save the export as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize export")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        Ok(())
    }

    /// Load an export from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read export from {}", path.display()))?;
        let export: BilanExport =
            serde_json::from_str(&content).context("failed to parse export JSON")?;
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_scoring_v2;
    use crate::model::{BilanDataset, PolicyThresholds, ScoringPolicy, Threshold};
    use std::collections::BTreeMap as Map;

    fn make_export() -> BilanExport {
        let policy = ScoringPolicy {
            domain_weights: Map::new(),
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
        let scoring = compute_scoring_v2(&BilanDataset::default(), &policy, None, &[], None);
        BilanExport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            definition_key: "maths-premiere-p2".into(),
            student: StudentIdentity {
                first_name: "Amine".into(),
                last_name: "Ben Ali".into(),
            },
            scoring,
            queries: vec!["épreuve maths premiere préparation".into()],
            documents: BTreeMap::new(),
        }
    }

    #[test]
    fn json_roundtrip() {
        let export = make_export();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");

        export.save_json(&path).unwrap();
        let loaded = BilanExport::load_json(&path).unwrap();

        assert_eq!(loaded.definition_key, "maths-premiere-p2");
        assert_eq!(loaded.student.first_name, "Amine");
        assert_eq!(loaded.queries.len(), 1);
    }

    #[test]
    fn load_missing_file_errors_with_path() {
        let err = BilanExport::load_json(Path::new("no_such_export.json")).unwrap_err();
        assert!(err.to_string().contains("no_such_export.json"));
    }
}
