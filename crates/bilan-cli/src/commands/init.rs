//! The `bilan init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create example definition
    std::fs::create_dir_all("definitions")?;
    let definition_path = std::path::Path::new("definitions/example.toml");
    if definition_path.exists() {
        println!("definitions/example.toml already exists, skipping.");
    } else {
        std::fs::write(definition_path, EXAMPLE_DEFINITION)?;
        println!("Created definitions/example.toml");
    }

    // Create example dataset
    std::fs::create_dir_all("datasets")?;
    let dataset_path = std::path::Path::new("datasets/example.json");
    if dataset_path.exists() {
        println!("datasets/example.json already exists, skipping.");
    } else {
        std::fs::write(dataset_path, EXAMPLE_DATASET)?;
        println!("Created datasets/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Adapt definitions/example.toml to your curriculum");
    println!("  2. Run: bilan validate --definition definitions/example.toml");
    println!("  3. Run: bilan score --dataset datasets/example.json --definition definitions/example.toml");

    Ok(())
}

const EXAMPLE_DEFINITION: &str = r#"[definition]
key = "maths-premiere-example"
label = "Mathématiques Première — exemple"
track = "maths"
level = "premiere"

[policy.domain_weights]
algebra = 0.5
analysis = 0.5

[policy.thresholds.confirmed]
readiness = 60.0
risk = 55.0

[policy.thresholds.conditional]
readiness = 48.0
risk = 70.0

[exam_format]
duration_minutes = 120
calculator_allowed = false
structure = "Partie automatismes sans calculatrice + 2 exercices rédigés"

[[chapters]]
chapter_id = "ch_eq1"
chapter_label = "Équations du premier degré"
domain_id = "algebra"
skills = ["alg_eq1", "alg_eq2"]
rag_topics = ["equation", "premier_degre"]

[[chapters]]
chapter_id = "ch_deriv"
chapter_label = "Dérivation"
domain_id = "analysis"
skills = ["ana_deriv", "ana_fonc"]
rag_topics = ["derivee", "tangente"]

[[skill_meta]]
skill_id = "alg_eq1"
chapter_id = "ch_eq1"
prerequisite = true
prerequisite_level = "core"

[[skill_meta]]
skill_id = "ana_deriv"
chapter_id = "ch_deriv"
"#;

const EXAMPLE_DATASET: &str = r#"{
  "identity": { "first_name": "Amine", "last_name": "Ben Ali" },
  "track": "maths",
  "level": "premiere",
  "competencies": {
    "algebra": [
      { "skill_id": "alg_eq1", "skill_label": "Équations du premier degré", "status": "studied", "mastery": 2, "confidence": 2, "friction": 1 },
      { "skill_id": "alg_eq2", "skill_label": "Inéquations", "status": "studied", "mastery": 1, "confidence": 1, "friction": 2, "error_types": ["signe"] }
    ],
    "analysis": [
      { "skill_id": "ana_deriv", "skill_label": "Dérivées", "status": "in_progress", "mastery": 1, "confidence": 1, "friction": 2 },
      { "skill_id": "ana_fonc", "skill_label": "Variations de fonctions", "status": "not_studied" }
    ]
  },
  "exam_prep": {
    "mini_test": { "score": 3, "time_used_minutes": 14, "completed_in_time": true },
    "self_ratings": { "speed_no_calc": 1, "calc_reliability": 2, "redaction": 1, "justifications": 1, "stress": 2 },
    "signals": { "verified_answers": false, "feeling": "unsure" }
  },
  "methodology": {
    "learning_style": "visuel",
    "weekly_work_hours": 2.5,
    "max_concentration": "45min",
    "error_types": ["calcul", "signe"]
  },
  "context": { "declared_average": 12.5, "establishment": "Lycée Carnot" },
  "chapters": {
    "selected": ["ch_eq1"],
    "in_progress": ["ch_deriv"],
    "not_yet": []
  },
  "free_text": {
    "objectif": "Je veux progresser en analyse avant l'épreuve."
  }
}
"#;
