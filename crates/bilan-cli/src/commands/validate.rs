//! The `bilan validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(definition_path: PathBuf) -> Result<()> {
    let definitions = if definition_path.is_dir() {
        bilan_core::parser::load_definition_dir(&definition_path)?
    } else {
        vec![bilan_core::parser::parse_definition(&definition_path)?]
    };

    let mut total_warnings = 0;

    for def in &definitions {
        println!(
            "Definition: {} ({} chapters, {} skill annotations)",
            def.key,
            def.chapters.len(),
            def.skill_meta.len()
        );

        let warnings = bilan_core::parser::validate_definition(def);
        for w in &warnings {
            let prefix = w
                .chapter_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All definitions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
