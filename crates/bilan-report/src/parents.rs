//! Parent-facing bilan: reassurance register, vouvoiement.
//!
//! This variant never shows raw numeric scores or internal field names —
//! only qualitative labels derived from score bands. The decision
//! justification and upgrade conditions name internal indices, so they are
//! deliberately absent here (they belong to the nexus variant).

use bilan_core::model::Track;
use bilan_core::results::{AlertKind, ScoringV2Result, TrustLevel};

use crate::{discipline_label, domain_label, level_label, qualitative_label, RenderContext};

/// Render the parents bilan.
pub fn render_parents_bilan(scoring: &ScoringV2Result, ctx: &RenderContext) -> String {
    let mut lines: Vec<String> = Vec::new();
    let disc = discipline_label(ctx.tags.track);
    let lvl = level_label(ctx.tags.level);

    lines.push(format!("# Rapport de Positionnement — {disc}"));
    lines.push(String::new());
    lines.push("Madame, Monsieur,".into());
    lines.push(String::new());
    lines.push(format!(
        "Voici le bilan diagnostic de {} {} en {}, réalisé dans le cadre de la préparation à l'épreuve de {lvl}.",
        ctx.first_name,
        ctx.last_name,
        disc.to_lowercase()
    ));
    lines.push(String::new());

    lines.push("## Synthèse globale".into());
    lines.push(String::new());
    lines.push(format!(
        "Le niveau de préparation de {} est **{}**. {}.",
        ctx.first_name,
        qualitative_label(scoring.readiness_score),
        scoring.recommendation_message
    ));
    lines.push(String::new());

    if scoring.trust_level != TrustLevel::Green {
        lines.push(
            "> *Note : certaines données du questionnaire sont incomplètes. Les conclusions ci-dessous sont à confirmer lors de la première séance.*"
                .into(),
        );
        lines.push(String::new());
    }

    let mut strengths: Vec<_> = scoring
        .domain_scores
        .iter()
        .filter(|d| !d.priority.needs_attention())
        .collect();
    strengths.sort_by(|a, b| b.score.cmp(&a.score));
    if !strengths.is_empty() {
        lines.push("## Ce qui va bien".into());
        lines.push(String::new());
        for s in strengths.iter().take(3) {
            lines.push(format!(
                "- **{}** : niveau de maîtrise {}",
                domain_label(&s.domain),
                qualitative_label(s.score)
            ));
        }
        lines.push(String::new());
    }

    let mut weak: Vec<_> = scoring
        .domain_scores
        .iter()
        .filter(|d| d.priority.needs_attention())
        .collect();
    weak.sort_by(|a, b| a.score.cmp(&b.score));
    if !weak.is_empty() {
        lines.push("## Points d'attention".into());
        lines.push(String::new());
        for w in &weak {
            let gap_text = if w.gaps.is_empty() {
                String::new()
            } else {
                format!(
                    " ({})",
                    w.gaps.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
                )
            };
            lines.push(format!(
                "- **{}** : des lacunes identifiées nécessitant un travail ciblé{gap_text}",
                domain_label(&w.domain)
            ));
        }
        lines.push(String::new());
    }

    let danger: Vec<_> = scoring
        .alerts
        .iter()
        .filter(|a| a.kind == AlertKind::Danger)
        .collect();
    if !danger.is_empty() {
        lines.push("## Signaux d'alerte".into());
        lines.push(String::new());
        for a in danger {
            lines.push(format!("- {}", a.message));
        }
        lines.push(String::new());
    }

    lines.push("## Recommandation".into());
    lines.push(String::new());
    lines.push(scoring.recommendation_message.clone());
    lines.push(String::new());

    lines.push("## Ce que le stage va apporter".into());
    lines.push(String::new());
    lines.push("- Travail ciblé sur les lacunes identifiées".into());
    lines.push(match ctx.tags.track {
        Track::Nsi => "- Renforcement des compétences en programmation et algorithmique".into(),
        Track::Maths => "- Renforcement des automatismes pour la partie sans calculatrice".into(),
    });
    lines.push("- Accompagnement méthodologique personnalisé".into());
    if !scoring.quick_wins.is_empty() {
        let labels: Vec<&str> = scoring
            .quick_wins
            .iter()
            .map(|q| q.skill_label.as_str())
            .collect();
        lines.push(format!(
            "- Des progrès rapides sont attendus sur : {}",
            labels.join(", ")
        ));
    }
    lines.push(String::new());

    lines.push(format!("## Comment accompagner {}", ctx.first_name));
    lines.push(String::new());
    lines.push("- Encourager une routine quotidienne de 15-20 minutes".into());
    lines.push("- Valoriser les progrès, même petits".into());
    if scoring
        .alerts
        .iter()
        .any(|a| a.code == "HIGH_STRESS" || a.code == "PANIC_SIGNAL")
    {
        lines.push("- Attention au stress : un accompagnement bienveillant est essentiel".into());
    }
    lines.push(String::new());

    lines.push("---".into());
    lines.push("*Bilan réalisé par Nexus Réussite — Centre de soutien scolaire*".into());

    lines.join("\n")
}
