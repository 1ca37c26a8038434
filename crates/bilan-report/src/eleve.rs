//! Student-facing bilan: motivational register, actionable, tutoiement.

use bilan_core::model::Track;
use bilan_core::results::{AlertKind, ScoringV2Result, TrustLevel};

use crate::{discipline_label, domain_label, level_label, mastery_percent, RenderContext};

/// Render the élève bilan.
pub fn render_eleve_bilan(scoring: &ScoringV2Result, ctx: &RenderContext) -> String {
    let mut lines: Vec<String> = Vec::new();
    let disc = discipline_label(ctx.tags.track);
    let lvl = level_label(ctx.tags.level);

    lines.push(format!("# 📊 Mon Diagnostic {disc}"));
    lines.push(String::new());
    lines.push(format!(
        "Bonjour {} ! Voici ton bilan personnalisé pour préparer l'épreuve de {disc} en {lvl}.",
        ctx.first_name
    ));
    lines.push(String::new());

    lines.push("## En résumé".into());
    lines.push(String::new());
    lines.push(format!(
        "- **Score de préparation** : {}/100",
        scoring.readiness_score
    ));
    lines.push(format!("- **Maîtrise** : {}/100", scoring.mastery_index));
    lines.push(format!(
        "- **Couverture du programme** : {}/100",
        scoring.coverage_index
    ));
    lines.push(format!(
        "- **Préparation épreuve** : {}/100",
        scoring.exam_readiness_index
    ));
    lines.push(format!("- **Décision** : {}", scoring.recommendation_message));
    lines.push(String::new());

    if scoring.trust_level == TrustLevel::Red {
        lines.push(
            "> ⚠️ *Certaines données sont incomplètes — ce bilan est à confirmer en séance.*"
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
        lines.push("## ✅ Tes points forts".into());
        lines.push(String::new());
        for s in strengths.iter().take(3) {
            lines.push(format!(
                "- **{}** : {}% — continue comme ça !",
                domain_label(&s.domain),
                s.score
            ));
        }
        lines.push(String::new());
    }

    if !scoring.top_priorities.is_empty() {
        lines.push("## 🎯 Tes priorités".into());
        lines.push(String::new());
        for p in scoring.top_priorities.iter().take(5) {
            lines.push(format!(
                "- **{}** ({}) — {}",
                p.skill_label,
                domain_label(&p.domain),
                p.reason
            ));
            if let Some(exercise) = &p.exercise_type {
                lines.push(format!("  → *{exercise}*"));
            }
        }
        lines.push(String::new());
    }

    if !scoring.quick_wins.is_empty() {
        lines.push("## 💡 Gains rapides".into());
        lines.push(String::new());
        for q in &scoring.quick_wins {
            lines.push(format!("- **{}** — {}", q.skill_label, q.reason));
            if let Some(exercise) = &q.exercise_type {
                lines.push(format!("  → *{exercise}*"));
            }
        }
        lines.push(String::new());
    }

    lines.push("## 🧠 Ton profil".into());
    lines.push(String::new());
    if let Some(style) = &ctx.learning_style {
        lines.push(format!("- Style d'apprentissage : **{style}**"));
    }
    if let Some(concentration) = &ctx.max_concentration {
        lines.push(format!("- Concentration max : **{concentration}**"));
    }
    if let Some(work) = &ctx.weekly_work {
        lines.push(format!("- Travail hebdo : **{work}**"));
    }
    lines.push(String::new());

    if !ctx.weak_prerequisites.is_empty() {
        lines.push("## 🧱 Bases à consolider".into());
        lines.push(String::new());
        lines.push(
            "Ces fondamentaux sont importants pour la suite du programme, même si tu ne les as pas encore abordés en classe cette année :"
                .into(),
        );
        lines.push(String::new());
        for p in &ctx.weak_prerequisites {
            lines.push(format!(
                "- **{}** ({}) — maîtrise actuelle : {}%",
                p.skill_label,
                domain_label(&p.domain),
                mastery_percent(p.mastery)
            ));
        }
        lines.push(String::new());
    }

    lines.push("## 📅 Ton micro-plan d'entraînement".into());
    lines.push(String::new());
    match ctx.tags.track {
        Track::Nsi => {
            lines.push("**⏱ 5 min** : relire 1 fiche mémo (structure de données, complexité, ou SQL)".into());
            lines.push("**⏱ 15 min** : résoudre 1 exercice de code ou 1 requête SQL sur papier".into());
            lines.push("**⏱ 30 min** : implémenter 1 algorithme complet (tri, parcours, ou requête multi-tables)".into());
        }
        Track::Maths => {
            lines.push("**⏱ 5 min** : 3 calculs d'automatismes sans calculatrice".into());
            lines.push("**⏱ 15 min** : reprendre 1 compétence prioritaire (exercice type)".into());
            lines.push("**⏱ 30 min** : 1 exercice complet en conditions d'examen (rédaction soignée)".into());
        }
    }
    lines.push(String::new());
    lines.push("> Adapte ce plan à ton rythme : l'important est la **régularité**, pas la durée.".into());
    lines.push(String::new());

    let attention: Vec<_> = scoring
        .alerts
        .iter()
        .filter(|a| matches!(a.kind, AlertKind::Danger | AlertKind::Warning))
        .collect();
    if !attention.is_empty() {
        lines.push("## ⚡ Points d'attention".into());
        lines.push(String::new());
        for a in attention {
            lines.push(format!("- {}", a.message));
        }
        lines.push(String::new());
    }

    lines.push("---".into());
    lines.push(format!("*{}*", scoring.recommendation_message));

    lines.join("\n")
}
