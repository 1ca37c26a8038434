//! Staff-facing bilan: technical register, raw indices, tables.
//!
//! The only variant allowed to show raw index values and internal field
//! names verbatim.

use bilan_core::results::ScoringV2Result;

use crate::{domain_label, RenderContext};

/// Render the nexus (internal) bilan.
pub fn render_nexus_bilan(scoring: &ScoringV2Result, ctx: &RenderContext) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "# Fiche Pédagogique — {} {}",
        ctx.first_name, ctx.last_name
    ));
    lines.push(String::new());

    lines.push("## Qualité des données".into());
    lines.push(String::new());
    lines.push("| Métrique | Valeur |".into());
    lines.push("|----------|--------|".into());
    lines.push(format!(
        "| TrustScore | **{}/100** ({}) |",
        scoring.trust_score, scoring.trust_level
    ));
    lines.push(format!(
        "| Domaines actifs | {} |",
        scoring.data_quality.active_domains
    ));
    lines.push(format!(
        "| Compétences évaluées | {} |",
        scoring.data_quality.evaluated_competencies
    ));
    lines.push(format!(
        "| Non étudiées | {} |",
        scoring.data_quality.not_studied_competencies
    ));
    lines.push(format!(
        "| Inconnues | {} |",
        scoring.data_quality.unknown_competencies
    ));
    lines.push(format!("| Qualité | {} |", scoring.data_quality.quality));
    lines.push(format!(
        "| Incohérences | {} |",
        scoring.inconsistencies.len()
    ));
    lines.push(String::new());

    lines.push("## Scores".into());
    lines.push(String::new());
    lines.push("| Indice | Score |".into());
    lines.push("|--------|-------|".into());
    lines.push(format!(
        "| ReadinessScore | **{}/100** |",
        scoring.readiness_score
    ));
    lines.push(format!("| MasteryIndex | {}/100 |", scoring.mastery_index));
    lines.push(format!("| CoverageIndex | {}/100 |", scoring.coverage_index));
    lines.push(format!(
        "| ExamReadinessIndex | {}/100 |",
        scoring.exam_readiness_index
    ));
    lines.push(format!("| RiskIndex | {}/100 |", scoring.risk_index));
    lines.push(format!("| Recommandation | {} |", scoring.recommendation));
    lines.push(String::new());

    if let Some(cp) = &scoring.coverage_programme {
        lines.push("## Couverture du programme".into());
        lines.push(String::new());
        lines.push("| Métrique | Valeur |".into());
        lines.push("|----------|--------|".into());
        lines.push(format!(
            "| Chapitres vus | {}/{} |",
            cp.seen_chapters, cp.total_chapters
        ));
        lines.push(format!("| Chapitres en cours | {} |", cp.in_progress_chapters));
        lines.push(format!(
            "| Ratio couverture | **{:.0}%** |",
            cp.seen_chapter_ratio * 100.0
        ));
        lines.push(format!(
            "| Skills évalués (chapitres vus) | {:.0}% |",
            cp.evaluated_skill_ratio * 100.0
        ));
        lines.push(String::new());
    }

    lines.push("## Cartographie par domaine".into());
    lines.push(String::new());
    lines.push("| Domaine | Score | Évalués | Gaps | Erreurs | Priorité |".into());
    lines.push("|---------|-------|---------|------|---------|----------|".into());
    for d in &scoring.domain_scores {
        lines.push(format!(
            "| {} | {}% | {}/{} | {} | {} | {} |",
            domain_label(&d.domain),
            d.score,
            d.evaluated_count,
            d.total_count,
            if d.gaps.is_empty() {
                "—".to_string()
            } else {
                d.gaps.join(", ")
            },
            if d.dominant_errors.is_empty() {
                "—".to_string()
            } else {
                d.dominant_errors.join(", ")
            },
            d.priority
        ));
    }
    lines.push(String::new());

    if !scoring.high_risk.is_empty() {
        lines.push("## 🔴 Points bloquants".into());
        lines.push(String::new());
        for p in &scoring.high_risk {
            lines.push(format!(
                "- **{}** ({}) — {}",
                p.skill_label, p.domain, p.reason
            ));
        }
        lines.push(String::new());
    }

    if !scoring.top_priorities.is_empty() {
        lines.push("## 🟠 Priorités pédagogiques".into());
        lines.push(String::new());
        for p in &scoring.top_priorities {
            lines.push(format!(
                "- **{}** ({}) — {} → {}",
                p.skill_label,
                p.domain,
                p.reason,
                p.exercise_type.as_deref().unwrap_or("exercices ciblés")
            ));
        }
        lines.push(String::new());
    }

    if !scoring.quick_wins.is_empty() {
        lines.push("## 🟢 Gains rapides".into());
        lines.push(String::new());
        for p in &scoring.quick_wins {
            lines.push(format!(
                "- **{}** ({}) — {}",
                p.skill_label, p.domain, p.reason
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Alertes".into());
    lines.push(String::new());
    if scoring.alerts.is_empty() {
        lines.push("Aucune alerte.".into());
    } else {
        for a in &scoring.alerts {
            lines.push(format!(
                "- [{}] **{}** : {}",
                a.kind.to_string().to_uppercase(),
                a.code,
                a.message
            ));
            if let Some(impact) = &a.impact {
                lines.push(format!("  → {impact}"));
            }
        }
    }
    lines.push(String::new());

    if !scoring.inconsistencies.is_empty() {
        lines.push("## Incohérences détectées".into());
        lines.push(String::new());
        for inc in &scoring.inconsistencies {
            lines.push(format!(
                "- [{}] **{}** : {}",
                inc.severity.to_string().to_uppercase(),
                inc.code,
                inc.message
            ));
            lines.push(format!("  Champs : {}", inc.fields.join(", ")));
        }
        lines.push(String::new());
    }

    lines.push("## Profil cognitif".into());
    lines.push(String::new());
    lines.push(format!(
        "- Style : {}",
        ctx.learning_style.as_deref().unwrap_or("—")
    ));
    lines.push(format!(
        "- Réflexe blocage : {}",
        ctx.problem_reflex.as_deref().unwrap_or("—")
    ));
    lines.push(format!(
        "- Concentration : {}",
        ctx.max_concentration.as_deref().unwrap_or("—")
    ));
    lines.push(format!(
        "- Travail hebdo : {}",
        ctx.weekly_work.as_deref().unwrap_or("—")
    ));
    lines.push(format!(
        "- Mini-test : {}/6 en {}min ({})",
        ctx.mini_test_score,
        ctx.mini_test_time,
        if ctx.mini_test_completed {
            "terminé"
        } else {
            "non terminé"
        }
    ));
    lines.push(String::new());

    let verbatims: Vec<_> = ctx.verbatims.iter().filter(|(_, v)| !v.is_empty()).collect();
    if !verbatims.is_empty() {
        lines.push("## Verbatims élève".into());
        lines.push(String::new());
        for (key, value) in verbatims {
            lines.push(format!("- **{key}** : « {value} »"));
        }
        lines.push(String::new());
    }

    lines.push("## Justification décision".into());
    lines.push(String::new());
    lines.push(scoring.justification.clone());
    if !scoring.upgrade_conditions.is_empty() {
        lines.push(String::new());
        lines.push("**Conditions d'upgrade :**".into());
        for c in &scoring.upgrade_conditions {
            lines.push(format!("- {c}"));
        }
    }
    lines.push(String::new());

    lines.push("---".into());
    lines.push("*Généré automatiquement — données à valider en séance*".into());

    lines.join("\n")
}
