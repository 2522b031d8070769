use super::super::advice::Tier;
use super::super::domain::WEEKS_PER_MONTH;
use super::super::scoring::{
    AuditResult, RecommendationType, SalesProjection, ScoringOutcome, UnitEconomics,
};
use super::format::{format_decimal, format_eur, format_percent, format_signed};
use super::views::{AuditReportView, ReportFigure};

/// Short verdict stored with a saved audit and shown in the CRM pipeline.
pub fn verdict_label(result: &AuditResult) -> &'static str {
    if let Some(recommendation) = result.recommendation_type() {
        return match recommendation {
            RecommendationType::ReduceCpa => "CPA hors de contrôle",
            RecommendationType::Optimize => "Rentable, à optimiser",
            RecommendationType::Scale => "Prêt à scaler",
        };
    }

    match result {
        AuditResult::Mercury(mercury) => match mercury.signal_tier {
            Tier::Red => "Tracking à reconstruire",
            Tier::Orange => "Tracking à fiabiliser",
            Tier::Green => "Tracking fiable",
        },
        AuditResult::Creative(creative) if creative.ctr_gap >= 0.0 => "Créa au-dessus du marché",
        _ => "Créa sous le marché",
    }
}

impl ScoringOutcome {
    pub fn report(&self) -> AuditReportView {
        let mut warnings: Vec<String> = self
            .warnings
            .iter()
            .map(|warning| {
                format!(
                    "{} : '{}' ({})",
                    warning.field,
                    warning.raw,
                    warning.reason.label()
                )
            })
            .collect();
        warnings.extend(self.notices.iter().map(|notice| notice.message()));

        AuditReportView {
            module: self.module,
            module_label: self.module.label(),
            niche_label: self.benchmark.label,
            headline: format!("{} · {}", self.module.label(), self.benchmark.label),
            verdict_label: verdict_label(&self.result),
            figures: figures(&self.result),
            advice: self.advice.clone(),
            warnings,
        }
    }
}

fn figure(key: &'static str, label: &'static str, value: String) -> ReportFigure {
    ReportFigure { key, label, value }
}

fn economics_figures(economics: &UnitEconomics, figures: &mut Vec<ReportFigure>) {
    figures.push(figure(
        "roas_threshold",
        "ROAS de rentabilité",
        format_decimal(economics.roas_threshold, 2),
    ));
    figures.push(figure("max_cpa", "CPA max (1er achat)", format_eur(economics.max_cpa)));
    figures.push(figure(
        "real_max_cpa",
        "CPA max réel (LTV 12 mois)",
        format_eur(economics.real_max_cpa),
    ));
    figures.push(figure("target_cpa", "CPA cible", format_eur(economics.target_cpa)));
    figures.push(figure(
        "cpa_status",
        "Statut CPA",
        economics.cpa_status.label().to_string(),
    ));
}

fn sales_figures(sales: &SalesProjection, figures: &mut Vec<ReportFigure>) {
    figures.push(figure(
        "ventes_actuelles_hebdo",
        "Ventes actuelles / semaine",
        format_decimal(sales.ventes_actuelles_hebdo, 1),
    ));
    figures.push(figure(
        "ventes_cibles_hebdo",
        "Ventes cibles / semaine",
        format_decimal(sales.ventes_cibles_hebdo, 1),
    ));
    figures.push(figure(
        "ventes_manquantes",
        "Ventes manquantes / semaine",
        format_decimal(sales.ventes_manquantes, 1),
    ));
}

fn figures(result: &AuditResult) -> Vec<ReportFigure> {
    let mut figures = Vec::new();
    match result {
        AuditResult::Andromeda(andromeda) => {
            economics_figures(&andromeda.unit_economics, &mut figures);
            sales_figures(&andromeda.sales, &mut figures);
            figures.push(figure(
                "min_weekly_budget",
                "Budget hebdo nécessaire",
                format_eur(andromeda.min_weekly_budget),
            ));
            figures.push(figure(
                "marge_initiale",
                "Marge initiale après acquisition",
                format_eur(andromeda.marge_initiale),
            ));
            figures.push(figure(
                "provision_par_client",
                "Provision par client",
                format_eur(andromeda.provision_par_client),
            ));
            figures.push(figure(
                "tresorerie_latente_hebdo",
                "Trésorerie latente / semaine",
                format_eur(andromeda.tresorerie_latente_hebdo),
            ));
            figures.push(figure(
                "tresorerie_latente_mensuelle",
                "Trésorerie latente / mois",
                format_eur(andromeda.tresorerie_latente_hebdo * WEEKS_PER_MONTH),
            ));
        }
        AuditResult::Oracle(oracle) => {
            economics_figures(&oracle.unit_economics, &mut figures);
            figures.push(figure(
                "benchmark_roas",
                "ROAS de référence (niche)",
                format_decimal(oracle.benchmark_roas, 2),
            ));
            figures.push(figure(
                "roas_gap",
                "Écart au ROAS de référence",
                format_signed(oracle.roas_gap, 2),
            ));
            figures.push(figure(
                "above_breakeven",
                "Au-dessus du seuil de rentabilité",
                if oracle.above_breakeven { "Oui" } else { "Non" }.to_string(),
            ));
        }
        AuditResult::Mercury(mercury) => {
            figures.push(figure(
                "emq_score",
                "Event Match Quality",
                format!("{} / 10", format_decimal(mercury.emq_score, 1)),
            ));
            figures.push(figure(
                "signal_tier",
                "Niveau de signal",
                mercury.signal_tier.label().to_string(),
            ));
            figures.push(figure(
                "benchmark_ctr",
                "CTR de référence (niche)",
                format_percent(mercury.benchmark_ctr),
            ));
            figures.push(figure(
                "ctr_gap",
                "Écart au CTR de référence",
                format_signed(mercury.ctr_gap, 2),
            ));
        }
        AuditResult::Atlas(atlas) => {
            economics_figures(&atlas.unit_economics, &mut figures);
            sales_figures(&atlas.sales, &mut figures);
            figures.push(figure(
                "min_weekly_budget",
                "Budget hebdo nécessaire",
                format_eur(atlas.min_weekly_budget),
            ));
            figures.push(figure(
                "scaling_headroom",
                "Marge sous le CPA cible",
                format_eur(atlas.scaling_headroom),
            ));
        }
        AuditResult::Creative(creative) => {
            let score = &creative.creative;
            figures.push(figure(
                "weighted_average",
                "Score créa pondéré",
                format!("{} / 10", format_decimal(score.weighted_average, 1)),
            ));
            figures.push(figure(
                "checklist_count",
                "Checklist validée",
                format!("{} / 10", score.checklist_count),
            ));
            figures.push(figure(
                "estimated_ctr",
                "CTR estimé",
                format_percent(score.estimated_ctr),
            ));
            figures.push(figure(
                "benchmark_ctr",
                "CTR de référence (niche)",
                format_percent(creative.benchmark_ctr),
            ));
            figures.push(figure(
                "ctr_gap",
                "Écart au CTR de référence",
                format_signed(creative.ctr_gap, 2),
            ));
        }
    }
    figures
}
