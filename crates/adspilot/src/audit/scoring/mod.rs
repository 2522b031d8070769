mod results;
pub(crate) mod rules;

pub use results::{
    AndromedaResult, AtlasResult, AuditResult, CpaStatus, CreativeResult, MercuryResult,
    OracleResult, RecommendationType, SalesProjection, UnitEconomics,
};

use super::advice::{self, Advice, OwnedProducts};
use super::benchmark::{self, NicheBenchmark};
use super::creative::{ChecklistInput, CreativeScan};
use super::domain::{AuditInput, AuditMetrics, AuditModule, FieldWarning};
use rules::TargetBasis;
use serde::{Deserialize, Serialize};

/// Degenerate-but-valid situations worth surfacing next to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringNotice {
    ZeroMargin,
    ZeroCurrentCpa,
    ZeroOrderValue,
    UnknownNiche { niche: String },
}

impl ScoringNotice {
    pub fn message(&self) -> String {
        match self {
            Self::ZeroMargin => "marge nulle : seuil de ROAS non calculable".to_string(),
            Self::ZeroCurrentCpa => "CPA actuel nul : ventes hebdo non estimées".to_string(),
            Self::ZeroOrderValue => "panier moyen nul : ratio LTV non calculable".to_string(),
            Self::UnknownNiche { niche } => {
                format!("niche '{niche}' inconnue : benchmark générique appliqué")
            }
        }
    }
}

/// Full output of one audit run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringOutcome {
    pub module: AuditModule,
    pub benchmark: NicheBenchmark,
    pub result: AuditResult,
    pub advice: Vec<Advice>,
    pub warnings: Vec<FieldWarning>,
    pub notices: Vec<ScoringNotice>,
}

/// Derives the module's result from parsed metrics and the niche benchmark.
pub fn compute_results(
    module: AuditModule,
    metrics: &AuditMetrics,
    benchmark: &NicheBenchmark,
) -> AuditResult {
    match module {
        AuditModule::Andromeda => AuditResult::Andromeda(andromeda(metrics)),
        AuditModule::Oracle => {
            let unit_economics = rules::unit_economics(metrics);
            let above_breakeven = unit_economics.roas_threshold > 0.0
                && metrics.current_roas >= unit_economics.roas_threshold;
            AuditResult::Oracle(OracleResult {
                roas_gap: rules::finite(metrics.current_roas - benchmark.benchmark_roas),
                benchmark_roas: benchmark.benchmark_roas,
                above_breakeven,
                unit_economics,
            })
        }
        AuditModule::Mercury => AuditResult::Mercury(MercuryResult {
            emq_score: metrics.emq_score,
            benchmark_ctr: benchmark.benchmark_ctr,
            ctr_gap: rules::finite(metrics.current_ctr - benchmark.benchmark_ctr),
            signal_tier: advice::signal_tier(metrics.emq_score),
        }),
        AuditModule::Atlas => {
            let unit_economics = rules::unit_economics(metrics);
            let sales =
                rules::sales_projection(metrics, &unit_economics, TargetBasis::BudgetAtTargetCpa);
            AuditResult::Atlas(AtlasResult {
                min_weekly_budget: rules::min_weekly_budget(metrics, &sales),
                scaling_headroom: rules::finite(unit_economics.target_cpa - metrics.current_cpa),
                unit_economics,
                sales,
            })
        }
        AuditModule::Creative => {
            let scan = CreativeScan {
                hook: metrics.hook_score,
                offer: metrics.offer_score,
                desirability: metrics.desirability_score,
                checklist: ChecklistInput::Count(metrics.checklist_count.round().min(255.0) as u8),
            };
            let creative = scan.score();
            AuditResult::Creative(CreativeResult {
                ctr_gap: rules::finite(creative.estimated_ctr - benchmark.benchmark_ctr),
                benchmark_ctr: benchmark.benchmark_ctr,
                creative,
            })
        }
    }
}

pub(crate) fn andromeda(metrics: &AuditMetrics) -> AndromedaResult {
    let unit_economics = rules::unit_economics(metrics);
    let sales = rules::sales_projection(metrics, &unit_economics, TargetBasis::WeeklyVolume);
    let cash = rules::cash_flow(metrics, &sales);

    AndromedaResult {
        min_weekly_budget: rules::min_weekly_budget(metrics, &sales),
        marge_initiale: cash.marge_initiale,
        provision_par_client: cash.provision_par_client,
        tresorerie_latente_hebdo: cash.tresorerie_latente_hebdo,
        unit_economics,
        sales,
    }
}

fn notices(module: AuditModule, metrics: &AuditMetrics) -> Vec<ScoringNotice> {
    let mut notices = Vec::new();
    if benchmark::find(&metrics.niche).is_none() {
        notices.push(ScoringNotice::UnknownNiche {
            niche: metrics.niche.clone(),
        });
    }

    let uses_economics = matches!(
        module,
        AuditModule::Andromeda | AuditModule::Oracle | AuditModule::Atlas
    );
    if uses_economics && rules::is_zero(metrics.margin) {
        notices.push(ScoringNotice::ZeroMargin);
    }
    if matches!(module, AuditModule::Andromeda | AuditModule::Atlas)
        && rules::is_zero(metrics.current_cpa)
    {
        notices.push(ScoringNotice::ZeroCurrentCpa);
    }
    if module == AuditModule::Andromeda && rules::is_zero(metrics.pmv) {
        notices.push(ScoringNotice::ZeroOrderValue);
    }
    notices
}

/// Parse → benchmark lookup → module computation → advice, in one pure call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        module: AuditModule,
        input: &AuditInput,
        owned: &OwnedProducts,
    ) -> ScoringOutcome {
        let metrics = input.metrics();
        let benchmark = benchmark::lookup(&metrics.niche);
        let result = compute_results(module, &metrics, benchmark);
        let advice = advice::advise_all(&metrics, &result, owned);
        let notices = notices(module, &metrics);

        ScoringOutcome {
            module,
            benchmark: benchmark.clone(),
            result,
            advice,
            warnings: metrics.warnings,
            notices,
        }
    }
}
