use super::super::domain::{AuditMetrics, WEEKS_PER_MONTH};
use super::results::{CpaStatus, RecommendationType, SalesProjection, UnitEconomics};

/// Divisors at or below this are treated as zero.
const ZERO_GUARD: f64 = 1e-9;

/// How the weekly sales target is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TargetBasis {
    /// The client's declared weekly unit target.
    WeeklyVolume,
    /// What the current monthly budget would buy at the target CPA.
    BudgetAtTargetCpa,
}

pub(crate) struct CashFlow {
    pub marge_initiale: f64,
    pub provision_par_client: f64,
    pub tresorerie_latente_hebdo: f64,
}

pub(crate) fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub(crate) fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() <= ZERO_GUARD {
        0.0
    } else {
        finite(numerator / denominator)
    }
}

pub(crate) fn is_zero(value: f64) -> bool {
    value.abs() <= ZERO_GUARD
}

pub(crate) fn roas_threshold(margin: f64) -> f64 {
    if margin <= ZERO_GUARD {
        return 0.0;
    }
    safe_div(1.0, margin)
}

pub(crate) fn target_cpa(metrics: &AuditMetrics, max_cpa: f64) -> f64 {
    if metrics.target_roas <= ZERO_GUARD {
        max_cpa
    } else {
        safe_div(metrics.pmv, metrics.target_roas)
    }
}

/// `bad` is checked before `warning`: a CPA above breakeven is never merely "above target".
pub(crate) fn cpa_status(current_cpa: f64, real_max_cpa: f64, target_cpa: f64) -> CpaStatus {
    if current_cpa > real_max_cpa {
        CpaStatus::Bad
    } else if current_cpa > target_cpa {
        CpaStatus::Warning
    } else {
        CpaStatus::Good
    }
}

pub(crate) fn recommendation_for(status: CpaStatus) -> RecommendationType {
    match status {
        CpaStatus::Bad => RecommendationType::ReduceCpa,
        CpaStatus::Warning => RecommendationType::Optimize,
        CpaStatus::Good => RecommendationType::Scale,
    }
}

pub(crate) fn unit_economics(metrics: &AuditMetrics) -> UnitEconomics {
    let roas_threshold = roas_threshold(metrics.margin);
    let max_cpa = finite(metrics.pmv * metrics.margin);
    let real_max_cpa = finite(metrics.ltv * metrics.margin);
    let target_cpa = target_cpa(metrics, max_cpa);
    let cpa_status = cpa_status(metrics.current_cpa, real_max_cpa, target_cpa);

    UnitEconomics {
        roas_threshold,
        max_cpa,
        real_max_cpa,
        target_cpa,
        cpa_status,
        recommendation_type: recommendation_for(cpa_status),
    }
}

pub(crate) fn weekly_sales(monthly_budget: f64, cpa: f64) -> f64 {
    safe_div(monthly_budget, cpa * WEEKS_PER_MONTH)
}

pub(crate) fn sales_projection(
    metrics: &AuditMetrics,
    economics: &UnitEconomics,
    basis: TargetBasis,
) -> SalesProjection {
    let ventes_actuelles_hebdo = weekly_sales(metrics.current_budget, metrics.current_cpa);
    let ventes_cibles_hebdo = match basis {
        TargetBasis::WeeklyVolume => metrics.target_volume,
        TargetBasis::BudgetAtTargetCpa => weekly_sales(metrics.current_budget, economics.target_cpa),
    };
    let ventes_manquantes = (ventes_cibles_hebdo - ventes_actuelles_hebdo).max(0.0);

    SalesProjection {
        ventes_actuelles_hebdo,
        ventes_cibles_hebdo: finite(ventes_cibles_hebdo),
        ventes_manquantes: finite(ventes_manquantes),
    }
}

pub(crate) fn min_weekly_budget(metrics: &AuditMetrics, sales: &SalesProjection) -> f64 {
    finite(sales.ventes_cibles_hebdo * metrics.current_cpa)
}

pub(crate) fn cash_flow(metrics: &AuditMetrics, sales: &SalesProjection) -> CashFlow {
    let marge_initiale = finite(metrics.pmv * metrics.margin - metrics.current_cpa);
    let provision_par_client = finite(metrics.ltv * metrics.margin - metrics.current_cpa).max(0.0);
    let tresorerie_latente_hebdo = finite(sales.ventes_manquantes * provision_par_client);

    CashFlow {
        marge_initiale,
        provision_par_client,
        tresorerie_latente_hebdo,
    }
}
