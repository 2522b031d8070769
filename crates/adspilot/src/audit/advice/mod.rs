mod templates;
mod tiers;

pub use tiers::{ltv_tier, scaling_tier, signal_tier, Tier};

use super::domain::{AuditMetrics, WEEKS_PER_MONTH};
use super::scoring::{rules, AuditResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Paid guides linked to each advice axis. The serialized names are shared with
/// the checkout provider and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductId {
    #[serde(rename = "SOS Signal")]
    SosSignal,
    #[serde(rename = "LTV Maximal")]
    LtvMaximal,
    #[serde(rename = "Scale & Sniper")]
    ScaleSniper,
}

impl ProductId {
    pub const fn ordered() -> [Self; 3] {
        [Self::SosSignal, Self::LtvMaximal, Self::ScaleSniper]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SosSignal => "SOS Signal",
            Self::LtvMaximal => "LTV Maximal",
            Self::ScaleSniper => "Scale & Sniper",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ordered()
            .into_iter()
            .find(|product| product.as_str().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Products the acting user already bought.
pub type OwnedProducts = BTreeSet<ProductId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceAxis {
    Signal,
    Ltv,
    Scaling,
}

impl AdviceAxis {
    pub const fn ordered() -> [Self; 3] {
        [Self::Signal, Self::Ltv, Self::Scaling]
    }

    pub const fn product(self) -> ProductId {
        match self {
            Self::Signal => ProductId::SosSignal,
            Self::Ltv => ProductId::LtvMaximal,
            Self::Scaling => ProductId::ScaleSniper,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Signal => "Qualité du signal",
            Self::Ltv => "Valeur vie client",
            Self::Scaling => "Sécurité du scaling",
        }
    }
}

/// Presentation status. `Mastered` replaces the computed tier once the user owns
/// the axis product; the computed tier stays available in [`Advice::tier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceStatus {
    Red,
    Orange,
    Green,
    Mastered,
}

impl From<Tier> for AdviceStatus {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Red => Self::Red,
            Tier::Orange => Self::Orange,
            Tier::Green => Self::Green,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub axis: AdviceAxis,
    pub status: AdviceStatus,
    pub tier: Tier,
    pub title: String,
    pub text: String,
    pub action: String,
    pub product_id: ProductId,
}

/// Figures the three axes read, taken from the result when the module computed
/// them and derived from the metrics otherwise.
struct AxisFigures {
    emq_score: f64,
    ltv_ratio: f64,
    monthly_latent_cash: f64,
    current_cpa: f64,
    real_max_cpa: f64,
    target_cpa: f64,
}

impl AxisFigures {
    fn resolve(metrics: &AuditMetrics, result: &AuditResult) -> Self {
        let economics = result
            .unit_economics()
            .cloned()
            .unwrap_or_else(|| rules::unit_economics(metrics));
        let weekly_latent_cash = result
            .tresorerie_latente_hebdo()
            .unwrap_or_else(|| super::scoring::andromeda(metrics).tresorerie_latente_hebdo);

        Self {
            emq_score: metrics.emq_score,
            ltv_ratio: rules::safe_div(metrics.ltv, metrics.pmv),
            monthly_latent_cash: rules::finite(weekly_latent_cash * WEEKS_PER_MONTH),
            current_cpa: metrics.current_cpa,
            real_max_cpa: economics.real_max_cpa,
            target_cpa: economics.target_cpa,
        }
    }

    fn tier(&self, axis: AdviceAxis) -> Tier {
        match axis {
            AdviceAxis::Signal => signal_tier(self.emq_score),
            AdviceAxis::Ltv => ltv_tier(self.ltv_ratio, self.monthly_latent_cash),
            AdviceAxis::Scaling => {
                scaling_tier(self.current_cpa, self.real_max_cpa, self.target_cpa)
            }
        }
    }
}

/// Classifies one axis. Ownership of the axis product only changes presentation.
pub fn classify(
    axis: AdviceAxis,
    metrics: &AuditMetrics,
    result: &AuditResult,
    owned: &OwnedProducts,
) -> Advice {
    let tier = AxisFigures::resolve(metrics, result).tier(axis);
    build_advice(axis, tier, owned)
}

/// The three axes in display order: signal, LTV, scaling.
pub fn advise_all(metrics: &AuditMetrics, result: &AuditResult, owned: &OwnedProducts) -> Vec<Advice> {
    let figures = AxisFigures::resolve(metrics, result);
    AdviceAxis::ordered()
        .into_iter()
        .map(|axis| build_advice(axis, figures.tier(axis), owned))
        .collect()
}

fn build_advice(axis: AdviceAxis, tier: Tier, owned: &OwnedProducts) -> Advice {
    let product_id = axis.product();
    let (status, template) = if owned.contains(&product_id) {
        (AdviceStatus::Mastered, templates::mastered_template(axis))
    } else {
        (AdviceStatus::from(tier), templates::template(axis, tier))
    };

    Advice {
        axis,
        status,
        tier,
        title: template.title.to_string(),
        text: template.text.to_string(),
        action: template.action.to_string(),
        product_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::benchmark;
    use crate::audit::domain::AuditModule;
    use crate::audit::scoring::compute_results;

    fn metrics(emq: f64) -> AuditMetrics {
        AuditMetrics {
            pmv: 75.0,
            ltv: 240.0,
            margin: 0.6,
            target_roas: 3.0,
            target_volume: 10.0,
            current_cpa: 20.0,
            current_budget: 4000.0,
            emq_score: emq,
            niche: "ecom_home".to_string(),
            ..AuditMetrics::default()
        }
    }

    fn advice_for(axis: AdviceAxis, metrics: &AuditMetrics, owned: &OwnedProducts) -> Advice {
        let result = compute_results(
            AuditModule::Andromeda,
            metrics,
            benchmark::lookup(&metrics.niche),
        );
        classify(axis, metrics, &result, owned)
    }

    #[test]
    fn low_emq_is_blind_signal() {
        let advice = advice_for(AdviceAxis::Signal, &metrics(4.0), &OwnedProducts::new());
        assert_eq!(advice.status, AdviceStatus::Red);
        assert_eq!(advice.title, "Signal Aveugle");
        assert_eq!(advice.product_id, ProductId::SosSignal);
    }

    #[test]
    fn emq_of_eight_is_champion() {
        let advice = advice_for(AdviceAxis::Signal, &metrics(8.0), &OwnedProducts::new());
        assert_eq!(advice.status, AdviceStatus::Green);
        assert_eq!(advice.title, "Signal Champion");

        let advice = advice_for(AdviceAxis::Signal, &metrics(5.0), &OwnedProducts::new());
        assert_eq!(advice.title, "Signal Instable");
    }

    #[test]
    fn owned_product_switches_to_mastered_but_keeps_tier() {
        let owned: OwnedProducts = [ProductId::SosSignal].into_iter().collect();
        let advice = advice_for(AdviceAxis::Signal, &metrics(3.0), &owned);
        assert_eq!(advice.status, AdviceStatus::Mastered);
        assert_eq!(advice.tier, Tier::Red);
        assert_eq!(advice.title, "Signal Maîtrisé");

        let scaling = advice_for(AdviceAxis::Scaling, &metrics(3.0), &owned);
        assert_ne!(scaling.status, AdviceStatus::Mastered);
    }

    #[test]
    fn ltv_axis_goes_red_when_latent_cash_is_large() {
        let mut input = metrics(9.0);
        input.target_volume = 80.0;
        let advice = advice_for(AdviceAxis::Ltv, &input, &OwnedProducts::new());
        assert_eq!(advice.tier, Tier::Red);
        assert_eq!(advice.title, "Fuite de Trésorerie");
    }

    #[test]
    fn ltv_axis_green_with_strong_ratio_and_no_gap() {
        let mut input = metrics(9.0);
        input.target_volume = 0.0;
        let advice = advice_for(AdviceAxis::Ltv, &input, &OwnedProducts::new());
        assert_eq!(advice.tier, Tier::Green);
    }

    #[test]
    fn modules_without_economics_fall_back_to_metrics() {
        let input = metrics(9.0);
        let result = compute_results(AuditModule::Mercury, &input, benchmark::lookup("ecom_home"));
        let advice = advise_all(&input, &result, &OwnedProducts::new());
        let axes: Vec<_> = advice.iter().map(|entry| entry.axis).collect();
        assert_eq!(axes, AdviceAxis::ordered().to_vec());
        assert_eq!(advice[2].tier, Tier::Green);
    }

    #[test]
    fn product_ids_serialize_to_contract_names() {
        let json = serde_json::to_string(&ProductId::ordered()).expect("serialize");
        assert_eq!(json, r#"["SOS Signal","LTV Maximal","Scale & Sniper"]"#);
        assert_eq!(ProductId::parse("scale & sniper"), Some(ProductId::ScaleSniper));
    }
}
