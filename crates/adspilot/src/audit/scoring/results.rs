use super::super::advice::Tier;
use super::super::creative::CreativeScore;
use super::super::domain::AuditModule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpaStatus {
    Good,
    Warning,
    Bad,
}

impl CpaStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "CPA sain",
            Self::Warning => "CPA au-dessus de la cible",
            Self::Bad => "CPA au-delà du seuil de rentabilité",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    ReduceCpa,
    Scale,
    Optimize,
}

impl RecommendationType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReduceCpa => "Réduire le CPA",
            Self::Scale => "Scaler",
            Self::Optimize => "Optimiser",
        }
    }
}

/// Breakeven figures shared by every module that reasons about CPA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEconomics {
    /// Breakeven ROAS (`1 / margin`), `0` when the margin is unusable.
    pub roas_threshold: f64,
    /// Breakeven CPA on the first order.
    pub max_cpa: f64,
    /// Breakeven CPA over the 12-month customer value.
    pub real_max_cpa: f64,
    pub target_cpa: f64,
    pub cpa_status: CpaStatus,
    pub recommendation_type: RecommendationType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesProjection {
    pub ventes_actuelles_hebdo: f64,
    pub ventes_cibles_hebdo: f64,
    /// Never negative: selling above target is not an opportunity gap.
    pub ventes_manquantes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndromedaResult {
    pub unit_economics: UnitEconomics,
    pub sales: SalesProjection,
    pub min_weekly_budget: f64,
    pub marge_initiale: f64,
    pub provision_par_client: f64,
    pub tresorerie_latente_hebdo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleResult {
    pub unit_economics: UnitEconomics,
    pub benchmark_roas: f64,
    pub roas_gap: f64,
    pub above_breakeven: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MercuryResult {
    pub emq_score: f64,
    pub benchmark_ctr: f64,
    pub ctr_gap: f64,
    pub signal_tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasResult {
    pub unit_economics: UnitEconomics,
    pub sales: SalesProjection,
    pub min_weekly_budget: f64,
    /// Room left under the target CPA; negative once the target is exceeded.
    pub scaling_headroom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeResult {
    pub creative: CreativeScore,
    pub benchmark_ctr: f64,
    pub ctr_gap: f64,
}

/// Module-specific audit output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum AuditResult {
    Andromeda(AndromedaResult),
    Oracle(OracleResult),
    Mercury(MercuryResult),
    Atlas(AtlasResult),
    Creative(CreativeResult),
}

impl AuditResult {
    pub fn module(&self) -> AuditModule {
        match self {
            Self::Andromeda(_) => AuditModule::Andromeda,
            Self::Oracle(_) => AuditModule::Oracle,
            Self::Mercury(_) => AuditModule::Mercury,
            Self::Atlas(_) => AuditModule::Atlas,
            Self::Creative(_) => AuditModule::Creative,
        }
    }

    pub fn unit_economics(&self) -> Option<&UnitEconomics> {
        match self {
            Self::Andromeda(result) => Some(&result.unit_economics),
            Self::Oracle(result) => Some(&result.unit_economics),
            Self::Atlas(result) => Some(&result.unit_economics),
            Self::Mercury(_) | Self::Creative(_) => None,
        }
    }

    pub fn sales(&self) -> Option<&SalesProjection> {
        match self {
            Self::Andromeda(result) => Some(&result.sales),
            Self::Atlas(result) => Some(&result.sales),
            _ => None,
        }
    }

    pub fn tresorerie_latente_hebdo(&self) -> Option<f64> {
        match self {
            Self::Andromeda(result) => Some(result.tresorerie_latente_hebdo),
            _ => None,
        }
    }

    pub fn recommendation_type(&self) -> Option<RecommendationType> {
        self.unit_economics()
            .map(|economics| economics.recommendation_type)
    }
}
