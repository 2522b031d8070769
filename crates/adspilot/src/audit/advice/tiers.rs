use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Red,
    Orange,
    Green,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Critique",
            Self::Orange => "À surveiller",
            Self::Green => "Solide",
        }
    }
}

const SIGNAL_RED_BELOW: f64 = 5.0;
const SIGNAL_ORANGE_BELOW: f64 = 8.0;
const LTV_RED_RATIO_BELOW: f64 = 1.3;
const LTV_ORANGE_RATIO_BELOW: f64 = 2.5;
/// Monthly latent cash (€) above which the LTV axis is red regardless of ratio.
const LTV_RED_MONTHLY_LOSS_ABOVE: f64 = 500.0;

pub fn signal_tier(emq_score: f64) -> Tier {
    if emq_score < SIGNAL_RED_BELOW {
        Tier::Red
    } else if emq_score < SIGNAL_ORANGE_BELOW {
        Tier::Orange
    } else {
        Tier::Green
    }
}

pub fn ltv_tier(ltv_ratio: f64, monthly_latent_loss: f64) -> Tier {
    if monthly_latent_loss > LTV_RED_MONTHLY_LOSS_ABOVE || ltv_ratio < LTV_RED_RATIO_BELOW {
        Tier::Red
    } else if ltv_ratio < LTV_ORANGE_RATIO_BELOW {
        Tier::Orange
    } else {
        Tier::Green
    }
}

pub fn scaling_tier(current_cpa: f64, real_max_cpa: f64, target_cpa: f64) -> Tier {
    if current_cpa > real_max_cpa {
        Tier::Red
    } else if current_cpa > target_cpa {
        Tier::Orange
    } else {
        Tier::Green
    }
}
