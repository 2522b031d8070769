//! Scoring over the output of the creative vision scan.
//!
//! The scan itself (hook, offer and desirability scores plus the quality
//! checklist) comes from an external vision model; this module only turns
//! those numbers into a weighted score and an expected click-through rate.

use serde::{Deserialize, Serialize};

const HOOK_WEIGHT: f64 = 0.4;
const OFFER_WEIGHT: f64 = 0.3;
const DESIRABILITY_WEIGHT: f64 = 0.3;
/// CTR (%) reached by a creative scoring a perfect 10 with an empty checklist.
const CTR_CEILING: f64 = 2.2;
/// CTR points added per satisfied checklist item.
const CTR_PER_CHECK: f64 = 0.1;
pub const CHECKLIST_SIZE: u8 = 10;

/// The ten quality signals the vision model checks on a creative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreativeChecklist {
    pub hook_in_first_seconds: bool,
    pub clear_offer: bool,
    pub social_proof: bool,
    pub visible_product: bool,
    pub strong_cta: bool,
    pub mobile_format: bool,
    pub captions: bool,
    pub urgency: bool,
    pub benefit_led_copy: bool,
    pub brand_cue: bool,
}

impl CreativeChecklist {
    pub fn satisfied(&self) -> u8 {
        [
            self.hook_in_first_seconds,
            self.clear_offer,
            self.social_proof,
            self.visible_product,
            self.strong_cta,
            self.mobile_format,
            self.captions,
            self.urgency,
            self.benefit_led_copy,
            self.brand_cue,
        ]
        .into_iter()
        .filter(|checked| *checked)
        .count() as u8
    }
}

/// Checklist as sent by the scanner: either the detailed booleans or a bare count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChecklistInput {
    Count(u8),
    Items(CreativeChecklist),
}

impl Default for ChecklistInput {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl ChecklistInput {
    pub fn count(&self) -> u8 {
        match self {
            Self::Count(count) => (*count).min(CHECKLIST_SIZE),
            Self::Items(items) => items.satisfied(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreativeScan {
    pub hook: f64,
    pub offer: f64,
    pub desirability: f64,
    pub checklist: ChecklistInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeScore {
    pub hook: f64,
    pub offer: f64,
    pub desirability: f64,
    pub checklist_count: u8,
    pub weighted_average: f64,
    pub estimated_ctr: f64,
}

impl CreativeScan {
    pub fn score(&self) -> CreativeScore {
        let hook = clamp_score(self.hook);
        let offer = clamp_score(self.offer);
        let desirability = clamp_score(self.desirability);
        let checklist_count = self.checklist.count();

        let weighted_average = weighted_average(hook, offer, desirability);
        let estimated_ctr = estimated_ctr(weighted_average, checklist_count);

        CreativeScore {
            hook,
            offer,
            desirability,
            checklist_count,
            weighted_average,
            estimated_ctr,
        }
    }
}

pub fn weighted_average(hook: f64, offer: f64, desirability: f64) -> f64 {
    hook * HOOK_WEIGHT + offer * OFFER_WEIGHT + desirability * DESIRABILITY_WEIGHT
}

pub fn estimated_ctr(weighted_average: f64, checklist_count: u8) -> f64 {
    (weighted_average / 10.0) * CTR_CEILING + f64::from(checklist_count) * CTR_PER_CHECK
}

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 10.0)
    } else {
        0.0
    }
}
