use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar weeks in an average month; used to move monthly budgets to weekly figures.
pub const WEEKS_PER_MONTH: f64 = 4.34;

/// The five audit flows offered to clients. They share one input shape but each
/// produces its own result variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditModule {
    Andromeda,
    Oracle,
    Mercury,
    Atlas,
    Creative,
}

impl AuditModule {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Andromeda,
            Self::Oracle,
            Self::Mercury,
            Self::Atlas,
            Self::Creative,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Andromeda => "andromeda",
            Self::Oracle => "oracle",
            Self::Mercury => "mercury",
            Self::Atlas => "atlas",
            Self::Creative => "creative",
        }
    }

    /// Title-case module name used in generated audit titles.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Andromeda => "Andromeda",
            Self::Oracle => "Oracle",
            Self::Mercury => "Mercury",
            Self::Atlas => "Atlas",
            Self::Creative => "Creative",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Andromeda => "ANDROMEDA · Volume & trésorerie",
            Self::Oracle => "ORACLE · Rentabilité",
            Self::Mercury => "MERCURY · Signal & tracking",
            Self::Atlas => "ATLAS · Scaling",
            Self::Creative => "CREATIVE · Scan créa",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ordered()
            .into_iter()
            .find(|module| module.key().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for AuditModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Business families that decide which optional metrics make sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NicheCategory {
    Ecommerce,
    Info,
    Services,
    Unmapped,
}

/// Niche-specific metrics that are only collected for some business types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalField {
    ConversionRate,
    CostPerLead,
    WebinarRate,
    HookRate,
    UpsellRate,
    BookingCost,
    ClosingRate,
    StopRate,
    ChurnRate,
}

impl OptionalField {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::ConversionRate,
            Self::CostPerLead,
            Self::WebinarRate,
            Self::HookRate,
            Self::UpsellRate,
            Self::BookingCost,
            Self::ClosingRate,
            Self::StopRate,
            Self::ChurnRate,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::ConversionRate => "conversion_rate",
            Self::CostPerLead => "cost_per_lead",
            Self::WebinarRate => "webinar_rate",
            Self::HookRate => "hook_rate",
            Self::UpsellRate => "upsell_rate",
            Self::BookingCost => "booking_cost",
            Self::ClosingRate => "closing_rate",
            Self::StopRate => "stop_rate",
            Self::ChurnRate => "churn_rate",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ConversionRate => "Taux de conversion (%)",
            Self::CostPerLead => "Coût par lead (€)",
            Self::WebinarRate => "Taux de présence webinar (%)",
            Self::HookRate => "Hook rate (%)",
            Self::UpsellRate => "Taux d'upsell (%)",
            Self::BookingCost => "Coût par rendez-vous (€)",
            Self::ClosingRate => "Taux de closing (%)",
            Self::StopRate => "Taux de no-show (%)",
            Self::ChurnRate => "Taux de churn (%)",
        }
    }
}

/// Raw form payload. Every numeric field travels as text and is parsed leniently
/// by [`AuditInput::metrics`]; JSON numbers are accepted and stored as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditInput {
    #[serde(deserialize_with = "text_or_number")]
    pub pmv: String,
    #[serde(deserialize_with = "text_or_number")]
    pub ltv: String,
    #[serde(deserialize_with = "text_or_number")]
    pub margin: String,
    #[serde(alias = "targetRoas", deserialize_with = "text_or_number")]
    pub target_roas: String,
    #[serde(alias = "targetVolume", deserialize_with = "text_or_number")]
    pub target_volume: String,
    #[serde(alias = "currentCpa", deserialize_with = "text_or_number")]
    pub current_cpa: String,
    #[serde(alias = "currentRoas", deserialize_with = "text_or_number")]
    pub current_roas: String,
    #[serde(alias = "currentCtr", deserialize_with = "text_or_number")]
    pub current_ctr: String,
    #[serde(alias = "currentBudget", deserialize_with = "text_or_number")]
    pub current_budget: String,
    #[serde(alias = "emqScore", deserialize_with = "text_or_number")]
    pub emq_score: String,
    pub niche: String,
    #[serde(alias = "creativeFormats")]
    pub creative_formats: Vec<String>,
    #[serde(alias = "hookScore", deserialize_with = "text_or_number")]
    pub hook_score: String,
    #[serde(alias = "offerScore", deserialize_with = "text_or_number")]
    pub offer_score: String,
    #[serde(alias = "desirabilityScore", deserialize_with = "text_or_number")]
    pub desirability_score: String,
    #[serde(alias = "checklistCount", deserialize_with = "text_or_number")]
    pub checklist_count: String,
    #[serde(alias = "conversionRate", deserialize_with = "text_or_number")]
    pub conversion_rate: String,
    #[serde(alias = "costPerLead", deserialize_with = "text_or_number")]
    pub cost_per_lead: String,
    #[serde(alias = "webinarRate", deserialize_with = "text_or_number")]
    pub webinar_rate: String,
    #[serde(alias = "hookRate", deserialize_with = "text_or_number")]
    pub hook_rate: String,
    #[serde(alias = "upsellRate", deserialize_with = "text_or_number")]
    pub upsell_rate: String,
    #[serde(alias = "bookingCost", deserialize_with = "text_or_number")]
    pub booking_cost: String,
    #[serde(alias = "closingRate", deserialize_with = "text_or_number")]
    pub closing_rate: String,
    #[serde(alias = "stopRate", deserialize_with = "text_or_number")]
    pub stop_rate: String,
    #[serde(alias = "churnRate", deserialize_with = "text_or_number")]
    pub churn_rate: String,
}

impl AuditInput {
    /// Assigns a field by its wire name (snake_case or camelCase, case-insensitive).
    /// Returns `false` for unknown names so importers can skip extra columns.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|ch| *ch != '_' && *ch != '-' && !ch.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let value = value.to_string();

        let slot = match normalized.as_str() {
            "pmv" => &mut self.pmv,
            "ltv" => &mut self.ltv,
            "margin" => &mut self.margin,
            "targetroas" => &mut self.target_roas,
            "targetvolume" => &mut self.target_volume,
            "currentcpa" => &mut self.current_cpa,
            "currentroas" => &mut self.current_roas,
            "currentctr" => &mut self.current_ctr,
            "currentbudget" => &mut self.current_budget,
            "emqscore" => &mut self.emq_score,
            "niche" => &mut self.niche,
            "hookscore" => &mut self.hook_score,
            "offerscore" => &mut self.offer_score,
            "desirabilityscore" => &mut self.desirability_score,
            "checklistcount" => &mut self.checklist_count,
            "conversionrate" => &mut self.conversion_rate,
            "costperlead" => &mut self.cost_per_lead,
            "webinarrate" => &mut self.webinar_rate,
            "hookrate" => &mut self.hook_rate,
            "upsellrate" => &mut self.upsell_rate,
            "bookingcost" => &mut self.booking_cost,
            "closingrate" => &mut self.closing_rate,
            "stoprate" => &mut self.stop_rate,
            "churnrate" => &mut self.churn_rate,
            "creativeformats" => {
                self.creative_formats = value
                    .split(['|', ';', ','])
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect();
                return true;
            }
            _ => return false,
        };

        *slot = value;
        true
    }

    /// Parses the form into numbers. Never fails: anything unusable becomes `0.0`
    /// and is reported in [`AuditMetrics::warnings`].
    pub fn metrics(&self) -> AuditMetrics {
        let mut warnings = Vec::new();
        let mut read = |field: &'static str, raw: &str| parse_field(field, raw, &mut warnings);

        let pmv = read("pmv", &self.pmv);
        let ltv = read("ltv", &self.ltv);
        let margin = normalize_margin(read("margin", &self.margin), self.margin.contains('%'));
        let target_roas = read("target_roas", &self.target_roas);
        let target_volume = read("target_volume", &self.target_volume);
        let current_cpa = read("current_cpa", &self.current_cpa);
        let current_roas = read("current_roas", &self.current_roas);
        let current_ctr = read("current_ctr", &self.current_ctr);
        let current_budget = read("current_budget", &self.current_budget);
        let emq_score = read("emq_score", &self.emq_score).clamp(0.0, 10.0);
        let hook_score = read("hook_score", &self.hook_score);
        let offer_score = read("offer_score", &self.offer_score);
        let desirability_score = read("desirability_score", &self.desirability_score);
        let checklist_count = read("checklist_count", &self.checklist_count);

        let mut optional = BTreeMap::new();
        for field in OptionalField::ordered() {
            let raw = self.optional_raw(field);
            if raw.trim().is_empty() {
                continue;
            }
            optional.insert(field, read(field.key(), raw));
        }

        AuditMetrics {
            pmv,
            ltv,
            margin,
            target_roas,
            target_volume,
            current_cpa,
            current_roas,
            current_ctr,
            current_budget,
            emq_score,
            niche: self.niche.trim().to_ascii_lowercase(),
            creative_formats: self.creative_formats.clone(),
            hook_score,
            offer_score,
            desirability_score,
            checklist_count,
            optional,
            warnings,
        }
    }

    fn optional_raw(&self, field: OptionalField) -> &str {
        match field {
            OptionalField::ConversionRate => &self.conversion_rate,
            OptionalField::CostPerLead => &self.cost_per_lead,
            OptionalField::WebinarRate => &self.webinar_rate,
            OptionalField::HookRate => &self.hook_rate,
            OptionalField::UpsellRate => &self.upsell_rate,
            OptionalField::BookingCost => &self.booking_cost,
            OptionalField::ClosingRate => &self.closing_rate,
            OptionalField::StopRate => &self.stop_rate,
            OptionalField::ChurnRate => &self.churn_rate,
        }
    }
}

/// Parsed, non-negative view of an [`AuditInput`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditMetrics {
    pub pmv: f64,
    pub ltv: f64,
    /// Gross margin as a fraction in `[0, 1]`.
    pub margin: f64,
    pub target_roas: f64,
    pub target_volume: f64,
    pub current_cpa: f64,
    pub current_roas: f64,
    pub current_ctr: f64,
    pub current_budget: f64,
    pub emq_score: f64,
    pub niche: String,
    pub creative_formats: Vec<String>,
    pub hook_score: f64,
    pub offer_score: f64,
    pub desirability_score: f64,
    pub checklist_count: f64,
    pub optional: BTreeMap<OptionalField, f64>,
    pub warnings: Vec<FieldWarning>,
}

/// A value that was replaced by `0` while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWarning {
    pub field: String,
    pub raw: String,
    pub reason: WarningReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    NotANumber,
    Negative,
}

impl WarningReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotANumber => "valeur non numérique remplacée par 0",
            Self::Negative => "valeur négative remplacée par 0",
        }
    }
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, WarningReason> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '€' | '%' | '\u{a0}' | '\u{202f}'))
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();

    if cleaned.is_empty() {
        return Ok(0.0);
    }

    let value: f64 = cleaned.parse().map_err(|_| WarningReason::NotANumber)?;
    if !value.is_finite() {
        return Err(WarningReason::NotANumber);
    }
    if value < 0.0 {
        return Err(WarningReason::Negative);
    }
    Ok(value)
}

fn parse_field(field: &'static str, raw: &str, warnings: &mut Vec<FieldWarning>) -> f64 {
    match parse_amount(raw) {
        Ok(value) => value,
        Err(reason) => {
            warnings.push(FieldWarning {
                field: field.to_string(),
                raw: raw.to_string(),
                reason,
            });
            0.0
        }
    }
}

/// A trailing `%` always means percent; bare numbers above 1 are read as
/// percentages too (`60` means 60 %).
fn normalize_margin(value: f64, percent_sign: bool) -> f64 {
    let fraction = if percent_sign || value > 1.0 {
        value / 100.0
    } else {
        value
    };
    fraction.clamp(0.0, 1.0)
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text,
        Some(Raw::Number(number)) => number.to_string(),
        None => String::new(),
    })
}
