use super::benchmark;
use super::domain::{NicheCategory, OptionalField};
use std::collections::BTreeSet;

/// Extra metrics worth collecting for a niche; unknown or generic niches get none.
pub fn select_applicable_fields(niche: &str) -> BTreeSet<OptionalField> {
    match benchmark::find(niche) {
        Some(entry) => fields_for_category(entry.category),
        None => BTreeSet::new(),
    }
}

pub fn fields_for_category(category: NicheCategory) -> BTreeSet<OptionalField> {
    let fields: &[OptionalField] = match category {
        NicheCategory::Ecommerce => &[OptionalField::ConversionRate],
        NicheCategory::Info => &[
            OptionalField::CostPerLead,
            OptionalField::WebinarRate,
            OptionalField::HookRate,
            OptionalField::UpsellRate,
        ],
        NicheCategory::Services => &[
            OptionalField::BookingCost,
            OptionalField::ClosingRate,
            OptionalField::StopRate,
            OptionalField::ChurnRate,
        ],
        NicheCategory::Unmapped => &[],
    };

    fields.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecommerce_only_asks_for_conversion_rate() {
        let fields = select_applicable_fields("ecom_beauty");
        assert_eq!(fields.into_iter().collect::<Vec<_>>(), vec![OptionalField::ConversionRate]);
    }

    #[test]
    fn info_and_services_get_funnel_metrics() {
        let info = select_applicable_fields("saas");
        assert!(info.contains(&OptionalField::CostPerLead));
        assert!(info.contains(&OptionalField::UpsellRate));
        assert_eq!(info.len(), 4);

        let services = select_applicable_fields("real_estate");
        assert!(services.contains(&OptionalField::ClosingRate));
        assert!(services.contains(&OptionalField::ChurnRate));
        assert!(!services.contains(&OptionalField::ConversionRate));
    }

    #[test]
    fn unmapped_niches_return_empty_set() {
        assert!(select_applicable_fields("other").is_empty());
        assert!(select_applicable_fields("dropshipping-lunar").is_empty());
    }
}
