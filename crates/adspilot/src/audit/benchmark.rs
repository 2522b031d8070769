use super::domain::NicheCategory;
use serde::Serialize;
use std::sync::OnceLock;

/// Reference ROAS and CTR for a business niche.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NicheBenchmark {
    pub id: &'static str,
    pub label: &'static str,
    pub benchmark_roas: f64,
    pub benchmark_ctr: f64,
    pub category: NicheCategory,
}

pub const FALLBACK_NICHE: &str = "other";

static BENCHMARKS: OnceLock<Vec<NicheBenchmark>> = OnceLock::new();

fn table() -> &'static [NicheBenchmark] {
    BENCHMARKS.get_or_init(|| {
        const ROWS: &[(&str, &str, f64, f64, NicheCategory)] = &[
            ("ecom_fashion", "E-commerce Mode", 2.8, 1.2, NicheCategory::Ecommerce),
            ("ecom_beauty", "E-commerce Beauté", 3.1, 1.4, NicheCategory::Ecommerce),
            ("ecom_home", "E-commerce Maison & Déco", 2.5, 1.0, NicheCategory::Ecommerce),
            ("info_product", "Infoproduit & Formation", 2.2, 1.1, NicheCategory::Info),
            ("coaching", "Coaching & Accompagnement", 2.0, 0.9, NicheCategory::Info),
            ("saas", "SaaS & Logiciel", 1.8, 0.8, NicheCategory::Info),
            ("local_services", "Services Locaux", 3.5, 1.6, NicheCategory::Services),
            ("finance", "Finance & Assurance", 1.6, 0.7, NicheCategory::Services),
            ("real_estate", "Immobilier", 1.9, 0.8, NicheCategory::Services),
            (FALLBACK_NICHE, "Autre", 2.0, 0.9, NicheCategory::Unmapped),
        ];

        ROWS.iter()
            .map(|&(id, label, benchmark_roas, benchmark_ctr, category)| NicheBenchmark {
                id,
                label,
                benchmark_roas,
                benchmark_ctr,
                category,
            })
            .collect()
    })
}

/// All benchmarks in display order.
pub fn all() -> &'static [NicheBenchmark] {
    table()
}

/// Resolves a niche id; unknown ids get the generic `other` entry.
pub fn lookup(niche_id: &str) -> &'static NicheBenchmark {
    find(niche_id).unwrap_or_else(fallback)
}

/// Strict variant of [`lookup`] for callers that need to know the id was recognised.
pub fn find(niche_id: &str) -> Option<&'static NicheBenchmark> {
    let needle = niche_id.trim();
    table()
        .iter()
        .find(|entry| entry.id.eq_ignore_ascii_case(needle))
}

fn fallback() -> &'static NicheBenchmark {
    // The fallback row is part of the static table above.
    &table()[table().len() - 1]
}
