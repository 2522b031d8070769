use crate::infra::{load_input, parse_module, parse_product};
use adspilot::audit::benchmark;
use adspilot::audit::report::format::format_decimal;
use adspilot::audit::{
    select_applicable_fields, AuditCsvImporter, AuditInput, AuditModule, AuditReportView,
    BatchReport, OwnedProducts, ProductId, ScoringEngine,
};
use adspilot::error::AppError;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Audit module: andromeda, oracle, mercury, atlas or creative
    #[arg(long, value_parser = parse_module)]
    pub(crate) module: AuditModule,
    /// Form payload saved as JSON
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Guide already bought (repeatable), e.g. "SOS Signal"
    #[arg(long, value_parser = parse_product)]
    pub(crate) owns: Vec<ProductId>,
    /// Print the full outcome as JSON instead of the report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export, one audit form per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Audit module applied to every row
    #[arg(long, value_parser = parse_module)]
    pub(crate) module: AuditModule,
    /// Print the batch as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Niche used for the sample store
    #[arg(long, default_value = "ecom_fashion")]
    pub(crate) niche: String,
    /// Show the mastered variant of the advice as if every guide was bought
    #[arg(long)]
    pub(crate) owns_all: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let input = load_input(&args.input)?;
    let owned: OwnedProducts = args.owns.into_iter().collect();
    let outcome = ScoringEngine::new().score(args.module, &input, &owned);

    if args.json {
        let json = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::from)?;
        println!("{json}");
    } else {
        render_report(&outcome.report());
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let report = AuditCsvImporter::from_path(&args.csv, args.module)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{json}");
    } else {
        render_batch(&report);
    }
    Ok(())
}

pub(crate) fn run_benchmarks() {
    println!("Benchmarks par niche");
    for niche in benchmark::all() {
        let fields: Vec<&str> = select_applicable_fields(niche.id)
            .into_iter()
            .map(|field| field.key())
            .collect();
        println!(
            "- {:<15} {:<28} ROAS {:>5} | CTR {:>5} % | champs: {}",
            niche.id,
            niche.label,
            format_decimal(niche.benchmark_roas, 1),
            format_decimal(niche.benchmark_ctr, 1),
            if fields.is_empty() {
                "aucun".to_string()
            } else {
                fields.join(", ")
            }
        );
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let input = demo_input(&args.niche);
    let owned: OwnedProducts = if args.owns_all {
        ProductId::ordered().into_iter().collect()
    } else {
        OwnedProducts::new()
    };

    println!("AdsPilot Pro demo ({})", benchmark::lookup(&args.niche).label);
    let engine = ScoringEngine::new();
    for module in AuditModule::ordered() {
        let outcome = engine.score(module, &input, &owned);
        println!();
        render_report(&outcome.report());
    }
    Ok(())
}

fn demo_input(niche: &str) -> AuditInput {
    let mut input = AuditInput::default();
    for (field, value) in [
        ("pmv", "75"),
        ("ltv", "120"),
        ("margin", "60"),
        ("target_roas", "3"),
        ("target_volume", "50"),
        ("current_cpa", "35"),
        ("current_roas", "2,4"),
        ("current_ctr", "1,1"),
        ("current_budget", "5000"),
        ("emq_score", "6,5"),
        ("hook_score", "8"),
        ("offer_score", "6"),
        ("desirability_score", "7"),
        ("checklist_count", "8"),
    ] {
        input.set(field, value);
    }
    input.niche = niche.to_string();
    input
}

pub(crate) fn render_report(view: &AuditReportView) {
    println!("{}", view.headline);
    println!("Verdict: {}", view.verdict_label);
    for figure in &view.figures {
        println!("  - {}: {}", figure.label, figure.value);
    }

    println!("Conseils:");
    for advice in &view.advice {
        println!(
            "  [{}] {} ({})",
            advice.axis.label(),
            advice.title,
            advice.tier.label()
        );
        println!("      {}", advice.text);
        println!("      -> {}", advice.action);
    }

    if !view.warnings.is_empty() {
        println!("Avertissements:");
        for warning in &view.warnings {
            println!("  ! {warning}");
        }
    }
}

fn render_batch(report: &BatchReport) {
    println!(
        "{} audits scored with {} ({} with warnings)",
        report.rows.len(),
        report.module.label(),
        report.rows_with_warnings()
    );
    if !report.ignored_columns.is_empty() {
        println!("Ignored columns: {}", report.ignored_columns.join(", "));
    }
    for row in &report.rows {
        println!(
            "- line {:>4} | {:<30} | {:<28} | {}",
            row.line, row.name, row.verdict_label, row.outcome.benchmark.label
        );
    }
}
