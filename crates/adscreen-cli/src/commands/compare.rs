use super::{print_skipped, progress_reporter};
use crate::cli::CompareArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use adscreen::workflows;
use tracing::info;

pub async fn run(args: CompareArgs, config: &PartialConfig) -> Result<()> {
    let comparison = config.comparison_config(args.contact_threshold)?;
    info!(
        "Comparing chain '{}' residues {}..={} against reference chain '{}'.",
        comparison.target_chain,
        comparison.residues.start(),
        comparison.residues.end(),
        comparison.reference_chain
    );

    let reporter = progress_reporter();
    println!(
        "Comparing '{}' models in {} against {}...",
        comparison.model_file,
        args.predictions_dir.display(),
        args.reference.display()
    );
    let report = tokio::task::block_in_place(|| {
        workflows::compare::run(
            &args.reference,
            &args.predictions_dir,
            &comparison,
            &args.output_dir,
            &reporter,
        )
    })?;

    println!(
        "✓ Compared {} model(s). Tables written to {}.",
        report.models.len(),
        args.output_dir.display()
    );
    for model in &report.models {
        println!(
            "  {}: RMSD {:.3} Å over {} residues",
            model.name,
            model.comparison.rmsd,
            model.comparison.common_residues.len()
        );
    }
    print_skipped(&report.skipped);
    Ok(())
}
