use super::{print_skipped, progress_reporter};
use crate::cli::LisArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use adscreen::workflows::{self, lis::LisInputs};
use tracing::info;

pub async fn run(args: LisArgs, config: &PartialConfig) -> Result<()> {
    let scoring = config.scoring_config(args.pae_cutoff, args.partition_chain)?;
    info!(
        "Scoring with PAE cutoff {}, {} models x {} predictions.",
        scoring.pae_cutoff, scoring.models, scoring.predictions
    );

    let inputs = LisInputs {
        base_dir: &args.predictions_dir,
        prefix: args.prefix.as_deref(),
        protein_1: &args.protein_1,
        protein_2: &args.protein_2,
    };
    let reporter = progress_reporter();
    println!("Scoring prediction directories in {}...", args.predictions_dir.display());
    let report = tokio::task::block_in_place(|| {
        workflows::lis::run(&inputs, &scoring, &args.output_dir, &reporter)
    })?;

    println!(
        "✓ Scored {} pair(s): {} positive. Tables written to {}.",
        report.pairs.len(),
        report.positive_count(),
        args.output_dir.display()
    );
    for pair in report.pairs.iter().filter(|p| p.classification.positive) {
        println!(
            "  + {} (best LIS {:.3}, best LIA {:.0}, avg LIS {:.3}, avg LIA {:.1})",
            pair.directory.display(),
            pair.classification.best_lis,
            pair.classification.best_lia,
            pair.classification.average_lis,
            pair.classification.average_lia
        );
    }
    print_skipped(&report.skipped);
    Ok(())
}
