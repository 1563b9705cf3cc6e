use super::{print_skipped, progress_reporter};
use crate::cli::NovelArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::remote::RemoteClient;
use adscreen::workflows::{self, novel::NovelInputs};
use tokio::runtime::Handle;

pub async fn run(args: NovelArgs, config: &PartialConfig) -> Result<()> {
    let novel = config.novel_config()?;
    let scoring = config.scoring_config(None, None)?;
    let result_file = scoring.result_file_name(1, 0);
    let client = RemoteClient::new(&config.network_settings())?;

    let handle = Handle::current();
    let mut substitutions = |accession: &str| handle.block_on(client.fetch_substitutions(accession));

    let inputs = NovelInputs {
        fasta_dir: &args.fasta_dir,
        predictions_dir: &args.predictions_dir,
        result_file: &result_file,
    };
    let reporter = progress_reporter();
    println!("Scanning {} for candidate activation regions...", args.fasta_dir.display());
    let report = tokio::task::block_in_place(|| {
        workflows::novel::run(&inputs, &mut substitutions, &novel, &args.output, &reporter)
    })?;

    println!(
        "✓ Found {} candidate region(s); written to {}.",
        report.regions.len(),
        args.output.display()
    );
    if !report.without_substitutions.is_empty() {
        println!(
            "  No AlphaMissense data for: {}",
            report.without_substitutions.join(", ")
        );
    }
    print_skipped(&report.skipped);
    Ok(())
}
