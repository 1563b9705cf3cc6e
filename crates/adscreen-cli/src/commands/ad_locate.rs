use super::{print_skipped, progress_reporter};
use crate::cli::AdLocateArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use adscreen::core::io::exemplars::ExemplarLibrary;
use adscreen::workflows;
use tracing::info;

pub async fn run(args: AdLocateArgs, config: &PartialConfig) -> Result<()> {
    let sheet = args.sheet.clone().unwrap_or_else(|| config.exemplar_sheet());
    info!("Loading activation-domain exemplars from {:?}", &args.exemplars);
    let exemplars =
        ExemplarLibrary::from_table(&args.exemplars, &sheet).map_err(|e| CliError::FileParsing {
            path: args.exemplars.clone(),
            source: e.into(),
        })?;
    if exemplars.is_empty() {
        return Err(CliError::Argument(format!(
            "No exemplar sequences found in {}",
            args.exemplars.display()
        )));
    }

    let reporter = progress_reporter();
    println!(
        "Searching {} for {} activation-domain exemplars...",
        args.fasta_dir.display(),
        exemplars.len()
    );
    let report = tokio::task::block_in_place(|| {
        workflows::ad_locate::run(&args.fasta_dir, &exemplars, &args.output_dir, &reporter)
    })?;

    println!(
        "✓ {} file(s) with activation domains, {} without (listed in {}).",
        report.with_domain.len(),
        report.without_domain.len(),
        args.output_dir
            .join(workflows::ad_locate::NO_DOMAIN_LIST)
            .display()
    );
    print_skipped(&report.skipped);
    Ok(())
}
