use crate::cli::{PairsArgs, PairsCommands};
use crate::error::{CliError, Result};
use adscreen::core::models::range::DomainRange;
use adscreen::workflows::pairs;
use tracing::info;

pub async fn run(args: PairsArgs) -> Result<()> {
    match args.command {
        PairsCommands::Build {
            target,
            domain,
            domains_file,
            ad_dir,
            output,
        } => {
            let domain: DomainRange = domain
                .parse()
                .map_err(|e| CliError::Argument(format!("Invalid domain range '{}': {}", domain, e)))?;
            if let Some(path) = &domains_file {
                info!("Checking {} against {:?}", domain, path);
                if pairs::find_domain_in_file(path, &domain)?.is_none() {
                    return Err(CliError::Argument(format!(
                        "Domain {} is not listed in {}",
                        domain,
                        path.display()
                    )));
                }
            }
            let report = pairs::build(&target, &domain, &ad_dir, &output)?;
            println!(
                "✓ Wrote {} pair line(s) to {} ({} file(s) without activation domains).",
                report.lines.len(),
                output.display(),
                report.without_ranges.len()
            );
            super::print_skipped(&report.skipped);
        }
        PairsCommands::Filter {
            input,
            output,
            max_end,
        } => {
            let max_end = max_end.unwrap_or(pairs::DEFAULT_MAX_N_TERMINAL_END);
            let report = pairs::filter(&input, &output, max_end)?;
            println!(
                "✓ Kept {} pair line(s), dropped {}; written to {}.",
                report.kept,
                report.dropped,
                output.display()
            );
        }
    }
    Ok(())
}
