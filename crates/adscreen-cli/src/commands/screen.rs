use super::{print_skipped, progress_reporter};
use crate::cli::ScreenArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use adscreen::workflows::{self, screen::ScreenInputs};

pub async fn run(args: ScreenArgs, config: &PartialConfig) -> Result<()> {
    let (screen, pdb_name) = config.screen_config(args.cutoff)?;
    let inputs = ScreenInputs {
        base_dir: &args.predictions_dir,
        listing: &args.listing,
        pdb_name: &pdb_name,
    };

    let reporter = progress_reporter();
    println!(
        "Screening jobs listed in {} (inter-chain PAE < {})...",
        args.listing.display(),
        screen.pae_cutoff
    );
    let report = tokio::task::block_in_place(|| {
        workflows::screen::run(&inputs, &screen, &args.output_dir, &reporter)
    })?;

    println!(
        "✓ {} good job(s), {} rejected, {} incomplete group(s), {} without ranking.",
        report.good_jobs.len(),
        report.rejected.len(),
        report.incomplete_groups.len(),
        report.missing_ranking
    );
    for job in &report.good_jobs {
        println!("  {} (ipTM {:.3}, ipTM+pTM {:.3})", job.job, job.iptm, job.iptm_ptm);
    }
    print_skipped(&report.skipped);
    Ok(())
}
