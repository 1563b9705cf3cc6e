use super::{print_skipped, progress_reporter};
use crate::cli::DbdLocateArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::remote::RemoteClient;
use adscreen::core::io::exemplars::ExemplarLibrary;
use adscreen::workflows;
use tokio::runtime::Handle;
use tracing::info;

pub async fn run(args: DbdLocateArgs, config: &PartialConfig) -> Result<()> {
    info!("Loading DNA-binding-domain exemplars from {:?}", &args.exemplars);
    let exemplars = if args.exemplars.is_dir() {
        ExemplarLibrary::from_alignment_dir(&args.exemplars)
    } else {
        ExemplarLibrary::from_table(&args.exemplars, &config.exemplar_sheet())
    }
    .map_err(|e| CliError::FileParsing {
        path: args.exemplars.clone(),
        source: e.into(),
    })?;

    let keywords = config.dbd_keywords();
    let remote = if args.offline {
        info!("Offline mode: UniProt feature lookups are disabled.");
        None
    } else {
        Some(RemoteClient::new(&config.network_settings())?)
    };

    let handle = Handle::current();
    let mut features = |accession: &str| match &remote {
        Some(client) => handle.block_on(client.fetch_features(accession)),
        None => None,
    };

    let reporter = progress_reporter();
    println!(
        "Locating DNA-binding domains in {} ({} exemplars, {} feature keywords)...",
        args.fasta_dir.display(),
        exemplars.len(),
        keywords.len()
    );
    let report = tokio::task::block_in_place(|| {
        workflows::dbd_locate::run(
            &args.fasta_dir,
            &exemplars,
            &keywords,
            &mut features,
            &args.output_dir,
            &reporter,
        )
    })?;

    println!(
        "✓ {} domain(s) located ({} from UniProt features), {} missing ({} without UniProt data).",
        report.located, report.from_features, report.missing, report.lookup_unavailable
    );
    print_skipped(&report.skipped);
    Ok(())
}
