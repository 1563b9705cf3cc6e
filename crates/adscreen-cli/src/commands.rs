pub mod ad_locate;
pub mod compare;
pub mod dbd_locate;
pub mod lis;
pub mod novel;
pub mod pairs;
pub mod screen;

use crate::utils::progress::CliProgressHandler;
use adscreen::engine::progress::ProgressReporter;
use adscreen::workflows::SkippedUnit;

fn progress_reporter() -> ProgressReporter<'static> {
    let handler = CliProgressHandler::new();
    ProgressReporter::with_callback(handler.get_callback())
}

fn print_skipped(skipped: &[SkippedUnit]) {
    if skipped.is_empty() {
        return;
    }
    println!("Skipped {} unit(s):", skipped.len());
    for unit in skipped {
        println!("  {}: {}", unit.name, unit.reason);
    }
}
