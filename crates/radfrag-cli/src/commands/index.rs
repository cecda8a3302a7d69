use super::prepare;
use crate::cli::ExploreArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use radfrag::engine::progress::ProgressReporter;
use radfrag::workflows;
use tracing::info;

pub fn run(args: ExploreArgs) -> Result<()> {
    let (app_config, proteoforms) = prepare(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let outcome = workflows::explore::index(&proteoforms, &app_config.core_config, &reporter)?;
    info!(
        "Index holds {} candidate(s) across {} fragment-count bin(s).",
        outcome.candidate_count,
        outcome.histogram.iter().count()
    );

    println!("Indexed {} candidate(s).", outcome.candidate_count);
    println!("Index written to: {}", outcome.paths.index.display());
    println!("Histogram written to: {}", outcome.paths.histogram.display());
    Ok(())
}
