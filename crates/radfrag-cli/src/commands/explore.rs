use super::prepare;
use crate::cli::ExploreArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use radfrag::core::models::result::ResultSummary;
use radfrag::engine::progress::ProgressReporter;
use radfrag::workflows;
use tracing::{info, warn};

pub fn run(args: ExploreArgs) -> Result<()> {
    let (app_config, proteoforms) = prepare(&args)?;
    if proteoforms.is_empty() {
        warn!("Input table contains no proteoforms.");
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Exploring {} proteoform(s)...", proteoforms.len());
    let outcome = workflows::explore::run(&proteoforms, &app_config.core_config, &reporter)?;

    info!(
        "Workflow finished with {} result(s).",
        outcome.results.len()
    );
    print!("{}", render_summary(&outcome.summary));
    println!("Results written to: {}", outcome.paths.results.display());
    Ok(())
}

fn render_summary(summary: &ResultSummary) -> String {
    let mut out = format!("Candidates analysed: {}\n", summary.total);
    for (needed, count) in &summary.by_fragments_needed {
        let label = match needed {
            -1 => "indistinguishable".to_string(),
            0 => "no competitors".to_string(),
            1 => "1 fragment".to_string(),
            n => format!("{} fragments", n),
        };
        out.push_str(&format!("  {:<20} {:>10}\n", label, count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use radfrag::core::models::result::DiscriminationResult;

    fn result(needed: i32) -> DiscriminationResult {
        DiscriminationResult {
            accession: "P1".into(),
            sequence_key: "PEPTIDE".to_string(),
            competitor_count: 2,
            fragments_available: 6,
            fragments_needed: needed,
        }
    }

    #[test]
    fn summary_lists_each_fragment_count_in_order() {
        let summary = ResultSummary::from_results(&[result(2), result(-1), result(0), result(2)]);
        let text = render_summary(&summary);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Candidates analysed: 4");
        assert!(lines[1].contains("indistinguishable"));
        assert!(lines[2].contains("no competitors"));
        assert!(lines[3].contains("2 fragments") && lines[3].trim_end().ends_with('2'));
        assert_eq!(lines.len(), 4);
    }
}
