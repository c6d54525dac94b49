use crate::cli::OptimizeArgs;
use crate::config::{AppConfig, build_optimize_config};
use crate::error::Result;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use soilcell::OptimizationResult;
use soilcell::engine::error::EngineError;
use soilcell::engine::progress::ProgressReporter;
use soilcell::workflows;
use tracing::{info, warn};

pub fn run(args: OptimizeArgs, show_progress: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_optimize_config(&args)?;

    let result = execute(&app, show_progress).inspect_err(|e| {
        if e.is_recoverable() {
            warn!("No layout fits the searched ranges.");
            eprintln!(
                "Hint: widen the search with --volume-max or --count-max, or raise the equipment rates."
            );
        }
    })?;

    println!("{}", report::render_recommendation(&result, app.facility.daily_volume_cy));
    println!("{}", report::render_shortlist(&result.shortlist));

    if let Some(path) = &args.csv {
        info!("Writing {} shortlist entries to {:?}", result.shortlist.len(), path);
        report::write_csv_file(path, &result.shortlist)?;
        println!("Shortlist written to: {}", path.display());
    }

    Ok(())
}

fn execute(
    app: &AppConfig,
    show_progress: bool,
) -> std::result::Result<OptimizationResult, EngineError> {
    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(
        daily_volume_cy = app.facility.daily_volume_cy,
        pairs = app.optimize.search.candidate_pairs(),
        "Invoking the optimization workflow..."
    );
    workflows::optimize::run(&app.facility, &app.optimize, &reporter)
}
