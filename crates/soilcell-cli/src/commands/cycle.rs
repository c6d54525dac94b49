use crate::cli::CycleArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::report;
use soilcell::core::capacity::{capacity, cells_required};
use soilcell::core::cycle::cycle_time;
use soilcell::engine::error::EngineError;
use tracing::info;

pub fn run(args: CycleArgs) -> Result<()> {
    if !(args.cell_volume.is_finite() && args.cell_volume > 0.0) {
        return Err(CliError::Argument(format!(
            "--cell-volume must be a positive number, got {}",
            args.cell_volume
        )));
    }
    if !(args.safety_factor.is_finite() && args.safety_factor >= 1.0) {
        return Err(CliError::Argument(format!(
            "--safety-factor must be at least 1.0, got {}",
            args.safety_factor
        )));
    }

    let app = build_config(&args.facility)?;
    let facility = &app.facility;

    let cycle = cycle_time(args.cell_volume, facility).map_err(EngineError::from)?;
    let cycle_days = cycle.total_calendar_days();
    info!(cell_volume_cy = args.cell_volume, cycle_days, "Computed cell cycle.");

    let requirement = cells_required(
        facility.daily_volume_cy,
        args.cell_volume,
        cycle_days,
        args.safety_factor,
    );
    let cap = capacity(
        args.cell_volume,
        requirement.cells_with_safety,
        cycle_days,
        facility.loading_rate_cy_per_day,
        facility.unloading_rate_cy_per_day,
    );

    println!(
        "{}",
        report::render_cycle(args.cell_volume, &cycle, &requirement, &cap)
    );
    Ok(())
}
