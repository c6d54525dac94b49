use super::calendar::{CalendarError, calendar_days_from};
use super::models::facility::FacilityParameters;
use super::models::phase::Phase;
use super::models::schedule::Weekday;
use serde::{Deserialize, Serialize};

/// Cycles are anchored on this weekday so results do not depend on when they are computed.
pub const CYCLE_START: Weekday = Weekday::Monday;

const RATE_ROUNDING_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDuration {
    pub phase: Phase,
    pub operating_days: u32,
    pub calendar_days: u32,
}

/// Operating and calendar days of every phase of one cell cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleBreakdown {
    phases: [PhaseDuration; Phase::COUNT],
}

impl CycleBreakdown {
    #[inline]
    pub fn get(&self, phase: Phase) -> &PhaseDuration {
        &self.phases[phase.index()]
    }

    pub fn phases(&self) -> &[PhaseDuration] {
        &self.phases
    }

    pub fn total_calendar_days(&self) -> u32 {
        self.phases
            .iter()
            .fold(0, |total, p| total.saturating_add(p.calendar_days))
    }

    pub fn total_operating_days(&self) -> u32 {
        self.phases
            .iter()
            .fold(0, |total, p| total.saturating_add(p.operating_days))
    }
}

/// Whole operating days an equipment-paced phase needs to move `volume_cy` at `rate`.
pub fn equipment_phase_days(volume_cy: f64, rate_cy_per_day: f64) -> Result<u32, CalendarError> {
    let days = (volume_cy / rate_cy_per_day - RATE_ROUNDING_TOLERANCE)
        .ceil()
        .max(1.0);
    if days > f64::from(u32::MAX) {
        return Err(CalendarError::Overflow);
    }
    Ok(days as u32)
}

/// Operating days of `phase` for a cell of `cell_volume_cy`.
pub fn phase_operating_days(
    phase: Phase,
    cell_volume_cy: f64,
    params: &FacilityParameters,
) -> Result<u32, CalendarError> {
    match phase {
        Phase::Load => equipment_phase_days(cell_volume_cy, params.effective_loading_rate()),
        Phase::Unload => equipment_phase_days(cell_volume_cy, params.unloading_rate_cy_per_day),
        Phase::Rip => Ok(params.rip_days),
        Phase::Treat => Ok(params.treat_days),
        Phase::Dry => Ok(params.dry_days),
    }
}

/// Wall-clock duration of one full Load → Rip → Treat → Dry → Unload cycle.
///
/// Phases are chained: each one starts on the weekday after the previous phase's last
/// calendar day, and each advances only on the days its own weekly pattern enables.
///
/// Fails with [`CalendarError::Overflow`] when the cycle does not fit in `u32` calendar days.
pub fn cycle_time(
    cell_volume_cy: f64,
    params: &FacilityParameters,
) -> Result<CycleBreakdown, CalendarError> {
    let mut start = CYCLE_START;
    let mut phases = [PhaseDuration {
        phase: Phase::Load,
        operating_days: 0,
        calendar_days: 0,
    }; Phase::COUNT];
    let mut total_calendar_days: u32 = 0;

    for phase in Phase::ALL {
        let operating_days = phase_operating_days(phase, cell_volume_cy, params)?;
        let span = calendar_days_from(operating_days, params.weekend_policy.get(phase), start)?;
        total_calendar_days = total_calendar_days
            .checked_add(span.calendar_days)
            .ok_or(CalendarError::Overflow)?;
        phases[phase.index()] = PhaseDuration {
            phase,
            operating_days,
            calendar_days: span.calendar_days,
        };
        start = span.next_start;
    }

    Ok(CycleBreakdown { phases })
}
