use super::phase::Phase;
use super::schedule::WeekendPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted Rip, Treat or Dry duration, in operating days.
pub const MAX_PHASE_DAYS: u32 = 3650;

/// A facility input value that violates its invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid parameter '{parameter}': {reason}")]
pub struct ParameterError {
    pub parameter: &'static str,
    pub reason: String,
}

impl ParameterError {
    pub fn new(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Operating constraints of the facility, immutable for one search run.
///
/// Volumes are in cubic yards (CY), rates in CY per operating day, depth in feet and
/// phase durations in operating days. Load and Unload durations are not stored; they are
/// derived per cell from its volume and the equipment rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityParameters {
    pub daily_volume_cy: f64,
    pub cell_depth_ft: f64,
    pub loading_rate_cy_per_day: f64,
    pub unloading_rate_cy_per_day: f64,
    pub rip_days: u32,
    pub treat_days: u32,
    pub dry_days: u32,
    pub weekend_policy: WeekendPolicy,
    /// Caps the Load-phase rate at the daily intake: a cell fills no faster than soil arrives.
    #[serde(default)]
    pub load_paced_by_intake: bool,
}

impl FacilityParameters {
    /// Checks every input invariant. Called before a search begins; never retried.
    pub fn validate(&self) -> Result<(), ParameterError> {
        ensure_positive("daily_volume_cy", self.daily_volume_cy)?;
        ensure_positive("cell_depth_ft", self.cell_depth_ft)?;
        ensure_positive("loading_rate_cy_per_day", self.loading_rate_cy_per_day)?;
        ensure_positive("unloading_rate_cy_per_day", self.unloading_rate_cy_per_day)?;

        for (parameter, days) in [
            ("rip_days", self.rip_days),
            ("treat_days", self.treat_days),
            ("dry_days", self.dry_days),
        ] {
            if days == 0 {
                return Err(ParameterError::new(
                    parameter,
                    "phase duration must be at least one operating day",
                ));
            }
            if days > MAX_PHASE_DAYS {
                return Err(ParameterError::new(
                    parameter,
                    format!(
                        "phase duration of {} operating days exceeds the limit of {}",
                        days, MAX_PHASE_DAYS
                    ),
                ));
            }
        }

        for (phase, week) in self.weekend_policy.iter() {
            if week.operating_days_per_week() == 0 {
                return Err(ParameterError::new(
                    "weekend_policy",
                    format!("phase '{}' has no operating day in its weekly pattern", phase),
                ));
            }
        }
        Ok(())
    }

    /// The rate at which a cell is filled during the Load phase.
    pub fn effective_loading_rate(&self) -> f64 {
        if self.load_paced_by_intake {
            self.loading_rate_cy_per_day.min(self.daily_volume_cy)
        } else {
            self.loading_rate_cy_per_day
        }
    }

    /// The equipment-imposed ceiling on facility throughput.
    pub fn equipment_ceiling_cy_per_day(&self) -> f64 {
        self.loading_rate_cy_per_day.min(self.unloading_rate_cy_per_day)
    }

    /// Fixed operating-day duration of a volume-independent phase.
    ///
    /// Returns `None` for Load and Unload, whose durations depend on the cell volume.
    pub fn fixed_phase_days(&self, phase: Phase) -> Option<u32> {
        match phase {
            Phase::Rip => Some(self.rip_days),
            Phase::Treat => Some(self.treat_days),
            Phase::Dry => Some(self.dry_days),
            Phase::Load | Phase::Unload => None,
        }
    }
}

fn ensure_positive(parameter: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::new(
            parameter,
            format!("must be a positive finite number, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::schedule::WorkWeek;

    fn sample() -> FacilityParameters {
        FacilityParameters {
            daily_volume_cy: 200.0,
            cell_depth_ft: 4.0,
            loading_rate_cy_per_day: 300.0,
            unloading_rate_cy_per_day: 250.0,
            rip_days: 2,
            treat_days: 5,
            dry_days: 3,
            weekend_policy: WeekendPolicy::default(),
            load_paced_by_intake: false,
        }
    }

    #[test]
    fn valid_parameters_pass_validation() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn non_positive_volume_is_rejected_with_parameter_name() {
        let mut params = sample();
        params.daily_volume_cy = 0.0;
        let err = params.validate().unwrap_err();
        assert_eq!(err.parameter, "daily_volume_cy");
    }

    #[test]
    fn nan_depth_is_rejected() {
        let mut params = sample();
        params.cell_depth_ft = f64::NAN;
        assert_eq!(params.validate().unwrap_err().parameter, "cell_depth_ft");
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut params = sample();
        params.unloading_rate_cy_per_day = -5.0;
        assert_eq!(
            params.validate().unwrap_err().parameter,
            "unloading_rate_cy_per_day"
        );
    }

    #[test]
    fn zero_phase_duration_is_rejected() {
        let mut params = sample();
        params.treat_days = 0;
        assert_eq!(params.validate().unwrap_err().parameter, "treat_days");
    }

    #[test]
    fn phase_duration_beyond_limit_is_rejected() {
        let mut params = sample();
        params.dry_days = MAX_PHASE_DAYS;
        assert_eq!(params.validate(), Ok(()));
        params.rip_days = u32::MAX;
        assert_eq!(params.validate().unwrap_err().parameter, "rip_days");
    }

    #[test]
    fn phase_without_operating_days_is_rejected() {
        let mut params = sample();
        params
            .weekend_policy
            .set(Phase::Dry, WorkWeek::new([false; 7]));
        let err = params.validate().unwrap_err();
        assert_eq!(err.parameter, "weekend_policy");
        assert!(err.reason.contains("dry"));
    }

    #[test]
    fn load_pacing_caps_loading_rate_at_intake() {
        let mut params = sample();
        assert_eq!(params.effective_loading_rate(), 300.0);
        params.load_paced_by_intake = true;
        assert_eq!(params.effective_loading_rate(), 200.0);
    }

    #[test]
    fn equipment_ceiling_is_slower_of_load_and_unload() {
        assert_eq!(sample().equipment_ceiling_cy_per_day(), 250.0);
    }

    #[test]
    fn fixed_phase_days_excludes_equipment_paced_phases() {
        let params = sample();
        assert_eq!(params.fixed_phase_days(Phase::Treat), Some(5));
        assert_eq!(params.fixed_phase_days(Phase::Load), None);
        assert_eq!(params.fixed_phase_days(Phase::Unload), None);
    }
}
