use serde::{Deserialize, Serialize};

pub const DEFAULT_SAFETY_FACTOR: f64 = 1.1;

/// Which limit sets the achievable facility throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingConstraint {
    /// The staggered cell pipeline (`count * volume / cycle`) is the slower limit.
    CycleTime,
    /// The loading or unloading equipment is the slower limit.
    Equipment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacilityCapacity {
    /// Achievable daily throughput: the minimum of pipeline rate and equipment ceiling.
    pub throughput_cy_per_day: f64,
    pub pipeline_rate_cy_per_day: f64,
    pub equipment_ceiling_cy_per_day: f64,
    /// Total static storage, `cell_count * cell_volume`.
    pub storage_cy: f64,
    pub binding: BindingConstraint,
}

impl FacilityCapacity {
    #[inline]
    pub fn is_equipment_bound(&self) -> bool {
        self.binding == BindingConstraint::Equipment
    }

    /// Share of the pipeline rate the equipment cannot serve; zero unless equipment binds.
    pub fn stranded_pipeline_fraction(&self) -> f64 {
        match self.binding {
            BindingConstraint::CycleTime => 0.0,
            BindingConstraint::Equipment => {
                1.0 - self.equipment_ceiling_cy_per_day / self.pipeline_rate_cy_per_day
            }
        }
    }
}

/// Steady-state throughput and storage of `cell_count` cells of `cell_volume_cy` each.
///
/// Cells run as a staggered pipeline, so the pipeline rate is `count * volume / cycle`; the
/// loading and unloading equipment cap it at `min(loading_rate, unloading_rate)`.
pub fn capacity(
    cell_volume_cy: f64,
    cell_count: u32,
    cycle_time_days: u32,
    loading_rate_cy_per_day: f64,
    unloading_rate_cy_per_day: f64,
) -> FacilityCapacity {
    let storage_cy = f64::from(cell_count) * cell_volume_cy;
    let pipeline_rate_cy_per_day = storage_cy / f64::from(cycle_time_days.max(1));
    let equipment_ceiling_cy_per_day = loading_rate_cy_per_day.min(unloading_rate_cy_per_day);

    let (throughput_cy_per_day, binding) =
        if pipeline_rate_cy_per_day > equipment_ceiling_cy_per_day {
            (equipment_ceiling_cy_per_day, BindingConstraint::Equipment)
        } else {
            (pipeline_rate_cy_per_day, BindingConstraint::CycleTime)
        };

    FacilityCapacity {
        throughput_cy_per_day,
        pipeline_rate_cy_per_day,
        equipment_ceiling_cy_per_day,
        storage_cy,
        binding,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRequirement {
    /// Intake accumulated over one full cycle.
    pub volume_per_cycle_cy: f64,
    pub theoretical_cells: f64,
    /// Theoretical count scaled by the safety factor and rounded up.
    pub cells_with_safety: u32,
}

/// Cells of `cell_volume_cy` needed to absorb `daily_volume_cy` over a cycle of `cycle_days`.
pub fn cells_required(
    daily_volume_cy: f64,
    cell_volume_cy: f64,
    cycle_days: u32,
    safety_factor: f64,
) -> CellRequirement {
    let volume_per_cycle_cy = daily_volume_cy * f64::from(cycle_days);
    let theoretical_cells = volume_per_cycle_cy / cell_volume_cy;
    CellRequirement {
        volume_per_cycle_cy,
        theoretical_cells,
        cells_with_safety: (theoretical_cells * safety_factor).ceil() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn storage_is_count_times_volume() {
        let cap = capacity(750.0, 6, 20, 300.0, 300.0);
        assert!(f64_approx_equal(cap.storage_cy, 4500.0));
    }

    #[test]
    fn pipeline_rate_binds_when_below_equipment_ceiling() {
        let cap = capacity(300.0, 12, 16, 300.0, 300.0);
        assert!(f64_approx_equal(cap.pipeline_rate_cy_per_day, 225.0));
        assert!(f64_approx_equal(cap.throughput_cy_per_day, 225.0));
        assert_eq!(cap.binding, BindingConstraint::CycleTime);
        assert_eq!(cap.stranded_pipeline_fraction(), 0.0);
    }

    #[test]
    fn equipment_binds_when_pipeline_exceeds_ceiling() {
        let cap = capacity(5000.0, 1, 10, 50.0, 300.0);
        assert!(cap.is_equipment_bound());
        assert!(f64_approx_equal(cap.throughput_cy_per_day, 50.0));
        assert!(f64_approx_equal(cap.stranded_pipeline_fraction(), 0.9));
    }

    #[test]
    fn equal_pipeline_and_ceiling_counts_as_cycle_bound() {
        let cap = capacity(300.0, 10, 10, 300.0, 500.0);
        assert_eq!(cap.binding, BindingConstraint::CycleTime);
    }

    #[test]
    fn adding_cells_never_lowers_storage_or_pipeline_rate() {
        let mut previous = capacity(400.0, 1, 18, 300.0, 300.0);
        for count in 2..=20 {
            let next = capacity(400.0, count, 18, 300.0, 300.0);
            assert!(next.storage_cy >= previous.storage_cy);
            assert!(next.pipeline_rate_cy_per_day >= previous.pipeline_rate_cy_per_day);
            assert!(next.throughput_cy_per_day >= previous.throughput_cy_per_day);
            previous = next;
        }
    }

    #[test]
    fn cells_required_applies_safety_factor_and_rounds_up() {
        let req = cells_required(300.0, 1000.0, 20, DEFAULT_SAFETY_FACTOR);
        assert!(f64_approx_equal(req.volume_per_cycle_cy, 6000.0));
        assert!(f64_approx_equal(req.theoretical_cells, 6.0));
        assert_eq!(req.cells_with_safety, 7);
    }
}
