use crate::core::capacity::FacilityCapacity;
use crate::core::cycle::CycleBreakdown;
use serde::{Deserialize, Serialize};

pub const CUBIC_FEET_PER_CUBIC_YARD: f64 = 27.0;

/// Rectangular footprint of a single treatment cell.
///
/// The footprint keeps a fixed length:width aspect ratio, so for a given volume and depth
/// `width = sqrt(volume_cf / (aspect_ratio * depth))` and `length = aspect_ratio * width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellDimensions {
    pub length_ft: f64,
    pub width_ft: f64,
    pub depth_ft: f64,
    pub aspect_ratio: f64,
}

impl CellDimensions {
    pub fn from_volume(volume_cy: f64, depth_ft: f64, aspect_ratio: f64) -> Self {
        let volume_cf = volume_cy * CUBIC_FEET_PER_CUBIC_YARD;
        let width_ft = (volume_cf / (aspect_ratio * depth_ft)).sqrt();
        Self {
            length_ft: aspect_ratio * width_ft,
            width_ft,
            depth_ft,
            aspect_ratio,
        }
    }

    #[inline]
    pub fn footprint_sf(&self) -> f64 {
        self.length_ft * self.width_ft
    }

    #[inline]
    pub fn volume_cf(&self) -> f64 {
        self.footprint_sf() * self.depth_ft
    }

    #[inline]
    pub fn volume_cy(&self) -> f64 {
        self.volume_cf() / CUBIC_FEET_PER_CUBIC_YARD
    }
}

/// A (cell volume, cell count) design together with everything derived from it.
///
/// Produced by the candidate generator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateConfiguration {
    pub cell_volume_cy: f64,
    pub cell_count: u32,
    pub dimensions: CellDimensions,
    pub cycle: CycleBreakdown,
    pub capacity: FacilityCapacity,
}

impl CandidateConfiguration {
    #[inline]
    pub fn cycle_time_days(&self) -> u32 {
        self.cycle.total_calendar_days()
    }

    #[inline]
    pub fn throughput_cy_per_day(&self) -> f64 {
        self.capacity.throughput_cy_per_day
    }

    #[inline]
    pub fn storage_cy(&self) -> f64 {
        self.capacity.storage_cy
    }
}
