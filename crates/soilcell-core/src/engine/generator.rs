use super::config::SearchConfig;
use crate::core::calendar::CalendarError;
use crate::core::capacity::capacity;
use crate::core::cycle::{CycleBreakdown, cycle_time};
use crate::core::models::cell::{CandidateConfiguration, CellDimensions};
use crate::core::models::facility::FacilityParameters;
use tracing::{debug, trace};

/// A buildable cell size with its volume-dependent cycle precomputed.
#[derive(Debug, Clone, PartialEq)]
struct CellType {
    volume_cy: f64,
    dimensions: CellDimensions,
    cycle: CycleBreakdown,
}

/// The bounded space of candidate configurations for one facility.
///
/// Per-volume work (dimensions and cycle time) is done once up front and is the only
/// fallible step; the (volume, count) pairs themselves are produced lazily by [`iter`],
/// which can be called any number of times and always yields the same sequence.
///
/// [`iter`]: CandidateGenerator::iter
#[derive(Debug, Clone)]
pub struct CandidateGenerator<'a> {
    params: &'a FacilityParameters,
    search: &'a SearchConfig,
    cell_types: Vec<CellType>,
}

/// Builds the candidate space for `params` over the ranges in `search`.
///
/// Cell volumes whose footprint is narrower than `search.min_cell_width_ft` are dropped here;
/// pairs whose total storage cannot hold one day of intake are skipped during iteration.
pub fn generate<'a>(
    params: &'a FacilityParameters,
    search: &'a SearchConfig,
) -> Result<CandidateGenerator<'a>, CalendarError> {
    let mut cell_types = Vec::with_capacity(search.volume_steps());
    for volume_cy in search.cell_volumes() {
        let dimensions =
            CellDimensions::from_volume(volume_cy, params.cell_depth_ft, search.aspect_ratio);
        if dimensions.width_ft < search.min_cell_width_ft {
            trace!(
                volume_cy,
                width_ft = dimensions.width_ft,
                "Discarding cell volume below minimum footprint."
            );
            continue;
        }
        let cycle = cycle_time(volume_cy, params)?;
        cell_types.push(CellType {
            volume_cy,
            dimensions,
            cycle,
        });
    }

    debug!(
        buildable_volumes = cell_types.len(),
        searched_volumes = search.volume_steps(),
        "Precomputed cycle times for buildable cell volumes."
    );

    Ok(CandidateGenerator {
        params,
        search,
        cell_types,
    })
}

impl<'a> CandidateGenerator<'a> {
    pub fn iter(&self) -> Candidates<'_, 'a> {
        Candidates {
            generator: self,
            type_idx: 0,
            count: self.search.count_min,
        }
    }

    /// Number of (volume, count) pairs enumerated before filtering.
    pub fn examined(&self) -> usize {
        self.search.candidate_pairs()
    }

    /// Number of distinct cell volumes that passed the footprint filter.
    pub fn buildable_volumes(&self) -> usize {
        self.cell_types.len()
    }

    fn build(&self, cell: &CellType, count: u32) -> CandidateConfiguration {
        let capacity = capacity(
            cell.volume_cy,
            count,
            cell.cycle.total_calendar_days(),
            self.params.loading_rate_cy_per_day,
            self.params.unloading_rate_cy_per_day,
        );
        CandidateConfiguration {
            cell_volume_cy: cell.volume_cy,
            cell_count: count,
            dimensions: cell.dimensions,
            cycle: cell.cycle,
            capacity,
        }
    }
}

impl<'g, 'a> IntoIterator for &'g CandidateGenerator<'a> {
    type Item = CandidateConfiguration;
    type IntoIter = Candidates<'g, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, finite iterator over feasible candidates, volume-major then count-ascending.
#[derive(Debug, Clone)]
pub struct Candidates<'g, 'a> {
    generator: &'g CandidateGenerator<'a>,
    type_idx: usize,
    count: u32,
}

impl Iterator for Candidates<'_, '_> {
    type Item = CandidateConfiguration;

    fn next(&mut self) -> Option<Self::Item> {
        let generator = self.generator;
        let search = generator.search;
        let daily_volume = generator.params.daily_volume_cy;

        while let Some(cell) = generator.cell_types.get(self.type_idx) {
            if self.count > search.count_max {
                self.type_idx += 1;
                self.count = search.count_min;
                continue;
            }
            let count = self.count;
            self.count += 1;

            if f64::from(count) * cell.volume_cy < daily_volume {
                continue;
            }
            return Some(generator.build(cell, count));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::schedule::WeekendPolicy;

    fn params(daily_volume: f64) -> FacilityParameters {
        FacilityParameters {
            daily_volume_cy: daily_volume,
            cell_depth_ft: 4.0,
            loading_rate_cy_per_day: 300.0,
            unloading_rate_cy_per_day: 300.0,
            rip_days: 2,
            treat_days: 5,
            dry_days: 3,
            weekend_policy: WeekendPolicy::default(),
            load_paced_by_intake: false,
        }
    }

    fn small_search() -> SearchConfig {
        SearchConfig {
            volume_min_cy: 100.0,
            volume_max_cy: 500.0,
            volume_step_cy: 100.0,
            count_min: 1,
            count_max: 4,
            ..Default::default()
        }
    }

    #[test]
    fn enumerates_every_pair_when_nothing_is_filtered() {
        let p = params(50.0);
        let search = small_search();
        let generator = generate(&p, &search).unwrap();
        assert_eq!(generator.iter().count(), 20);
        assert_eq!(generator.examined(), 20);
    }

    #[test]
    fn pairs_that_cannot_hold_one_day_of_intake_are_skipped() {
        let p = params(350.0);
        let search = small_search();
        let generator = generate(&p, &search).unwrap();
        assert!(generator.iter().all(|c| c.storage_cy() >= 350.0));
        assert!(
            !generator
                .iter()
                .any(|c| c.cell_volume_cy == 100.0 && c.cell_count == 3)
        );
        assert!(
            generator
                .iter()
                .any(|c| c.cell_volume_cy == 100.0 && c.cell_count == 4)
        );
    }

    #[test]
    fn volumes_narrower_than_minimum_width_are_dropped() {
        let p = params(50.0);
        let search = SearchConfig {
            min_cell_width_ft: 25.0,
            ..small_search()
        };
        let generator = generate(&p, &search).unwrap();
        // 100 CY at 4 ft deep and 2:1 is about 18.4 ft wide; 200 CY is 26 ft wide.
        assert_eq!(generator.buildable_volumes(), 4);
        assert!(generator.iter().all(|c| c.cell_volume_cy >= 200.0));
        assert!(generator.iter().all(|c| c.dimensions.width_ft >= 25.0));
    }

    #[test]
    fn iteration_is_restartable_and_deterministic() {
        let p = params(120.0);
        let search = small_search();
        let generator = generate(&p, &search).unwrap();
        let first: Vec<_> = generator.iter().collect();
        let second: Vec<_> = (&generator).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn candidates_carry_derived_cycle_and_capacity() {
        let p = params(200.0);
        let search = small_search();
        let generator = generate(&p, &search).unwrap();
        let candidate = generator
            .iter()
            .find(|c| c.cell_volume_cy == 300.0 && c.cell_count == 4)
            .unwrap();
        assert_eq!(candidate.cycle_time_days(), 16);
        assert_eq!(candidate.storage_cy(), 1200.0);
        assert!((candidate.throughput_cy_per_day() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn intake_larger_than_every_layout_yields_no_candidates() {
        let p = params(10_000.0);
        let search = SearchConfig {
            volume_max_cy: 500.0,
            count_max: 2,
            ..Default::default()
        };
        let generator = generate(&p, &search).unwrap();
        assert_eq!(generator.iter().next(), None);
    }
}
