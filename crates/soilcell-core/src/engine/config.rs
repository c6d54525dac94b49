use crate::core::models::facility::{FacilityParameters, ParameterError};
use crate::core::models::phase::Phase;
use crate::core::models::schedule::{WeekendPolicy, WorkWeek};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on enumerated (volume, count) pairs, keeping a search within interactive latency.
pub const MAX_CANDIDATE_PAIRS: usize = 250_000;

/// Finest accepted tie tolerance. Composite scores lie in `[0, 1]`, so ticks stay far below
/// `i64::MAX` at this resolution.
pub const MIN_TIE_EPSILON: f64 = 1e-12;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;
const RANGE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error(transparent)]
    Invalid(#[from] ParameterError),
}

/// Bounds of the discretized design space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub volume_min_cy: f64,
    pub volume_max_cy: f64,
    pub volume_step_cy: f64,
    pub count_min: u32,
    pub count_max: u32,
    /// Length:width ratio of the cell footprint; 1.0 is square.
    pub aspect_ratio: f64,
    /// Cells narrower than this are not buildable and are filtered out.
    pub min_cell_width_ft: f64,
    pub shortlist_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            volume_min_cy: 100.0,
            volume_max_cy: 5000.0,
            volume_step_cy: 100.0,
            count_min: 1,
            count_max: 20,
            aspect_ratio: 2.0,
            min_cell_width_ft: 10.0,
            shortlist_len: 10,
        }
    }
}

impl SearchConfig {
    /// Number of cell volumes in `volume_min_cy..=volume_max_cy` at `volume_step_cy`.
    pub fn volume_steps(&self) -> usize {
        let steps = ((self.volume_max_cy - self.volume_min_cy) / self.volume_step_cy
            + RANGE_TOLERANCE)
            .floor() as usize;
        steps.saturating_add(1)
    }

    pub fn cell_volumes(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        (0..self.volume_steps()).map(|i| self.volume_min_cy + i as f64 * self.volume_step_cy)
    }

    pub fn cell_counts(&self) -> std::ops::RangeInclusive<u32> {
        self.count_min..=self.count_max
    }

    /// Total (volume, count) pairs before any filtering.
    pub fn candidate_pairs(&self) -> usize {
        let counts = self.count_max.saturating_sub(self.count_min) as usize + 1;
        self.volume_steps().saturating_mul(counts)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.volume_min_cy.is_finite() && self.volume_min_cy > 0.0) {
            return Err(ParameterError::new("volume_min_cy", "must be positive"));
        }
        if !(self.volume_max_cy.is_finite() && self.volume_max_cy >= self.volume_min_cy) {
            return Err(ParameterError::new(
                "volume_max_cy",
                "must be finite and at least volume_min_cy",
            ));
        }
        if !(self.volume_step_cy.is_finite() && self.volume_step_cy > 0.0) {
            return Err(ParameterError::new("volume_step_cy", "must be positive"));
        }
        if self.count_min == 0 {
            return Err(ParameterError::new("count_min", "must be at least 1"));
        }
        if self.count_max < self.count_min {
            return Err(ParameterError::new("count_max", "must be at least count_min"));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ParameterError::new("aspect_ratio", "must be positive"));
        }
        if !(self.min_cell_width_ft.is_finite() && self.min_cell_width_ft >= 0.0) {
            return Err(ParameterError::new(
                "min_cell_width_ft",
                "must be a non-negative number",
            ));
        }
        if self.shortlist_len == 0 {
            return Err(ParameterError::new("shortlist_len", "must be at least 1"));
        }
        let pairs = self.candidate_pairs();
        if pairs > MAX_CANDIDATE_PAIRS {
            return Err(ParameterError::new(
                "search",
                format!(
                    "search space of {} candidates exceeds the limit of {}; widen the volume step or narrow the ranges",
                    pairs, MAX_CANDIDATE_PAIRS
                ),
            ));
        }
        Ok(())
    }
}

/// Relative importance of the scoring objectives. All positive, summing to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub utilization: f64,
    pub cost: f64,
    pub buffer: f64,
    pub operational: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            utilization: 0.4,
            cost: 0.3,
            buffer: 0.2,
            operational: 0.1,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.utilization + self.cost + self.buffer + self.operational
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, weight) in [
            ("weights.utilization", self.utilization),
            ("weights.cost", self.cost),
            ("weights.buffer", self.buffer),
            ("weights.operational", self.operational),
        ] {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(ParameterError::new(name, "scoring weights must be positive"));
            }
        }
        if (self.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ParameterError::new(
                "weights",
                format!("scoring weights must sum to 1, got {}", self.sum()),
            ));
        }
        Ok(())
    }
}

/// A closed interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Distance from `value` to the nearest edge; zero inside the band.
    #[inline]
    pub fn distance(&self, value: f64) -> f64 {
        if value < self.low {
            self.low - value
        } else if value > self.high {
            value - self.high
        } else {
            0.0
        }
    }

    fn encloses(&self, other: &Band) -> bool {
        self.low <= other.low && other.high <= self.high
    }
}

/// Scoring policy: objective weights, utilization bands and buffer limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub target_utilization: Band,
    pub acceptable_utilization: Band,
    /// Days of storage below which a facility has no buffer for disruption.
    pub min_buffer_days: f64,
    /// Days of storage above which a facility is considered over-built.
    pub max_buffer_days: f64,
    /// Share of the cost proxy attributed to total volume; the rest is attributed to cell count.
    pub storage_cost_share: f64,
    /// Composite scores closer than this are ranked by the tie-break rules.
    pub tie_epsilon: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            target_utilization: Band::new(0.80, 0.90),
            acceptable_utilization: Band::new(0.70, 0.95),
            min_buffer_days: 1.0,
            max_buffer_days: 30.0,
            storage_cost_share: 0.7,
            tie_epsilon: 1e-9,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.weights.validate()?;
        let target = &self.target_utilization;
        if !(target.low > 0.0 && target.low <= target.high && target.high.is_finite()) {
            return Err(ParameterError::new(
                "target_utilization",
                "band must satisfy 0 < low <= high",
            ));
        }
        if !self.acceptable_utilization.encloses(target) {
            return Err(ParameterError::new(
                "acceptable_utilization",
                "band must enclose the target utilization band",
            ));
        }
        if !(self.min_buffer_days.is_finite() && self.min_buffer_days > 0.0) {
            return Err(ParameterError::new("min_buffer_days", "must be positive"));
        }
        if !(self.max_buffer_days.is_finite() && self.max_buffer_days >= self.min_buffer_days) {
            return Err(ParameterError::new(
                "max_buffer_days",
                "must be at least min_buffer_days",
            ));
        }
        if !(0.0..=1.0).contains(&self.storage_cost_share) {
            return Err(ParameterError::new(
                "storage_cost_share",
                "must lie within [0, 1]",
            ));
        }
        if !(self.tie_epsilon.is_finite() && self.tie_epsilon >= MIN_TIE_EPSILON) {
            return Err(ParameterError::new(
                "tie_epsilon",
                format!("must be at least {:e}", MIN_TIE_EPSILON),
            ));
        }
        Ok(())
    }
}

/// Everything that shapes a search besides the facility itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    pub search: SearchConfig,
    pub scoring: ScoringConfig,
}

impl OptimizeConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.search.validate()?;
        self.scoring.validate()
    }
}

#[derive(Default)]
pub struct FacilityParametersBuilder {
    daily_volume_cy: Option<f64>,
    cell_depth_ft: Option<f64>,
    loading_rate_cy_per_day: Option<f64>,
    unloading_rate_cy_per_day: Option<f64>,
    rip_days: Option<u32>,
    treat_days: Option<u32>,
    dry_days: Option<u32>,
    weekend_policy: WeekendPolicy,
    load_paced_by_intake: bool,
}

impl FacilityParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn daily_volume(mut self, cy_per_day: f64) -> Self {
        self.daily_volume_cy = Some(cy_per_day);
        self
    }
    pub fn cell_depth(mut self, feet: f64) -> Self {
        self.cell_depth_ft = Some(feet);
        self
    }
    pub fn loading_rate(mut self, cy_per_day: f64) -> Self {
        self.loading_rate_cy_per_day = Some(cy_per_day);
        self
    }
    pub fn unloading_rate(mut self, cy_per_day: f64) -> Self {
        self.unloading_rate_cy_per_day = Some(cy_per_day);
        self
    }
    /// Sets both equipment rates at once.
    pub fn equipment_rate(self, cy_per_day: f64) -> Self {
        self.loading_rate(cy_per_day).unloading_rate(cy_per_day)
    }
    pub fn rip_days(mut self, days: u32) -> Self {
        self.rip_days = Some(days);
        self
    }
    pub fn treat_days(mut self, days: u32) -> Self {
        self.treat_days = Some(days);
        self
    }
    pub fn dry_days(mut self, days: u32) -> Self {
        self.dry_days = Some(days);
        self
    }
    pub fn weekend_policy(mut self, policy: WeekendPolicy) -> Self {
        self.weekend_policy = policy;
        self
    }
    pub fn phase_schedule(mut self, phase: Phase, week: WorkWeek) -> Self {
        self.weekend_policy.set(phase, week);
        self
    }
    pub fn load_paced_by_intake(mut self, paced: bool) -> Self {
        self.load_paced_by_intake = paced;
        self
    }

    pub fn build(self) -> Result<FacilityParameters, ConfigError> {
        let params = FacilityParameters {
            daily_volume_cy: self
                .daily_volume_cy
                .ok_or(ConfigError::MissingParameter("daily_volume_cy"))?,
            cell_depth_ft: self
                .cell_depth_ft
                .ok_or(ConfigError::MissingParameter("cell_depth_ft"))?,
            loading_rate_cy_per_day: self
                .loading_rate_cy_per_day
                .ok_or(ConfigError::MissingParameter("loading_rate_cy_per_day"))?,
            unloading_rate_cy_per_day: self
                .unloading_rate_cy_per_day
                .ok_or(ConfigError::MissingParameter("unloading_rate_cy_per_day"))?,
            rip_days: self
                .rip_days
                .ok_or(ConfigError::MissingParameter("rip_days"))?,
            treat_days: self
                .treat_days
                .ok_or(ConfigError::MissingParameter("treat_days"))?,
            dry_days: self
                .dry_days
                .ok_or(ConfigError::MissingParameter("dry_days"))?,
            weekend_policy: self.weekend_policy,
            load_paced_by_intake: self.load_paced_by_intake,
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> FacilityParametersBuilder {
        FacilityParametersBuilder::new()
            .daily_volume(200.0)
            .cell_depth(4.0)
            .equipment_rate(300.0)
            .rip_days(2)
            .treat_days(5)
            .dry_days(3)
    }

    #[test]
    fn builder_produces_validated_parameters() {
        let params = complete_builder()
            .phase_schedule(Phase::Treat, WorkWeek::every_day())
            .build()
            .unwrap();
        assert_eq!(params.loading_rate_cy_per_day, 300.0);
        assert_eq!(params.unloading_rate_cy_per_day, 300.0);
        assert_eq!(*params.weekend_policy.get(Phase::Treat), WorkWeek::every_day());
        assert_eq!(*params.weekend_policy.get(Phase::Load), WorkWeek::weekdays_only());
    }

    #[test]
    fn builder_reports_first_missing_parameter() {
        let result = FacilityParametersBuilder::new().daily_volume(200.0).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("cell_depth_ft")));
    }

    #[test]
    fn builder_rejects_invalid_values() {
        let result = complete_builder().cell_depth(-1.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(ParameterError { parameter: "cell_depth_ft", .. }))
        ));
    }

    #[test]
    fn default_search_spans_fifty_volumes_and_twenty_counts() {
        let search = SearchConfig::default();
        assert_eq!(search.volume_steps(), 50);
        assert_eq!(search.candidate_pairs(), 1000);
        let volumes: Vec<_> = search.cell_volumes().collect();
        assert_eq!(volumes.first(), Some(&100.0));
        assert_eq!(volumes.last(), Some(&5000.0));
    }

    #[test]
    fn volume_steps_stop_at_the_last_step_below_max() {
        let search = SearchConfig {
            volume_min_cy: 100.0,
            volume_max_cy: 550.0,
            volume_step_cy: 200.0,
            ..Default::default()
        };
        let volumes: Vec<_> = search.cell_volumes().collect();
        assert_eq!(volumes, vec![100.0, 300.0, 500.0]);
    }

    #[test]
    fn default_configs_are_valid() {
        assert_eq!(OptimizeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let weights = ScoringWeights {
            utilization: 0.5,
            ..Default::default()
        };
        assert_eq!(weights.validate().unwrap_err().parameter, "weights");
    }

    #[test]
    fn weights_must_be_positive() {
        let weights = ScoringWeights {
            utilization: 0.7,
            operational: -0.2,
            ..Default::default()
        };
        assert_eq!(
            weights.validate().unwrap_err().parameter,
            "weights.operational"
        );
    }

    #[test]
    fn acceptable_band_must_enclose_target_band() {
        let scoring = ScoringConfig {
            acceptable_utilization: Band::new(0.85, 0.95),
            ..Default::default()
        };
        assert_eq!(
            scoring.validate().unwrap_err().parameter,
            "acceptable_utilization"
        );
    }

    #[test]
    fn tie_epsilon_below_tick_resolution_is_rejected() {
        for tie_epsilon in [0.0, 1e-300, MIN_TIE_EPSILON / 2.0] {
            let scoring = ScoringConfig {
                tie_epsilon,
                ..Default::default()
            };
            assert_eq!(scoring.validate().unwrap_err().parameter, "tie_epsilon");
        }
        let finest = ScoringConfig {
            tie_epsilon: MIN_TIE_EPSILON,
            ..Default::default()
        };
        assert_eq!(finest.validate(), Ok(()));
    }

    #[test]
    fn inverted_count_range_is_rejected() {
        let search = SearchConfig {
            count_min: 5,
            count_max: 2,
            ..Default::default()
        };
        assert_eq!(search.validate().unwrap_err().parameter, "count_max");
    }

    #[test]
    fn oversized_search_space_is_rejected() {
        let search = SearchConfig {
            volume_step_cy: 1.0,
            volume_max_cy: 100_000.0,
            ..Default::default()
        };
        assert_eq!(search.validate().unwrap_err().parameter, "search");
    }

    #[test]
    fn band_distance_is_zero_inside_and_linear_outside() {
        let band = Band::new(0.8, 0.9);
        assert_eq!(band.distance(0.85), 0.0);
        assert!((band.distance(0.7) - 0.1).abs() < 1e-12);
        assert!((band.distance(1.0) - 0.1).abs() < 1e-12);
        assert!(band.contains(0.8) && band.contains(0.9));
    }

    #[test]
    fn partial_toml_fills_remaining_fields_from_defaults() {
        let config: OptimizeConfig = toml::from_str(
            r#"
            [search]
            volume_max_cy = 2000.0
            count_max = 8

            [scoring.weights]
            utilization = 0.5
            cost = 0.2
            buffer = 0.2
            operational = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.search.volume_max_cy, 2000.0);
        assert_eq!(config.search.count_max, 8);
        assert_eq!(config.search.volume_min_cy, 100.0);
        assert_eq!(config.scoring.weights.utilization, 0.5);
        assert_eq!(config.scoring.min_buffer_days, 1.0);
        assert_eq!(config.validate(), Ok(()));
    }
}
