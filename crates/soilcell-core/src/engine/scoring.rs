use super::config::ScoringConfig;
use super::state::{ScoreComponents, ScoredConfiguration, score_ticks};
use crate::core::models::cell::CandidateConfiguration;
use crate::core::models::facility::FacilityParameters;

/// Score at the edges of the target utilization band.
const TARGET_EDGE_SCORE: f64 = 0.9;
/// Score at the edges of the acceptable utilization band.
const ACCEPTABLE_EDGE_SCORE: f64 = 0.6;
/// Utilization distance over which the score outside the acceptable band falls by a factor e.
const OUTSIDE_DECAY: f64 = 0.1;
/// Score per buffer day (relative to the minimum) when the buffer is too thin.
const THIN_BUFFER_SCALE: f64 = 0.25;
/// Floor of the over-built buffer score, reached at `OVERBUILT_FLOOR_MULTIPLE * max_buffer_days`.
const OVERBUILT_FLOOR: f64 = 0.5;
const OVERBUILT_FLOOR_MULTIPLE: f64 = 4.0;

/// Observed extremes of the cost drivers across the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRange {
    pub storage_min: f64,
    pub storage_max: f64,
    pub count_min: u32,
    pub count_max: u32,
}

impl CostRange {
    pub fn from_candidates<'c>(
        candidates: impl IntoIterator<Item = &'c CandidateConfiguration>,
    ) -> Option<Self> {
        candidates.into_iter().fold(None, |range, c| {
            let storage = c.storage_cy();
            Some(match range {
                None => CostRange {
                    storage_min: storage,
                    storage_max: storage,
                    count_min: c.cell_count,
                    count_max: c.cell_count,
                },
                Some(r) => CostRange {
                    storage_min: r.storage_min.min(storage),
                    storage_max: r.storage_max.max(storage),
                    count_min: r.count_min.min(c.cell_count),
                    count_max: r.count_max.max(c.cell_count),
                },
            })
        })
    }
}

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// 1 inside the target band, easing to 0.6 at the acceptable edges, then decaying exponentially.
pub fn utilization_score(utilization: f64, config: &ScoringConfig) -> f64 {
    let target = &config.target_utilization;
    let acceptable = &config.acceptable_utilization;

    if target.contains(utilization) {
        return 1.0;
    }
    if acceptable.contains(utilization) {
        let span = if utilization < target.low {
            target.low - acceptable.low
        } else {
            acceptable.high - target.high
        };
        let fraction = if span > 0.0 {
            target.distance(utilization) / span
        } else {
            1.0
        };
        return TARGET_EDGE_SCORE - (TARGET_EDGE_SCORE - ACCEPTABLE_EDGE_SCORE) * fraction;
    }
    let excess = acceptable.distance(utilization);
    ACCEPTABLE_EDGE_SCORE * (-excess / OUTSIDE_DECAY).exp()
}

/// Heavily penalizes less than `min_buffer_days` of storage, mildly penalizes over-building.
pub fn buffer_score(days_of_capacity: f64, config: &ScoringConfig) -> f64 {
    if days_of_capacity < config.min_buffer_days {
        return THIN_BUFFER_SCALE * (days_of_capacity / config.min_buffer_days).max(0.0);
    }
    if days_of_capacity <= config.max_buffer_days {
        return 1.0;
    }
    let overbuilt_span = (OVERBUILT_FLOOR_MULTIPLE - 1.0) * config.max_buffer_days;
    let fraction = ((days_of_capacity - config.max_buffer_days) / overbuilt_span).min(1.0);
    1.0 - (1.0 - OVERBUILT_FLOOR) * fraction
}

/// Scores candidates from one pool against one facility and scoring policy.
///
/// The capital-cost proxy is normalized against the pool's observed range, so a scorer is
/// tied to the pool it was built from.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    config: &'a ScoringConfig,
    daily_volume_cy: f64,
    range: CostRange,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a ScoringConfig, params: &FacilityParameters, range: CostRange) -> Self {
        Self {
            config,
            daily_volume_cy: params.daily_volume_cy,
            range,
        }
    }

    /// Monotonic in total storage and in cell count; `0` is the cheapest layout in the pool.
    pub fn cost_proxy(&self, candidate: &CandidateConfiguration) -> f64 {
        let share = self.config.storage_cost_share;
        let storage = normalize(
            candidate.storage_cy(),
            self.range.storage_min,
            self.range.storage_max,
        );
        let count = normalize(
            f64::from(candidate.cell_count),
            f64::from(self.range.count_min),
            f64::from(self.range.count_max),
        );
        share * storage + (1.0 - share) * count
    }

    pub fn score(&self, candidate: &CandidateConfiguration) -> ScoredConfiguration {
        let throughput = candidate.throughput_cy_per_day();
        let storage = candidate.storage_cy();

        let utilization = self.daily_volume_cy / throughput;
        let days_of_capacity = storage / self.daily_volume_cy;
        let surplus_cy_per_day = throughput - self.daily_volume_cy;
        let cost_proxy = self.cost_proxy(candidate);
        let operational_penalty = candidate.capacity.stranded_pipeline_fraction();

        let components = ScoreComponents {
            utilization: utilization_score(utilization, self.config),
            cost: 1.0 - cost_proxy,
            buffer: buffer_score(days_of_capacity, self.config),
            operational: 1.0 - operational_penalty,
        };
        let w = &self.config.weights;
        let score = w.utilization * components.utilization
            + w.cost * components.cost
            + w.buffer * components.buffer
            + w.operational * components.operational;

        ScoredConfiguration {
            candidate: candidate.clone(),
            utilization,
            days_of_capacity,
            surplus_cy_per_day,
            headroom_pct: surplus_cy_per_day / self.daily_volume_cy * 100.0,
            cost_proxy,
            operational_penalty,
            components,
            score,
            score_ticks: score_ticks(score, self.config.tie_epsilon),
        }
    }
}
