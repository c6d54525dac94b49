use crate::core::capacity::BindingConstraint;
use crate::core::models::cell::CandidateConfiguration;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Per-objective scores, each in `[0, 1]` where higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub utilization: f64,
    pub cost: f64,
    pub buffer: f64,
    pub operational: f64,
}

/// A candidate together with its metrics and composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredConfiguration {
    pub candidate: CandidateConfiguration,
    /// `incoming volume / throughput`.
    pub utilization: f64,
    /// `storage / incoming volume`.
    pub days_of_capacity: f64,
    /// `throughput - incoming volume`; negative when the facility falls behind.
    pub surplus_cy_per_day: f64,
    /// Surplus as a percentage of incoming volume.
    pub headroom_pct: f64,
    /// Relative capital cost in `[0, 1]`, normalized over the scored pool.
    pub cost_proxy: f64,
    /// Fraction of pipeline capacity stranded by the equipment; zero when cycle time binds.
    pub operational_penalty: f64,
    pub components: ScoreComponents,
    pub score: f64,
    /// `score` on the tie-epsilon grid; stored so that restored records rank as they did.
    pub(crate) score_ticks: i64,
}

impl ScoredConfiguration {
    #[inline]
    pub fn cell_volume_cy(&self) -> f64 {
        self.candidate.cell_volume_cy
    }

    #[inline]
    pub fn cell_count(&self) -> u32 {
        self.candidate.cell_count
    }

    #[inline]
    pub fn throughput_cy_per_day(&self) -> f64 {
        self.candidate.throughput_cy_per_day()
    }

    #[inline]
    pub fn storage_cy(&self) -> f64 {
        self.candidate.storage_cy()
    }

    #[inline]
    pub fn binding(&self) -> BindingConstraint {
        self.candidate.capacity.binding
    }

    /// Ranking order: `Less` means `self` ranks ahead of `other`.
    ///
    /// Higher composite score first, compared on an epsilon grid; then fewer cells, then
    /// smaller total volume, then smaller individual cells. The order is total.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score_ticks
            .cmp(&self.score_ticks)
            .then_with(|| self.cell_count().cmp(&other.cell_count()))
            .then_with(|| self.storage_cy().total_cmp(&other.storage_cy()))
            .then_with(|| self.cell_volume_cy().total_cmp(&other.cell_volume_cy()))
    }
}

/// Quantizes `score` to whole multiples of `epsilon` so equal-within-epsilon scores tie.
pub(crate) fn score_ticks(score: f64, epsilon: f64) -> i64 {
    (score / epsilon).round() as i64
}

/// Every scored candidate, sorted best first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    entries: Vec<ScoredConfiguration>,
}

impl Ranking {
    pub fn new(mut entries: Vec<ScoredConfiguration>) -> Self {
        entries.sort_by(ScoredConfiguration::rank_cmp);
        Self { entries }
    }

    pub fn best(&self) -> Option<&ScoredConfiguration> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best `n` entries, fewer if the ranking is shorter.
    pub fn into_top(mut self, n: usize) -> Vec<ScoredConfiguration> {
        self.entries.truncate(n);
        self.entries
    }
}
