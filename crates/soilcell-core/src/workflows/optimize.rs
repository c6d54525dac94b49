use crate::core::models::cell::CandidateConfiguration;
use crate::core::models::facility::FacilityParameters;
use crate::engine::config::OptimizeConfig;
use crate::engine::error::EngineError;
use crate::engine::generator::generate;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scoring::{CostRange, Scorer};
use crate::engine::state::{Ranking, ScoredConfiguration};
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// The recommended configuration; always `shortlist[0]`.
    pub best: ScoredConfiguration,
    /// The best configurations in ranking order, at most `search.shortlist_len` long.
    pub shortlist: Vec<ScoredConfiguration>,
    /// (volume, count) pairs enumerated before filtering.
    pub examined: usize,
    /// Candidates that survived filtering and were scored.
    pub feasible: usize,
}

impl OptimizationResult {
    /// The shortlist without the recommendation.
    pub fn alternatives(&self) -> &[ScoredConfiguration] {
        self.shortlist.get(1..).unwrap_or_default()
    }
}

/// Runs a complete search without progress reporting.
pub fn optimize(
    params: &FacilityParameters,
    config: &OptimizeConfig,
) -> Result<OptimizationResult, EngineError> {
    run(params, config, &ProgressReporter::new())
}

/// Validates the inputs, then runs Generator → Capacity Model → Scorer over every candidate
/// and ranks the results.
///
/// Any failed precondition aborts the whole search; candidates are never skipped silently.
#[instrument(skip_all, name = "optimize_workflow")]
pub fn run(
    params: &FacilityParameters,
    config: &OptimizeConfig,
    reporter: &ProgressReporter,
) -> Result<OptimizationResult, EngineError> {
    reporter.phase("Validating Parameters", || -> Result<(), EngineError> {
        params.validate()?;
        config.validate()?;
        Ok(())
    })?;

    let candidates = generate_candidates(params, config, reporter)?;
    let Some(range) = CostRange::from_candidates(&candidates) else {
        info!(
            examined = config.search.candidate_pairs(),
            "No candidate survived filtering."
        );
        return Err(no_feasible_configuration(params, config));
    };

    let scored = score_candidates(&candidates, params, config, range, reporter);
    let feasible = scored.len();

    let ranking = reporter.phase("Ranking", || -> Result<Ranking, EngineError> {
        Ok(Ranking::new(scored))
    })?;
    let shortlist = ranking.into_top(config.search.shortlist_len);
    let best = shortlist
        .first()
        .cloned()
        .ok_or_else(|| no_feasible_configuration(params, config))?;

    info!(
        cell_volume_cy = best.cell_volume_cy(),
        cell_count = best.cell_count(),
        utilization = best.utilization,
        score = best.score,
        feasible,
        "Search complete."
    );

    Ok(OptimizationResult {
        best,
        shortlist,
        examined: config.search.candidate_pairs(),
        feasible,
    })
}

fn no_feasible_configuration(params: &FacilityParameters, config: &OptimizeConfig) -> EngineError {
    EngineError::NoFeasibleConfiguration {
        daily_volume_cy: params.daily_volume_cy,
        volume_min_cy: config.search.volume_min_cy,
        volume_max_cy: config.search.volume_max_cy,
        count_min: config.search.count_min,
        count_max: config.search.count_max,
        examined: config.search.candidate_pairs(),
    }
}

fn generate_candidates(
    params: &FacilityParameters,
    config: &OptimizeConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<CandidateConfiguration>, EngineError> {
    reporter.phase("Generating Candidates", || -> Result<_, EngineError> {
        info!(
            pairs = config.search.candidate_pairs(),
            daily_volume_cy = params.daily_volume_cy,
            "Enumerating candidate configurations."
        );
        let generator = generate(params, &config.search)?;
        let candidates: Vec<_> = generator.iter().collect();

        reporter.report(Progress::CandidatesGenerated {
            examined: generator.examined(),
            feasible: candidates.len(),
        });
        debug!(
            buildable_volumes = generator.buildable_volumes(),
            feasible = candidates.len(),
            "Candidate generation finished."
        );
        Ok(candidates)
    })
}

fn score_candidates(
    candidates: &[CandidateConfiguration],
    params: &FacilityParameters,
    config: &OptimizeConfig,
    range: CostRange,
    reporter: &ProgressReporter,
) -> Vec<ScoredConfiguration> {
    reporter.report(Progress::PhaseStart { name: "Scoring" });
    reporter.report(Progress::TaskStart {
        total_steps: candidates.len() as u64,
    });

    let scorer = Scorer::new(&config.scoring, params, range);

    let score_one = |candidate: &CandidateConfiguration| {
        let scored = scorer.score(candidate);
        reporter.report(Progress::TaskIncrement);
        scored
    };

    #[cfg(feature = "parallel")]
    let scored: Vec<_> = candidates.par_iter().map(score_one).collect();
    #[cfg(not(feature = "parallel"))]
    let scored: Vec<_> = candidates.iter().map(score_one).collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    scored
}
