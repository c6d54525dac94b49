use crate::error::{CliError, Result};
use serde::Deserialize;
use soilcell::core::models::phase::Phase;
use soilcell::core::models::schedule::{WeekendPolicy, WorkWeek};
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileFacilityConfig {
    pub daily_volume_cy: Option<f64>,
    pub cell_depth_ft: Option<f64>,
    pub loading_rate_cy_per_day: Option<f64>,
    pub unloading_rate_cy_per_day: Option<f64>,
    /// Sets both equipment rates; the specific rates win when also given.
    pub equipment_rate_cy_per_day: Option<f64>,
    pub load_paced_by_intake: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePhasesConfig {
    pub rip_days: Option<u32>,
    pub treat_days: Option<u32>,
    pub dry_days: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FileWorkWeek {
    pub saturday: Option<bool>,
    pub sunday: Option<bool>,
}

impl FileWorkWeek {
    /// Applies the weekend flags that are present on top of `base`.
    pub fn merge_into(self, base: WorkWeek) -> WorkWeek {
        WorkWeek::with_weekend(
            self.saturday.unwrap_or(base.saturday()),
            self.sunday.unwrap_or(base.sunday()),
        )
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileScheduleConfig {
    pub load: Option<FileWorkWeek>,
    pub rip: Option<FileWorkWeek>,
    pub treat: Option<FileWorkWeek>,
    pub dry: Option<FileWorkWeek>,
    pub unload: Option<FileWorkWeek>,
}

impl FileScheduleConfig {
    pub fn get(&self, phase: Phase) -> Option<FileWorkWeek> {
        match phase {
            Phase::Load => self.load,
            Phase::Rip => self.rip,
            Phase::Treat => self.treat,
            Phase::Dry => self.dry,
            Phase::Unload => self.unload,
        }
    }

    pub fn get_or_insert(&mut self, phase: Phase) -> &mut FileWorkWeek {
        let slot = match phase {
            Phase::Load => &mut self.load,
            Phase::Rip => &mut self.rip,
            Phase::Treat => &mut self.treat,
            Phase::Dry => &mut self.dry,
            Phase::Unload => &mut self.unload,
        };
        slot.get_or_insert_with(Default::default)
    }

    pub fn merge_into(&self, mut policy: WeekendPolicy) -> WeekendPolicy {
        for phase in Phase::ALL {
            if let Some(week) = self.get(phase) {
                policy.set(phase, week.merge_into(*policy.get(phase)));
            }
        }
        policy
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSearchConfig {
    pub volume_min_cy: Option<f64>,
    pub volume_max_cy: Option<f64>,
    pub volume_step_cy: Option<f64>,
    pub count_min: Option<u32>,
    pub count_max: Option<u32>,
    pub aspect_ratio: Option<f64>,
    pub min_cell_width_ft: Option<f64>,
    pub shortlist_len: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileScoringWeights {
    pub utilization: Option<f64>,
    pub cost: Option<f64>,
    pub buffer: Option<f64>,
    pub operational: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileScoringConfig {
    pub weights: Option<FileScoringWeights>,
    pub target_utilization: Option<[f64; 2]>,
    pub acceptable_utilization: Option<[f64; 2]>,
    pub min_buffer_days: Option<f64>,
    pub max_buffer_days: Option<f64>,
    pub storage_cost_share: Option<f64>,
    pub tie_epsilon: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub facility: Option<FileFacilityConfig>,
    pub phases: Option<FilePhasesConfig>,
    pub schedule: Option<FileScheduleConfig>,
    pub search: Option<FileSearchConfig>,
    pub scoring: Option<FileScoringConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
