use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileScoringConfig, FileSearchConfig};
use super::models::AppConfig;
use crate::cli::{FacilityArgs, OptimizeArgs};
use crate::error::{CliError, Result};
use soilcell::core::models::phase::Phase;
use soilcell::engine::config::{
    Band, ConfigError, FacilityParametersBuilder, OptimizeConfig, ScoringConfig, SearchConfig,
};
use std::str::FromStr;

/// Merges CLI flags, `--set` values, the config file and built-in defaults, in that order of
/// precedence.
pub fn build_config(args: &FacilityArgs) -> Result<AppConfig> {
    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let file_config = apply_set_values(file_config, &args.set_values)?;
    merge(args, file_config)
}

/// [`build_config`] plus the search overrides of the `optimize` command.
pub fn build_optimize_config(args: &OptimizeArgs) -> Result<AppConfig> {
    let mut app = build_config(&args.facility)?;
    let search = &mut app.optimize.search;
    if let Some(v) = args.volume_min {
        search.volume_min_cy = v;
    }
    if let Some(v) = args.volume_max {
        search.volume_max_cy = v;
    }
    if let Some(v) = args.volume_step {
        search.volume_step_cy = v;
    }
    if let Some(v) = args.count_max {
        search.count_max = v;
    }
    if let Some(v) = args.top {
        search.shortlist_len = v;
    }
    Ok(app)
}

fn merge(args: &FacilityArgs, mut file_config: FileConfig) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let facility_file = file_config.facility.take().unwrap_or_default();
    let phases_file = file_config.phases.take().unwrap_or_default();

    let daily_volume = args.daily_volume.or(facility_file.daily_volume_cy).ok_or_else(|| {
        CliError::Config(
            "`facility.daily-volume-cy` is required in the config file or via --daily-volume."
                .to_string(),
        )
    })?;
    let cell_depth = args.cell_depth.or(facility_file.cell_depth_ft).ok_or_else(|| {
        CliError::Config(
            "`facility.cell-depth-ft` is required in the config file or via --cell-depth."
                .to_string(),
        )
    })?;

    let loading_rate = args
        .loading_rate
        .or(facility_file.loading_rate_cy_per_day)
        .or(facility_file.equipment_rate_cy_per_day)
        .unwrap_or(defaults.loading_rate_cy_per_day);
    let unloading_rate = args
        .unloading_rate
        .or(facility_file.unloading_rate_cy_per_day)
        .or(facility_file.equipment_rate_cy_per_day)
        .unwrap_or(defaults.unloading_rate_cy_per_day);

    let load_paced_by_intake = args.pace_load_by_intake
        || facility_file
            .load_paced_by_intake
            .unwrap_or(defaults.load_paced_by_intake);

    let weekend_policy = match &file_config.schedule {
        Some(schedule) => schedule.merge_into(defaults.weekend_policy),
        None => defaults.weekend_policy,
    };

    let facility = FacilityParametersBuilder::new()
        .daily_volume(daily_volume)
        .cell_depth(cell_depth)
        .loading_rate(loading_rate)
        .unloading_rate(unloading_rate)
        .rip_days(args.rip_days.or(phases_file.rip_days).unwrap_or(defaults.rip_days))
        .treat_days(
            args.treat_days
                .or(phases_file.treat_days)
                .unwrap_or(defaults.treat_days),
        )
        .dry_days(args.dry_days.or(phases_file.dry_days).unwrap_or(defaults.dry_days))
        .weekend_policy(weekend_policy)
        .load_paced_by_intake(load_paced_by_intake)
        .build()
        .map_err(config_error)?;

    let optimize = OptimizeConfig {
        search: merge_search(file_config.search.take().unwrap_or_default()),
        scoring: merge_scoring(file_config.scoring.take().unwrap_or_default()),
    };

    Ok(AppConfig { facility, optimize })
}

fn config_error(e: ConfigError) -> CliError {
    CliError::Config(e.to_string())
}

fn merge_search(file_val: FileSearchConfig) -> SearchConfig {
    let defaults = SearchConfig::default();
    SearchConfig {
        volume_min_cy: file_val.volume_min_cy.unwrap_or(defaults.volume_min_cy),
        volume_max_cy: file_val.volume_max_cy.unwrap_or(defaults.volume_max_cy),
        volume_step_cy: file_val.volume_step_cy.unwrap_or(defaults.volume_step_cy),
        count_min: file_val.count_min.unwrap_or(defaults.count_min),
        count_max: file_val.count_max.unwrap_or(defaults.count_max),
        aspect_ratio: file_val.aspect_ratio.unwrap_or(defaults.aspect_ratio),
        min_cell_width_ft: file_val
            .min_cell_width_ft
            .unwrap_or(defaults.min_cell_width_ft),
        shortlist_len: file_val.shortlist_len.unwrap_or(defaults.shortlist_len),
    }
}

fn merge_scoring(file_val: FileScoringConfig) -> ScoringConfig {
    let defaults = ScoringConfig::default();
    let band = |pair: Option<[f64; 2]>, fallback: Band| {
        pair.map(|[low, high]| Band::new(low, high))
            .unwrap_or(fallback)
    };

    let mut weights = defaults.weights;
    if let Some(w) = file_val.weights {
        weights.utilization = w.utilization.unwrap_or(weights.utilization);
        weights.cost = w.cost.unwrap_or(weights.cost);
        weights.buffer = w.buffer.unwrap_or(weights.buffer);
        weights.operational = w.operational.unwrap_or(weights.operational);
    }

    ScoringConfig {
        weights,
        target_utilization: band(file_val.target_utilization, defaults.target_utilization),
        acceptable_utilization: band(
            file_val.acceptable_utilization,
            defaults.acceptable_utilization,
        ),
        min_buffer_days: file_val.min_buffer_days.unwrap_or(defaults.min_buffer_days),
        max_buffer_days: file_val.max_buffer_days.unwrap_or(defaults.max_buffer_days),
        storage_cost_share: file_val
            .storage_cost_share
            .unwrap_or(defaults.storage_cost_share),
        tie_epsilon: file_val.tie_epsilon.unwrap_or(defaults.tie_epsilon),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;
        let key = key.trim();

        if let Some(rest) = key.strip_prefix("schedule.") {
            let (phase, day) = rest.split_once('.').ok_or_else(|| unsupported_key(key))?;
            let phase: Phase = phase.parse().map_err(|_| unsupported_key(key))?;
            let week = config
                .schedule
                .get_or_insert_with(Default::default)
                .get_or_insert(phase);
            match day {
                "saturday" => week.saturday = Some(parse_value(key, value, "boolean")?),
                "sunday" => week.sunday = Some(parse_value(key, value, "boolean")?),
                _ => return Err(unsupported_key(key)),
            }
            continue;
        }

        match key {
            "facility.daily-volume-cy" => {
                let v = parse_value(key, value, "float")?;
                config.facility.get_or_insert_with(Default::default).daily_volume_cy = Some(v);
            }
            "facility.cell-depth-ft" => {
                let v = parse_value(key, value, "float")?;
                config.facility.get_or_insert_with(Default::default).cell_depth_ft = Some(v);
            }
            "facility.loading-rate-cy-per-day" => {
                let v = parse_value(key, value, "float")?;
                config.facility.get_or_insert_with(Default::default).loading_rate_cy_per_day = Some(v);
            }
            "facility.unloading-rate-cy-per-day" => {
                let v = parse_value(key, value, "float")?;
                config.facility.get_or_insert_with(Default::default).unloading_rate_cy_per_day = Some(v);
            }
            "facility.equipment-rate-cy-per-day" => {
                let v = parse_value(key, value, "float")?;
                config.facility.get_or_insert_with(Default::default).equipment_rate_cy_per_day = Some(v);
            }
            "facility.load-paced-by-intake" => {
                let v = parse_value(key, value, "boolean")?;
                config.facility.get_or_insert_with(Default::default).load_paced_by_intake = Some(v);
            }
            "phases.rip-days" => {
                let v = parse_value(key, value, "integer")?;
                config.phases.get_or_insert_with(Default::default).rip_days = Some(v);
            }
            "phases.treat-days" => {
                let v = parse_value(key, value, "integer")?;
                config.phases.get_or_insert_with(Default::default).treat_days = Some(v);
            }
            "phases.dry-days" => {
                let v = parse_value(key, value, "integer")?;
                config.phases.get_or_insert_with(Default::default).dry_days = Some(v);
            }
            "search.volume-min-cy" => {
                let v = parse_value(key, value, "float")?;
                config.search.get_or_insert_with(Default::default).volume_min_cy = Some(v);
            }
            "search.volume-max-cy" => {
                let v = parse_value(key, value, "float")?;
                config.search.get_or_insert_with(Default::default).volume_max_cy = Some(v);
            }
            "search.volume-step-cy" => {
                let v = parse_value(key, value, "float")?;
                config.search.get_or_insert_with(Default::default).volume_step_cy = Some(v);
            }
            "search.count-min" => {
                let v = parse_value(key, value, "integer")?;
                config.search.get_or_insert_with(Default::default).count_min = Some(v);
            }
            "search.count-max" => {
                let v = parse_value(key, value, "integer")?;
                config.search.get_or_insert_with(Default::default).count_max = Some(v);
            }
            "search.aspect-ratio" => {
                let v = parse_value(key, value, "float")?;
                config.search.get_or_insert_with(Default::default).aspect_ratio = Some(v);
            }
            "search.min-cell-width-ft" => {
                let v = parse_value(key, value, "float")?;
                config.search.get_or_insert_with(Default::default).min_cell_width_ft = Some(v);
            }
            "search.shortlist-len" => {
                let v = parse_value(key, value, "integer")?;
                config.search.get_or_insert_with(Default::default).shortlist_len = Some(v);
            }
            "scoring.min-buffer-days" => {
                let v = parse_value(key, value, "float")?;
                config.scoring.get_or_insert_with(Default::default).min_buffer_days = Some(v);
            }
            "scoring.max-buffer-days" => {
                let v = parse_value(key, value, "float")?;
                config.scoring.get_or_insert_with(Default::default).max_buffer_days = Some(v);
            }
            "scoring.storage-cost-share" => {
                let v = parse_value(key, value, "float")?;
                config.scoring.get_or_insert_with(Default::default).storage_cost_share = Some(v);
            }
            "scoring.tie-epsilon" => {
                let v = parse_value(key, value, "float")?;
                config.scoring.get_or_insert_with(Default::default).tie_epsilon = Some(v);
            }
            "scoring.weights.utilization"
            | "scoring.weights.cost"
            | "scoring.weights.buffer"
            | "scoring.weights.operational" => {
                let v = parse_value(key, value, "float")?;
                let weights = config
                    .scoring
                    .get_or_insert_with(Default::default)
                    .weights
                    .get_or_insert_with(Default::default);
                match key.rsplit('.').next() {
                    Some("utilization") => weights.utilization = Some(v),
                    Some("cost") => weights.cost = Some(v),
                    Some("buffer") => weights.buffer = Some(v),
                    _ => weights.operational = Some(v),
                }
            }
            _ => return Err(unsupported_key(key)),
        }
    }
    Ok(config)
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use soilcell::core::models::schedule::{Weekday, WorkWeek};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_args() -> FacilityArgs {
        FacilityArgs {
            daily_volume: Some(300.0),
            cell_depth: Some(4.0),
            ..Default::default()
        }
    }

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("facility.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn build_config_with_cli_values_and_defaults_for_rest() {
        let app = build_config(&base_args()).expect("build ok");
        let defaults = DefaultsConfig::default();
        let facility = app.facility;

        assert_eq!(facility.daily_volume_cy, 300.0);
        assert_eq!(facility.cell_depth_ft, 4.0);
        assert_eq!(facility.loading_rate_cy_per_day, defaults.loading_rate_cy_per_day);
        assert_eq!(facility.unloading_rate_cy_per_day, defaults.unloading_rate_cy_per_day);
        assert_eq!(facility.rip_days, defaults.rip_days);
        assert_eq!(facility.treat_days, defaults.treat_days);
        assert_eq!(facility.dry_days, defaults.dry_days);
        assert_eq!(facility.weekend_policy, defaults.weekend_policy);
        assert!(!facility.load_paced_by_intake);
        assert_eq!(app.optimize, OptimizeConfig::default());
    }

    #[test]
    fn missing_daily_volume_is_a_config_error() {
        let args = FacilityArgs {
            cell_depth: Some(4.0),
            ..Default::default()
        };
        let err = build_config(&args).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("daily-volume-cy")));
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [facility]
            daily-volume-cy = 250.0
            cell-depth-ft = 5.0
            equipment-rate-cy-per-day = 400.0
            unloading-rate-cy-per-day = 350.0

            [phases]
            rip-days = 2
            treat-days = 5
            dry-days = 3

            [schedule.load]
            saturday = true

            [search]
            volume-max-cy = 2000.0
            count-max = 8

            [scoring]
            acceptable-utilization = [0.6, 0.97]

            [scoring.weights]
            utilization = 0.5
            cost = 0.2
            "#,
        );
        let args = FacilityArgs {
            config: Some(path),
            ..Default::default()
        };

        let app = build_config(&args).expect("build ok");
        let facility = app.facility;
        assert_eq!(facility.daily_volume_cy, 250.0);
        assert_eq!(facility.cell_depth_ft, 5.0);
        assert_eq!(facility.loading_rate_cy_per_day, 400.0);
        assert_eq!(facility.unloading_rate_cy_per_day, 350.0);
        assert_eq!((facility.rip_days, facility.treat_days, facility.dry_days), (2, 5, 3));

        let load = facility.weekend_policy.get(Phase::Load);
        assert!(load.is_operating(Weekday::Saturday));
        assert!(!load.is_operating(Weekday::Sunday));
        assert_eq!(*facility.weekend_policy.get(Phase::Treat), WorkWeek::every_day());

        assert_eq!(app.optimize.search.volume_max_cy, 2000.0);
        assert_eq!(app.optimize.search.count_max, 8);
        assert_eq!(app.optimize.search.volume_min_cy, 100.0);
        assert_eq!(app.optimize.scoring.acceptable_utilization, Band::new(0.6, 0.97));
        assert_eq!(app.optimize.scoring.weights.utilization, 0.5);
        assert_eq!(app.optimize.scoring.weights.buffer, 0.2);
    }

    #[test]
    fn cli_overrides_set_values_which_override_file() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [facility]
            daily-volume-cy = 250.0
            cell-depth-ft = 5.0

            [phases]
            treat-days = 5
            dry-days = 3
            "#,
        );
        let args = FacilityArgs {
            config: Some(path),
            daily_volume: Some(500.0),
            dry_days: Some(7),
            set_values: vec![
                "facility.daily-volume-cy=100".to_string(),
                "phases.treat-days=9".to_string(),
                "phases.dry-days=1".to_string(),
            ],
            ..Default::default()
        };

        let facility = build_config(&args).expect("build ok").facility;
        assert_eq!(facility.daily_volume_cy, 500.0);
        assert_eq!(facility.treat_days, 9);
        assert_eq!(facility.dry_days, 7);
        assert_eq!(facility.cell_depth_ft, 5.0);
    }

    #[test]
    fn set_values_cover_schedule_search_and_scoring() {
        let mut args = base_args();
        args.set_values = vec![
            "schedule.unload.sunday=true".to_string(),
            "search.count-max=30".to_string(),
            "search.aspect-ratio=1.0".to_string(),
            "scoring.weights.cost=0.2".to_string(),
            "scoring.weights.buffer=0.3".to_string(),
            "scoring.storage-cost-share=0.5".to_string(),
        ];

        let app = build_config(&args).expect("build ok");
        let unload = app.facility.weekend_policy.get(Phase::Unload);
        assert!(unload.is_operating(Weekday::Sunday));
        assert!(!unload.is_operating(Weekday::Saturday));
        assert_eq!(app.optimize.search.count_max, 30);
        assert_eq!(app.optimize.search.aspect_ratio, 1.0);
        assert!((app.optimize.scoring.weights.cost - 0.2).abs() < 1e-12);
        assert!((app.optimize.scoring.weights.buffer - 0.3).abs() < 1e-12);
        assert_eq!(app.optimize.scoring.storage_cost_share, 0.5);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in [
            "search.count-max",
            "search.count-max=many",
            "search.unknown=1",
            "schedule.flip.saturday=true",
            "schedule.load.monday=true",
            "schedule.load.saturday=maybe",
        ] {
            let mut args = base_args();
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args), Err(CliError::Config(_))),
                "accepted '{bad}'"
            );
        }
    }

    #[test]
    fn invalid_facility_values_surface_as_config_errors() {
        let mut args = base_args();
        args.rip_days = Some(0);
        let err = build_config(&args).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("rip_days")));
    }

    #[test]
    fn bundled_example_config_matches_builtin_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, include_str!("../../config/facility.toml"));
        let args = FacilityArgs {
            config: Some(path),
            ..Default::default()
        };

        let app = build_config(&args).expect("build ok");
        assert_eq!(app.facility.weekend_policy, DefaultsConfig::default().weekend_policy);
        assert_eq!(app.optimize, OptimizeConfig::default());
        assert!(app.optimize.validate().is_ok());
    }

    #[test]
    fn optimize_flags_override_search_ranges() {
        let args = OptimizeArgs {
            facility: base_args(),
            volume_max: Some(1500.0),
            count_max: Some(6),
            top: Some(3),
            ..Default::default()
        };
        let app = build_optimize_config(&args).expect("build ok");
        assert_eq!(app.optimize.search.volume_max_cy, 1500.0);
        assert_eq!(app.optimize.search.count_max, 6);
        assert_eq!(app.optimize.search.shortlist_len, 3);
        assert_eq!(app.optimize.search.volume_step_cy, 100.0);
    }
}
