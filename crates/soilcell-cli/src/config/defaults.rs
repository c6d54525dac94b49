use soilcell::core::models::phase::Phase;
use soilcell::core::models::schedule::{WeekendPolicy, WorkWeek};

/// Values used when neither the command line nor the config file provide one.
///
/// Intake volume and cell depth are site specific and have no default.
pub struct DefaultsConfig {
    pub loading_rate_cy_per_day: f64,
    pub unloading_rate_cy_per_day: f64,
    pub rip_days: u32,
    pub treat_days: u32,
    pub dry_days: u32,
    pub load_paced_by_intake: bool,
    pub weekend_policy: WeekendPolicy,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        // Earthmoving runs weekdays; the in-cell phases run through the weekend.
        let weekend_policy = WeekendPolicy::uniform(WorkWeek::every_day())
            .with_phase(Phase::Load, WorkWeek::weekdays_only())
            .with_phase(Phase::Unload, WorkWeek::weekdays_only());

        Self {
            loading_rate_cy_per_day: 300.0,
            unloading_rate_cy_per_day: 450.0,
            rip_days: 1,
            treat_days: 3,
            dry_days: 5,
            load_paced_by_intake: false,
            weekend_policy,
        }
    }
}
