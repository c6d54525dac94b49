use super::phase::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Weekday {
        Self::ALL[index % 7]
    }

    #[inline]
    pub const fn next(self) -> Weekday {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The weekdays on which a phase is allowed to progress, indexed Monday (0) to Sunday (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkWeek([bool; 7]);

impl WorkWeek {
    pub const fn new(days: [bool; 7]) -> Self {
        Self(days)
    }

    /// Monday through Friday only.
    pub const fn weekdays_only() -> Self {
        Self::with_weekend(false, false)
    }

    /// Every day of the week.
    pub const fn every_day() -> Self {
        Self::with_weekend(true, true)
    }

    /// Monday through Friday plus the selected weekend days.
    pub const fn with_weekend(saturday: bool, sunday: bool) -> Self {
        Self([true, true, true, true, true, saturday, sunday])
    }

    #[inline]
    pub const fn is_operating(&self, day: Weekday) -> bool {
        self.0[day.index()]
    }

    pub fn operating_days_per_week(&self) -> u32 {
        self.0.iter().filter(|&&enabled| enabled).count() as u32
    }

    pub const fn saturday(&self) -> bool {
        self.0[Weekday::Saturday.index()]
    }

    pub const fn sunday(&self) -> bool {
        self.0[Weekday::Sunday.index()]
    }
}

impl Default for WorkWeek {
    fn default() -> Self {
        Self::weekdays_only()
    }
}

/// The weekly work pattern of every phase, stored as a fixed table indexed by [`Phase::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekendPolicy {
    patterns: [WorkWeek; Phase::COUNT],
}

impl WeekendPolicy {
    /// Applies the same pattern to every phase.
    pub const fn uniform(week: WorkWeek) -> Self {
        Self {
            patterns: [week; Phase::COUNT],
        }
    }

    pub fn with_phase(mut self, phase: Phase, week: WorkWeek) -> Self {
        self.set(phase, week);
        self
    }

    pub fn set(&mut self, phase: Phase, week: WorkWeek) {
        self.patterns[phase.index()] = week;
    }

    #[inline]
    pub const fn get(&self, phase: Phase) -> &WorkWeek {
        &self.patterns[phase.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, &WorkWeek)> {
        Phase::ALL.into_iter().zip(self.patterns.iter())
    }
}
