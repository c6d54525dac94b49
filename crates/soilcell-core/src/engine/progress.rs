/// Events emitted while a search runs, for front ends that display progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// Summary of the generator's filtering: pairs enumerated versus candidates kept.
    CandidatesGenerated { examined: usize, feasible: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback; silent without one.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Brackets `f` between `PhaseStart` and `PhaseFinish`.
    ///
    /// `PhaseFinish` is only reported when `f` succeeds.
    pub fn phase<T, E>(
        &self,
        name: &'static str,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        let value = f()?;
        self.report(Progress::PhaseFinish);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_reporter() -> (ProgressReporter<'static>, Arc<Mutex<Vec<Progress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        (reporter, events)
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        assert!(reporter.is_silent());
        reporter.report(Progress::TaskIncrement);
    }

    #[test]
    fn phase_wraps_successful_work_in_start_and_finish() {
        let (reporter, events) = recording_reporter();
        let value: Result<u32, ()> = reporter.phase("Scoring", || Ok(7));
        assert_eq!(value, Ok(7));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Progress::PhaseStart { name: "Scoring" },
                Progress::PhaseFinish
            ]
        );
    }

    #[test]
    fn failed_phase_does_not_report_finish() {
        let (reporter, events) = recording_reporter();
        let value: Result<(), &str> = reporter.phase("Validation", || Err("bad"));
        assert_eq!(value, Err("bad"));
        assert_eq!(
            *events.lock().unwrap(),
            vec![Progress::PhaseStart { name: "Validation" }]
        );
    }
}
