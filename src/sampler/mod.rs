use crate::models::{ApplicationId, SampleResult, TimeWindow, UsageRecord};
use crate::platform::UsageSource;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Answers "which application is in the foreground right now" from the host's
/// usage-by-recency facility. Read-only; nothing is cached between calls.
pub struct ForegroundSampler {
    source: Arc<dyn UsageSource>,
}

impl ForegroundSampler {
    pub fn new(source: Arc<dyn UsageSource>) -> Self {
        Self { source }
    }

    pub fn sample(&self, window: Duration) -> SampleResult {
        self.sample_at(SystemTime::now(), window)
    }

    /// Most recently active application in `[now - window, now]`. Host errors
    /// and empty results both come back as `SampleResult::None`.
    pub fn sample_at(&self, now: SystemTime, window: Duration) -> SampleResult {
        let window = TimeWindow::trailing(now, window);
        match self.source.query_usage(window) {
            Ok(records) => most_recent(&records, window).into(),
            Err(e) => {
                debug!("Foreground sample unavailable: {e}");
                SampleResult::None
            }
        }
    }

    /// Foreground time `app` has accumulated since UTC midnight.
    pub fn usage_today(&self, app: &ApplicationId, now: SystemTime) -> Option<Duration> {
        match self.source.query_usage(TimeWindow::today(now)) {
            Ok(records) => records
                .into_iter()
                .find(|record| &record.app_id == app)
                .map(|record| record.foreground_total),
            Err(e) => {
                debug!("Daily usage unavailable for {app}: {e}");
                None
            }
        }
    }
}

/// Latest `last_active` inside the window; ties go to the smallest identifier.
fn most_recent(records: &[UsageRecord], window: TimeWindow) -> Option<ApplicationId> {
    records
        .iter()
        .filter(|record| window.contains(record.last_active))
        .max_by(|a, b| {
            a.last_active
                .cmp(&b.last_active)
                .then_with(|| b.app_id.cmp(&a.app_id))
        })
        .map(|record| record.app_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{app, ScriptedSource};
    use std::time::UNIX_EPOCH;

    const WINDOW: Duration = Duration::from_secs(5);

    fn now() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    fn record(id: &str, secs_ago: u64, total_secs: u64) -> UsageRecord {
        UsageRecord::new(
            app(id),
            now() - Duration::from_secs(secs_ago),
            Duration::from_secs(total_secs),
        )
    }

    fn sampler(source: &Arc<ScriptedSource>) -> ForegroundSampler {
        ForegroundSampler::new(Arc::<ScriptedSource>::clone(source))
    }

    #[test]
    fn test_picks_most_recent() {
        let source = Arc::new(ScriptedSource::new());
        source.push(vec![record("com.mail", 3, 0), record("com.game", 1, 0)]);

        assert_eq!(
            sampler(&source).sample_at(now(), WINDOW),
            SampleResult::Identifier(app("com.game"))
        );
    }

    #[test]
    fn test_tie_is_deterministic() {
        let source = Arc::new(ScriptedSource::new());
        source.push(vec![record("com.zeta", 1, 0), record("com.alpha", 1, 0)]);
        source.push(vec![record("com.alpha", 1, 0), record("com.zeta", 1, 0)]);

        let sampler = sampler(&source);
        assert_eq!(
            sampler.sample_at(now(), WINDOW),
            SampleResult::Identifier(app("com.alpha"))
        );
        assert_eq!(
            sampler.sample_at(now(), WINDOW),
            SampleResult::Identifier(app("com.alpha"))
        );
    }

    #[test]
    fn test_ignores_records_outside_window() {
        let source = Arc::new(ScriptedSource::new());
        source.push(vec![record("com.old", 30, 0)]);

        assert_eq!(sampler(&source).sample_at(now(), WINDOW), SampleResult::None);
    }

    #[test]
    fn test_empty_result_is_none() {
        let source = Arc::new(ScriptedSource::new());
        source.push(vec![]);

        assert_eq!(sampler(&source).sample_at(now(), WINDOW), SampleResult::None);
    }

    #[test]
    fn test_host_error_is_swallowed() {
        let source = Arc::new(ScriptedSource::new());
        source.push_error();

        assert_eq!(sampler(&source).sample_at(now(), WINDOW), SampleResult::None);
    }

    #[test]
    fn test_queries_trailing_window() {
        let source = Arc::new(ScriptedSource::new());
        sampler(&source).sample_at(now(), WINDOW);

        let window = source.last_window().unwrap();
        assert_eq!(window.end, now());
        assert_eq!(window.start, now() - WINDOW);
    }

    #[test]
    fn test_no_caching_between_calls() {
        let source = Arc::new(ScriptedSource::new());
        let sampler = sampler(&source);
        sampler.sample_at(now(), WINDOW);
        sampler.sample_at(now(), WINDOW);
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_usage_today() {
        let source = Arc::new(ScriptedSource::new());
        source.push(vec![record("com.game", 100, 1_260), record("com.mail", 5, 60)]);

        let total = sampler(&source).usage_today(&app("com.game"), now());
        assert_eq!(total, Some(Duration::from_secs(1_260)));
        assert_eq!(source.last_window().unwrap(), TimeWindow::today(now()));
    }

    #[test]
    fn test_usage_today_unknown_or_failing() {
        let source = Arc::new(ScriptedSource::new());
        source.push(vec![record("com.mail", 5, 60)]);
        source.push_error();

        let sampler = sampler(&source);
        assert_eq!(sampler.usage_today(&app("com.game"), now()), None);
        assert_eq!(sampler.usage_today(&app("com.mail"), now()), None);
    }
}
