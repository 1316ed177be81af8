use std::{
    future::Future,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Local, NaiveTime, TimeZone};
use tokio::{task::AbortHandle, time::sleep};

use crate::error::Error;

/// Something that decides how long a job sleeps before its next run.
pub trait Trigger: Send + Sync + 'static {
    fn next_delay(&self) -> Duration;
}

/// Fires once a day at a fixed local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger(NaiveTime);

impl Default for DailyTrigger {
    fn default() -> Self {
        Self::new(8, 0).unwrap_or(Self(NaiveTime::MIN))
    }
}

impl DailyTrigger {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub const fn time(&self) -> NaiveTime {
        self.0
    }

    /// The first time strictly after `now` the trigger fires.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let mut day = now.date_naive();
        // a day on which the time does not exist (dst gap) is skipped
        for _ in 0..3 {
            if let Some(at) = tz.from_local_datetime(&day.and_time(self.0)).earliest() {
                if at > *now {
                    return at;
                }
            }
            day = day.succ_opt().unwrap_or(day);
        }
        now.clone() + chrono::Duration::days(1)
    }
}

impl Trigger for DailyTrigger {
    fn next_delay(&self) -> Duration {
        let now = Local::now();
        (self.next_after(&now) - now).to_std().unwrap_or(Duration::ZERO)
    }
}

impl FromStr for DailyTrigger {
    type Err = Error;

    /// Parses `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|e| Error::Config(format!("invalid time of day {s:?}: {e}")))
    }
}

/// Handle to a recurring job started by [`init`].
#[derive(Debug, Clone)]
pub struct JobHandle {
    active: Arc<AtomicBool>,
    task: AbortHandle,
}

impl JobHandle {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) && !self.task.is_finished()
    }

    /// Stops the job. Returns whether this call was the one that stopped it; cancelling an
    /// already cancelled handle does nothing.
    pub fn cancel(&self) -> bool {
        let was_active = self.active.swap(false, Ordering::SeqCst);
        if was_active {
            self.task.abort();
        }
        was_active
    }
}

/// Starts running `task` every time `trigger` fires, until the returned handle is cancelled.
/// Must be called from inside a tokio runtime.
pub fn init<T, F, Fut>(trigger: T, task: F) -> JobHandle
where
    T: Trigger,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let active = Arc::new(AtomicBool::new(true));
    let handle = tokio::spawn(async move {
        loop {
            let delay = trigger.next_delay();
            log::debug!("Next scheduled run in {delay:?}");
            sleep(delay).await;
            log::info!("Running scheduled job at {}", Local::now().to_rfc3339());
            task().await;
        }
    });
    JobHandle {
        active,
        task: handle.abort_handle(),
    }
}

pub fn cancel(handle: &JobHandle) -> bool {
    handle.cancel()
}

/// Owns the single recurring job of the process.
#[derive(Debug, Default)]
pub struct Scheduler {
    job: Option<JobHandle>,
}

impl Scheduler {
    /// Replaces the current job, cancelling it first.
    pub fn schedule<T, F, Fut>(&mut self, trigger: T, task: F) -> JobHandle
    where
        T: Trigger,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Some(job) = self.job.take() {
            if job.is_active() {
                log::info!("Cancelling existing menu update job");
            }
            cancel(&job);
        }
        let job = init(trigger, task);
        self.job = Some(job.clone());
        log::info!("Menu update job scheduled successfully");
        job
    }

    pub fn cancel(&mut self) -> bool {
        self.job.take().is_some_and(|job| cancel(&job))
    }
}
