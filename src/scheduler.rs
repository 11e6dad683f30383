//! Timer-driven background jobs.
//!
//! A [`Scheduler`] owns one timer task per registered [`Job`]. Each task waits
//! for the next slot of its [`Schedule`], runs the job, logs failures, and
//! loops until [`SchedulerHandle::shutdown`] is called.

use std::sync::Arc;
use std::time::Duration;

use actix_web::rt::task::JoinHandle;
use actix_web::rt::time::sleep;
use chrono::{NaiveDateTime, NaiveTime};
use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{error, info};

use crate::clock::Clock;

pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self) -> BoxFuture<'_, anyhow::Result<()>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Once a day at this wall-clock time, in the scheduler clock's timezone.
    DailyAt(NaiveTime),
    /// Fixed interval between runs.
    Every(Duration),
}

impl Schedule {
    /// Time to wait from `now` until the next run.
    pub fn delay_from(&self, now: NaiveDateTime) -> Duration {
        match *self {
            Schedule::Every(every) => every,
            Schedule::DailyAt(at) => {
                let mut next = now.date().and_time(at);
                if next <= now {
                    next += chrono::Duration::days(1);
                }
                (next - now).to_std().unwrap_or(Duration::ZERO)
            }
        }
    }
}

pub struct Scheduler {
    clock: Arc<dyn Clock>,
    jobs: Vec<(Schedule, Arc<dyn Job>)>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            jobs: Vec::new(),
        }
    }

    pub fn add(mut self, schedule: Schedule, job: Arc<dyn Job>) -> Self {
        self.jobs.push((schedule, job));
        self
    }

    /// Spawns the timer tasks on the current runtime.
    pub fn start(self) -> SchedulerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);

        let tasks = self
            .jobs
            .into_iter()
            .map(|(schedule, job)| {
                info!(job = job.name(), ?schedule, "Job scheduled");
                actix_web::rt::spawn(run_job(schedule, job, self.clock.clone(), stop_rx.clone()))
            })
            .collect();

        SchedulerHandle { stop_tx, tasks }
    }
}

async fn run_job(
    schedule: Schedule,
    job: Arc<dyn Job>,
    clock: Arc<dyn Clock>,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        let delay = schedule.delay_from(clock.now());

        tokio::select! {
            _ = sleep(delay) => {}
            // Fires on shutdown and when the handle is dropped.
            _ = stop.changed() => break,
        }

        info!(job = job.name(), "Running scheduled job");
        if let Err(e) = job.run().await {
            error!(job = job.name(), error = ?e, "Scheduled job failed");
        }
    }

    info!(job = job.name(), "Job stopped");
}

pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stops every timer and waits for in-flight runs to finish.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                error!(error = %e, "Scheduler task ended abnormally");
            }
        }
    }
}
