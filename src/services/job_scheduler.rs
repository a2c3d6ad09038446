//! Fixed-delay scheduler for background jobs.
//!
//! Each registered job gets its own tokio task that runs the job, sleeps for
//! the job's interval, and repeats while the scheduler is running. A job
//! never overlaps with itself; different jobs run independently.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

/// A unit of periodic work.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &str;

    /// Run once. Jobs handle and log their own failures.
    async fn run(&self);
}

struct RegisteredJob {
    job: Arc<dyn ScheduledJob>,
    every: Duration,
    runs: Arc<AtomicU64>,
}

/// Snapshot of one registered job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub name: String,
    pub every: Duration,
    pub runs: u64,
}

/// Runs [`ScheduledJob`]s on fixed delays.
pub struct JobScheduler {
    jobs: Vec<RegisteredJob>,
    running: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            running: Arc::new(AtomicBool::new(false)),
            handles: Vec::new(),
        }
    }

    /// Register a job to run every `every` once the scheduler starts.
    pub fn register(&mut self, job: Arc<dyn ScheduledJob>, every: Duration) {
        tracing::debug!(
            job = job.name(),
            every_ms = u64::try_from(every.as_millis()).unwrap_or(u64::MAX),
            "registered scheduled job"
        );
        self.jobs.push(RegisteredJob {
            job,
            every,
            runs: Arc::new(AtomicU64::new(0)),
        });
    }

    /// Spawn one loop per registered job. Calling it twice is a no-op.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        for registered in &self.jobs {
            let job = registered.job.clone();
            let every = registered.every;
            let runs = registered.runs.clone();
            let running = self.running.clone();

            self.handles.push(tokio::spawn(async move {
                while running.load(Ordering::SeqCst) {
                    job.run().await;
                    runs.fetch_add(1, Ordering::Relaxed);
                    tokio::time::sleep(every).await;
                }
                tracing::debug!(job = job.name(), "scheduled job stopped");
            }));
        }

        tracing::info!(jobs = self.jobs.len(), "job scheduler started");
    }

    /// Ask every loop to exit after its current iteration.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Stop and abort the loops, waiting for them to finish.
    pub async fn shutdown(&mut self) {
        self.stop();

        for handle in &self.handles {
            handle.abort();
        }
        futures::future::join_all(self.handles.drain(..)).await;

        tracing::info!("job scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn list(&self) -> Vec<JobInfo> {
        self.jobs
            .iter()
            .map(|registered| JobInfo {
                name: registered.job.name().to_string(),
                every: registered.every,
                runs: registered.runs.load(Ordering::Relaxed),
            })
            .collect()
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}
