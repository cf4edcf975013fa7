//! Scheduling rotations across many locations

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use rotate_domain::Location;
use tokio::sync::{Mutex, Semaphore};

use crate::{LocationReport, Planner, PlannerConfig, PlannerError, RotationMetrics};

/// One location together with the planner carrying its rotation settings
#[derive(Debug, Clone)]
pub struct RotationJob<L> {
    /// Location to rotate
    pub location: L,

    /// Settings for this location
    pub planner: Planner,
}

impl<L> RotationJob<L> {
    /// Create a job
    pub fn new(location: L, planner: Planner) -> Self {
        Self { location, planner }
    }
}

/// Runs rotation jobs sequentially or on a bounded worker pool
///
/// In parallel mode each location gets its own task. Tasks whose locations
/// share an identity key (same mount point or same SSH host) are serialized
/// by a per-key lock, which is acquired before a pool permit so that waiting
/// tasks never occupy the pool.
///
/// # Examples
///
/// ```no_run
/// use rotate_domain::{Frequency, RetentionPeriod, RotationFlags, RotationScheme};
/// use rotate_engine::{BackupCollector, Classifier};
/// use rotate_location::LocalLocation;
/// use rotate_planner::{Planner, PlannerConfig, RotationJob, RotationWorker};
///
/// #[tokio::main]
/// async fn main() {
///     let config = PlannerConfig { parallel: true, ..PlannerConfig::default() };
///     let scheme = RotationScheme::new().with(Frequency::Daily, RetentionPeriod::Count(7));
///     let planner = Planner::new(
///         config.clone(),
///         BackupCollector::default(),
///         Classifier::new(scheme, RotationFlags::default()),
///     );
///
///     let jobs = vec![
///         RotationJob::new(LocalLocation::new("/srv/backups/laptop"), planner.clone()),
///         RotationJob::new(LocalLocation::new("/mnt/usb/laptop"), planner),
///     ];
///     let reports = RotationWorker::new(&config).run(jobs).await;
///     assert_eq!(reports.len(), 2);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RotationWorker {
    parallel: bool,
    max_workers: usize,
}

impl RotationWorker {
    /// Create a worker from the scheduling part of a configuration
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            parallel: config.parallel,
            max_workers: config.worker_count(),
        }
    }

    /// Rotate every job and return the reports in input order
    pub async fn run<L>(&self, jobs: Vec<RotationJob<L>>) -> Vec<LocationReport>
    where
        L: Location + Send + 'static,
        L::Error: Display,
    {
        tracing::info!(
            "Rotating {} location(s) {}",
            jobs.len(),
            if self.parallel {
                format!("in parallel (max {} workers)", self.max_workers)
            } else {
                "sequentially".to_string()
            }
        );

        if self.parallel {
            self.run_parallel(jobs).await
        } else {
            self.run_sequential(jobs).await
        }
    }

    /// Rotate every job and aggregate metrics over the reports
    pub async fn run_with_metrics<L>(
        &self,
        jobs: Vec<RotationJob<L>>,
    ) -> (Vec<LocationReport>, RotationMetrics)
    where
        L: Location + Send + 'static,
        L::Error: Display,
    {
        let start = Instant::now();
        let reports = self.run(jobs).await;
        let mut metrics = RotationMetrics::from_reports(&reports);
        metrics.total_runtime_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!("Rotation finished:\n{}", metrics.summary());
        (reports, metrics)
    }

    async fn run_sequential<L>(&self, jobs: Vec<RotationJob<L>>) -> Vec<LocationReport>
    where
        L: Location + Send + 'static,
        L::Error: Display,
    {
        let mut reports = Vec::with_capacity(jobs.len());
        for job in jobs {
            let name = job.location.name();
            let dry_run = job.planner.config().dry_run;
            reports.push(rotate_blocking(job).await.unwrap_or_else(|e| {
                tracing::error!("Rotation of {} failed: {}", name, e);
                LocationReport::aborted(name, dry_run, e.to_string())
            }));
        }
        reports
    }

    async fn run_parallel<L>(&self, jobs: Vec<RotationJob<L>>) -> Vec<LocationReport>
    where
        L: Location + Send + 'static,
        L::Error: Display,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut locks: HashMap<String, Arc<Mutex<()>>> = HashMap::new();
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs {
            let name = job.location.name();
            let dry_run = job.planner.config().dry_run;
            let key = job.location.identity_key();
            let lock = locks.entry(key.clone()).or_default().clone();
            let semaphore = semaphore.clone();

            let handle = tokio::spawn(async move {
                let _key_guard = lock.lock_owned().await;
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| PlannerError::Worker("worker pool closed".to_string()))?;
                tracing::debug!("Rotating {} (identity {})", job.location.name(), key);
                rotate_blocking(job).await
            });
            handles.push((name, dry_run, handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (name, dry_run, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(PlannerError::Worker(e.to_string())),
            };
            reports.push(result.unwrap_or_else(|e| {
                tracing::error!("Rotation of {} failed: {}", name, e);
                LocationReport::aborted(name, dry_run, e.to_string())
            }));
        }
        reports
    }
}

/// Run one job on the blocking thread pool
async fn rotate_blocking<L>(job: RotationJob<L>) -> Result<LocationReport, PlannerError>
where
    L: Location + Send + 'static,
    L::Error: Display,
{
    tokio::task::spawn_blocking(move || job.planner.rotate(&job.location))
        .await
        .map_err(|e| PlannerError::Worker(e.to_string()))
}
