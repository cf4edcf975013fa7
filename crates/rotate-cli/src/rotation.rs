//! Resolving command-line and configuration settings into rotation jobs.

use rotate_domain::{IoSchedulingClass, RemovalCommand, RotationFlags, RotationScheme};
use rotate_engine::{BackupCollector, Classifier};
use rotate_location::{AnyLocation, LocationOptions};
use rotate_planner::{
    LocationReport, Planner, PlannerConfig, RotationJob, RotationMetrics, RotationWorker,
};

use crate::cli::Cli;
use crate::config::{Config, LocationConfig};
use crate::error::{CliError, Result};

/// Reports and metrics of one invocation
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub reports: Vec<LocationReport>,
    pub metrics: RotationMetrics,
}

impl RunOutcome {
    /// Whether every location completed without sanity or removal errors
    pub fn is_success(&self) -> bool {
        self.metrics.is_clean()
    }
}

/// Run-wide settings shared by every job
pub fn run_config(cli: &Cli) -> PlannerConfig {
    let mut config = PlannerConfig {
        dry_run: cli.dry_run,
        force: cli.force,
        parallel: cli.parallel,
        ..PlannerConfig::default()
    };
    if let Some(max_workers) = cli.max_workers {
        config.max_workers = max_workers;
    }
    config
}

/// Build one job per location.
///
/// Every setting is resolved (and every error reported) before any
/// location is touched.
pub fn build_jobs(cli: &Cli, config: &Config) -> Result<Vec<RotationJob<AnyLocation>>> {
    let cli_scheme = cli.rotation_scheme()?;

    let targets: Vec<(String, Option<&LocationConfig>)> = if cli.locations.is_empty() {
        config
            .expanded_locations()?
            .into_iter()
            .map(|(location, settings)| (location, Some(settings)))
            .collect()
    } else {
        cli.locations
            .iter()
            .map(|location| Ok((location.clone(), config.find(location)?)))
            .collect::<Result<_>>()?
    };

    if targets.is_empty() {
        return Err(CliError::InvalidInput(
            "No locations given and none configured".to_string(),
        ));
    }

    targets
        .into_iter()
        .map(|(location, settings)| build_job(cli, &cli_scheme, &location, settings))
        .collect()
}

fn build_job(
    cli: &Cli,
    cli_scheme: &RotationScheme,
    spec: &str,
    settings: Option<&LocationConfig>,
) -> Result<RotationJob<AnyLocation>> {
    let defaults = LocationConfig::default();
    let settings = settings.unwrap_or(&defaults);

    let config_scheme = settings.rotation_scheme()?;
    let scheme = if config_scheme.is_empty() {
        cli_scheme.clone()
    } else {
        config_scheme
    };
    if scheme.is_empty() {
        return Err(CliError::Config(format!(
            "Refusing to use empty rotation scheme for {} (all backups would be deleted)",
            spec
        )));
    }

    let cli_flags = cli.rotation_flags();
    let flags = RotationFlags {
        strict: settings.strict.unwrap_or(cli_flags.strict),
        prefer_recent: settings.prefer_recent.unwrap_or(cli_flags.prefer_recent),
        include: settings.include.clone().unwrap_or(cli_flags.include),
        exclude: settings.exclude.clone().unwrap_or(cli_flags.exclude),
    };

    let ionice = settings
        .ionice
        .as_deref()
        .or(cli.ionice.as_deref())
        .map(|class| {
            class
                .parse::<IoSchedulingClass>()
                .map_err(CliError::Config)
        })
        .transpose()?;

    let removal_command = match settings.removal_command.clone() {
        Some(template) => RemovalCommand::new(template).map_err(CliError::Config)?,
        None => match cli.removal_command_template()? {
            Some(template) => RemovalCommand::new(template).map_err(CliError::Config)?,
            None => RemovalCommand::default(),
        },
    }
    .with_io_scheduling_class(ionice);

    let pattern = settings
        .timestamp_pattern
        .as_deref()
        .or(cli.timestamp_pattern.as_deref());
    let collector = BackupCollector::from_flags(&flags, pattern)?;

    let options = LocationOptions {
        recursive: settings.recursive.unwrap_or(cli.recursive),
        sudo: settings.use_sudo.unwrap_or(cli.use_sudo),
        ssh_user: settings.ssh_user.clone().or_else(|| cli.ssh_user.clone()),
    };
    let location = AnyLocation::parse(spec, &options)?;

    tracing::debug!("Rotation scheme for {}: {}", location, scheme);

    let planner_config = PlannerConfig {
        removal_command,
        ..run_config(cli)
    };
    Ok(RotationJob::new(
        location,
        Planner::new(planner_config, collector, Classifier::new(scheme, flags)),
    ))
}

/// Load configuration, rotate every location and collect the reports.
pub async fn execute(cli: &Cli) -> Result<RunOutcome> {
    let config = Config::load(cli.config.as_deref())?;
    let jobs = build_jobs(cli, &config)?;

    if cli.dry_run {
        tracing::info!("Dry run: no backups will be removed");
    }

    let worker = RotationWorker::new(&run_config(cli));
    let (reports, metrics) = worker.run_with_metrics(jobs).await;
    Ok(RunOutcome { reports, metrics })
}
