//! Implementation of `multibuild build`.
//!
//! Materializes a `BuildRequest` from the persisted configuration plus
//! CLI overrides, preflights the backend, runs the orchestrator, and
//! renders the human summary or JSON event stream.

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Local;

use crate::core::platform::PlatformId;
use crate::core::report::{BuildReport, JobOutcome, OverallOutcome};
use crate::core::request::{BuildFlag, BuildRequest};
use crate::orchestrator::{BuildBackend, BuildEvent, BuildPlan, CommandBackend, Orchestrator};
use crate::util::config::{BuildConfig, ConfigStore};
use crate::util::fs::{glob_files, MirrorPolicy};
use crate::util::shell::{format_duration, Shell, Status};

/// Options for the build command. CLI flags override persisted config;
/// `None` means "use the configured value".
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Platforms to build (empty = configured platforms)
    pub platforms: Vec<PlatformId>,

    /// Override the build name
    pub name: Option<String>,

    /// Override the output root
    pub output_root: Option<PathBuf>,

    /// Override server-variant bundling
    pub servers: Option<bool>,

    /// Override copy-folder bundling
    pub copy_folder: Option<bool>,

    /// Override the development-build flag
    pub development: Option<bool>,

    /// Skip the timestamped subdirectory even if configured
    pub no_stamp: bool,

    /// Emit the job plan as JSON instead of building
    pub emit_plan: bool,

    /// Persist the effective configuration after a successful run
    pub save_config: bool,
}

impl RunOptions {
    /// Fold the overrides into a configuration snapshot.
    fn apply_to(&self, mut config: BuildConfig) -> BuildConfig {
        if !self.platforms.is_empty() {
            config.platforms = self.platforms.clone();
        }
        if let Some(ref name) = self.name {
            config.name = name.clone();
        }
        if let Some(ref root) = self.output_root {
            config.output_root = root.clone();
        }
        if let Some(servers) = self.servers {
            config.bundle_server_variant = servers;
        }
        if let Some(copy) = self.copy_folder {
            config.copy_folder = copy;
        }
        if let Some(dev) = self.development {
            config.development = dev;
        }
        if self.no_stamp {
            config.stamped_subdir = false;
        }
        config
    }
}

/// Materialize the request for one run from an effective configuration.
///
/// Scene globs resolve against the current directory; when stamping is
/// enabled each run gets its own dated subdirectory of the output root,
/// so reruns never collide with earlier artifacts.
pub fn materialize_request(config: &BuildConfig) -> Result<BuildRequest> {
    let cwd = std::env::current_dir()?;
    let scenes = glob_files(&cwd, &config.scene_globs)?;

    let output_root = if config.stamped_subdir {
        let stamp = Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();
        config.output_root.join(stamp)
    } else {
        config.output_root.clone()
    };

    let mut request = BuildRequest::new(&config.name, output_root, config.platforms.clone())
        .with_server_variant(config.bundle_server_variant)
        .with_scenes(scenes);

    if config.copy_folder {
        request = request.with_copy_source(Some(config.copy_folder_path.clone()));
    }
    if config.development {
        request = request.with_flag(BuildFlag::Development);
    }

    Ok(request)
}

/// Run a batch build.
///
/// Returns the report (`None` in plan-only mode); the caller maps the
/// overall outcome to an exit code. Configuration and filesystem faults
/// return `Err`.
pub fn run_batch(
    store: &dyn ConfigStore,
    opts: &RunOptions,
    shell: &Shell,
) -> Result<Option<BuildReport>> {
    let config = opts.apply_to(store.load()?);
    let request = materialize_request(&config)?;

    if opts.emit_plan {
        // Plan-only mode never touches the filesystem or the backend
        let plan = BuildPlan::new(&request)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(None);
    }

    let backend = CommandBackend::new(&config.backend.program, config.backend.args.clone());
    if let Some(msg) = backend.availability().error_message() {
        bail!("build backend unavailable: {}", msg);
    }

    let policy = MirrorPolicy {
        exclude_extensions: config.mirror.exclude_extensions.clone(),
    };

    shell.status(
        Status::Planning,
        format!(
            "{} platform(s){}",
            request.platforms.len(),
            if request.bundle_server_variant {
                " + server variants"
            } else {
                ""
            }
        ),
    );
    shell.json_event(&serde_json::to_value(BuildEvent::started(
        &request.name,
        request.platforms.iter().map(|p| p.to_string()).collect(),
        request.platforms.len() * if request.bundle_server_variant { 2 } else { 1 },
    ))?);

    let orchestrator = Orchestrator::new(&backend)
        .with_mirror_policy(policy)
        .with_progress(!shell.is_quiet() && !shell.is_verbose() && !shell.is_json());

    let report = orchestrator.run(&request)?;

    render_report(&report, shell)?;

    if opts.save_config && report.overall == OverallOutcome::Succeeded {
        store.save(&config)?;
        shell.status(Status::Saved, "build settings");
    }

    Ok(Some(report))
}

/// Per-job status lines plus the terminal summary.
fn render_report(report: &BuildReport, shell: &Shell) -> Result<()> {
    for result in &report.results {
        shell.json_event(&serde_json::to_value(BuildEvent::job_finished(result))?);

        let label = result.job.label();
        match result.outcome {
            JobOutcome::Succeeded => {
                let size = result
                    .artifact_size
                    .map(|b| format!(", {} bytes", b))
                    .unwrap_or_default();
                shell.status(
                    Status::Finished,
                    format!(
                        "{} in {}{} -> {}",
                        label,
                        format_duration(result.elapsed),
                        size,
                        result.job.output_path.display()
                    ),
                );
            }
            JobOutcome::Failed => {
                shell.error(format!(
                    "{} failed after {}{}",
                    label,
                    format_duration(result.elapsed),
                    result
                        .diagnostics
                        .as_deref()
                        .map(|d| format!("\n{}", d))
                        .unwrap_or_default()
                ));
            }
            JobOutcome::Cancelled => {
                shell.status(Status::Cancelled, label);
            }
            JobOutcome::NotAttempted => {
                shell.status(Status::Skipped, format!("{} (not attempted)", label));
            }
        }
    }

    shell.json_event(&serde_json::to_value(BuildEvent::finished(report))?);

    let status = match report.overall {
        OverallOutcome::Succeeded => Status::Finished,
        OverallOutcome::Cancelled => Status::Cancelled,
        _ => Status::Error,
    };
    shell.status(status, report.summary_line());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_config() {
        let config = BuildConfig::defaults_for("mygame");
        let opts = RunOptions {
            platforms: vec![PlatformId::Linux],
            servers: Some(true),
            name: Some("renamed".to_string()),
            ..Default::default()
        };

        let effective = opts.apply_to(config);
        assert_eq!(effective.platforms, vec![PlatformId::Linux]);
        assert!(effective.bundle_server_variant);
        assert_eq!(effective.name, "renamed");
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = BuildConfig::defaults_for("mygame");
        config.development = true;
        let effective = RunOptions::default().apply_to(config.clone());
        assert_eq!(effective, config);
    }

    #[test]
    fn test_no_stamp_disables_dated_subdir() {
        let mut config = BuildConfig::defaults_for("mygame");
        config.stamped_subdir = true;
        let effective = RunOptions {
            no_stamp: true,
            ..Default::default()
        }
        .apply_to(config);
        assert!(!effective.stamped_subdir);
    }

    #[test]
    fn test_materialize_without_stamp_uses_root_directly() {
        let mut config = BuildConfig::defaults_for("mygame");
        config.stamped_subdir = false;
        config.scene_globs = vec![];

        let request = materialize_request(&config).unwrap();
        assert_eq!(request.output_root, config.output_root);
        assert!(!request.copy_enabled());
    }

    #[test]
    fn test_materialize_with_stamp_nests_under_root() {
        let mut config = BuildConfig::defaults_for("mygame");
        config.stamped_subdir = true;
        config.scene_globs = vec![];

        let request = materialize_request(&config).unwrap();
        assert_eq!(request.output_root.parent(), Some(config.output_root.as_path()));
    }

    #[test]
    fn test_materialize_carries_development_flag() {
        let mut config = BuildConfig::defaults_for("mygame");
        config.development = true;
        config.scene_globs = vec![];

        let request = materialize_request(&config).unwrap();
        assert!(request.extra_flags.contains(&BuildFlag::Development));
    }
}
