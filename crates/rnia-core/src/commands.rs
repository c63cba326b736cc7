//! One-shot peripheral commands
//!
//! Thin wrappers around fixed package scripts, dispatched through an
//! exhaustive match over a closed command set. The only multi-step command
//! is the full cache clean, which reports per-script progress.

use crate::error::ProcessError;
use crate::process::{self, RunOptions};
use crate::progress::{self, ProgressEvent, ProgressSink};

/// A cache or build artifact that can be cleaned individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanTarget {
    Android,
    Ios,
    NodeModules,
    Watchman,
}

impl CleanTarget {
    pub const ALL: [CleanTarget; 4] = [
        CleanTarget::Android,
        CleanTarget::Ios,
        CleanTarget::NodeModules,
        CleanTarget::Watchman,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CleanTarget::Android => "Android",
            CleanTarget::Ios => "iOS",
            CleanTarget::NodeModules => "Node Modules",
            CleanTarget::Watchman => "Watchman",
        }
    }

    /// Fixed package script that performs the clean.
    pub fn script(&self) -> &'static str {
        match self {
            CleanTarget::Android => "clean-android",
            CleanTarget::Ios => "clean-ios",
            CleanTarget::NodeModules => "clean-node",
            CleanTarget::Watchman => "clean-watch",
        }
    }

    fn message(&self) -> String {
        format!("Cleaning {}...", self.label())
    }

    /// Targets that delete artifacts which are expensive to restore.
    pub fn destructive(&self) -> bool {
        matches!(self, CleanTarget::NodeModules)
    }
}

/// Closed set of one-shot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShotCommand {
    CleanAll,
    Clean(CleanTarget),
    PodInstall,
    RunAndroid,
}

/// Execute a one-shot command, returning its success message.
pub async fn run_command(
    command: OneShotCommand,
    sink: Option<&dyn ProgressSink>,
) -> Result<String, ProcessError> {
    match command {
        OneShotCommand::CleanAll => clean_all(sink).await,
        OneShotCommand::Clean(target) => {
            run_script(target.script(), true).await?;
            Ok("✅ Command completed successfully!".to_string())
        }
        OneShotCommand::PodInstall => {
            run_script("pod-install", true).await?;
            Ok("✅ Command completed successfully!".to_string())
        }
        OneShotCommand::RunAndroid => {
            run_script("android", true).await?;
            Ok("✅ Command completed successfully!".to_string())
        }
    }
}

async fn clean_all(sink: Option<&dyn ProgressSink>) -> Result<String, ProcessError> {
    let total = CleanTarget::ALL.len();
    for (index, target) in CleanTarget::ALL.iter().enumerate() {
        progress::emit(sink, ProgressEvent::step(index, total, target.message()));
        run_script(target.script(), false).await?;
    }
    progress::emit(sink, ProgressEvent::step(total, total, "All cleaned!"));
    Ok("✅ All caches cleaned successfully!".to_string())
}

/// Run a fixed package script through npm in the current directory.
async fn run_script(script: &str, inherit_stdio: bool) -> Result<(), ProcessError> {
    process::run(
        "npm",
        ["run", script],
        RunOptions {
            cwd: None,
            inherit_stdio,
        },
    )
    .await
}
