//! rnia core - scaffolding React Native projects from a remote template
//!
//! This library backs the `rnia` CLI. It downloads a versioned template
//! archive, initializes a native project through the React Native community
//! generator, overlays the template on top of the generated tree, merges the
//! manifest documents, and optionally installs dependencies and pods - all
//! while streaming granular progress events to whatever presentation layer
//! is attached.
//!
//! # Architecture
//!
//! - [`template`] - fetching and extracting the remote template archive
//! - [`process`] - external command execution, plain or streamed
//! - [`fsutil`] - idempotent filesystem helpers and manifest merge policies
//! - [`scaffold`] - the pipeline that sequences everything above
//! - [`commands`] - one-shot peripheral commands (clean, pod install, run)
//! - [`tui`] - cliclack prompt flow and progress rendering (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompt module

pub mod commands;
pub mod error;
pub mod fsutil;
pub mod pm;
pub mod process;
pub mod progress;
pub mod scaffold;
pub mod template;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use commands::{CleanTarget, OneShotCommand};
pub use error::{FetchError, ManifestError, ProcessError, ScaffoldError};
pub use pm::PackageManager;
pub use progress::{ProgressEvent, ProgressSink};
pub use scaffold::{
    create_project, plan_steps, ScaffoldPipeline, ScaffoldRequest, ScaffoldStep, ScaffoldSummary,
    Toolchain, VcsOutcome,
};
pub use template::{TemplateFetcher, TemplateHandle};

/// CLI version surfaced by the version command.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// React Native release the template tracks.
pub const RN_VERSION: &str = "0.84.0";
