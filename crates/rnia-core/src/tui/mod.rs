//! Interactive prompt flow (cliclack)
//!
//! Command menu, scaffold configuration form, clean target selection, and
//! the progress renderer that consumes the core's event stream. Optional
//! and only available when the `tui` feature is enabled.

mod prompts;
mod validate;

pub use prompts::{run, run_clean, run_create, run_one_shot, CleanChoice, CreateArgs};
pub use validate::{validate_bundle_id, validate_directory, validate_project_name};
