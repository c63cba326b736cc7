//! Template retrieval
//!
//! The project template is distributed as a branch archive of a Git
//! repository. This module downloads it, extracts it into a scratch
//! directory, and hands the pipeline a handle that owns that directory
//! until the run ends.

pub mod fetcher;

pub use fetcher::{TemplateFetcher, TemplateHandle, DEFAULT_TEMPLATE_BRANCH, DEFAULT_TEMPLATE_REPO};
