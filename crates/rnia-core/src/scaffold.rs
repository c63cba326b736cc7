//! The scaffold pipeline
//!
//! A linear state machine over a precomputed, ordered step plan:
//!
//! init generator -> purge defaults -> copy template -> merge manifests ->
//! vcs init -> [install deps] -> [pod install]
//!
//! The plan length is fixed before the first step runs so progress
//! denominators never change mid-run, every fatal failure aborts the
//! remaining steps, and the template scratch directory is released on every
//! exit path. The version control step is the single deliberate exception
//! to the fatal-failure rule.

use crate::error::{ProcessError, ScaffoldError};
use crate::fsutil;
use crate::pm::PackageManager;
use crate::process::{self, RunOptions};
use crate::progress::{self, ProgressEvent, ProgressSink};
use crate::template::{TemplateFetcher, TemplateHandle};
use std::path::{Path, PathBuf};

/// Generator-produced entries replaced by the template.
const FILES_TO_DELETE: &[&str] = &["App.tsx", "src", "__tests__"];

/// Template entries overlaid onto the generated project. Entries absent
/// from the template are silently skipped.
const FILES_TO_COPY: &[&str] = &[
    ".opencode",
    "src",
    "AGENTS.md",
    "opencode.json",
    "tsconfig.json",
    "babel.config.js",
    ".prettierrc.js",
    ".eslintrc.js",
    ".watchmanconfig",
    ".gitignore",
    "Gemfile",
    "jest.config.js",
    "metro.config.js",
    "index.js",
    "App.tsx",
    "__tests__",
    "vendor",
    ".bundle",
];

const COMMIT_MESSAGE: &str = "chore: apply project template";

/// Validated configuration for one scaffold run, created once by the prompt
/// flow and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub project_name: String,
    pub bundle_id: String,
    pub directory: PathBuf,
    pub package_manager: PackageManager,
    pub install_deps: bool,
    pub pod_install: bool,
}

/// One named unit of work with a fixed position in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldStep {
    InitGenerator,
    PurgeDefaults,
    CopyTemplate,
    MergeManifests,
    VcsInit,
    InstallDeps,
    PodInstall,
}

impl ScaffoldStep {
    fn message(&self, package_manager: PackageManager) -> String {
        match self {
            ScaffoldStep::InitGenerator => "Initializing React Native project...".to_string(),
            ScaffoldStep::PurgeDefaults => "Cleaning up default files...".to_string(),
            ScaffoldStep::CopyTemplate => "Copying template files...".to_string(),
            ScaffoldStep::MergeManifests => "Merging package.json...".to_string(),
            ScaffoldStep::VcsInit => "Configuring git...".to_string(),
            ScaffoldStep::InstallDeps => {
                format!("Installing dependencies ({})...", package_manager)
            }
            ScaffoldStep::PodInstall => "Running pod install...".to_string(),
        }
    }
}

/// Compute the ordered step plan for a request.
///
/// Pod install only enters the plan on an Apple platform; requesting it
/// elsewhere contributes nothing.
pub fn plan_steps(request: &ScaffoldRequest, apple_platform: bool) -> Vec<ScaffoldStep> {
    let mut steps = vec![
        ScaffoldStep::InitGenerator,
        ScaffoldStep::PurgeDefaults,
        ScaffoldStep::CopyTemplate,
        ScaffoldStep::MergeManifests,
        ScaffoldStep::VcsInit,
    ];
    if request.install_deps {
        steps.push(ScaffoldStep::InstallDeps);
    }
    if request.pod_install && apple_platform {
        steps.push(ScaffoldStep::PodInstall);
    }
    steps
}

/// External commands the pipeline drives, injectable so tests can
/// substitute stub executables for the real tools.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Project generator program and leading arguments. The pipeline
    /// appends the project name, target directory, bundle identifier, and
    /// `--skip-install` (dependency installation is its own step).
    pub generator: (String, Vec<String>),
    /// Version control program.
    pub vcs: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            generator: (
                "npx".to_string(),
                vec![
                    "@react-native-community/cli".to_string(),
                    "init".to_string(),
                ],
            ),
            vcs: "git".to_string(),
        }
    }
}

/// Outcome of the best-effort version control step.
#[derive(Debug)]
pub enum VcsOutcome {
    /// Repository initialized and template commit created.
    Committed,
    /// Version control tool not available; step skipped.
    Skipped,
    /// Tool ran but failed; deliberately ignored.
    Ignored(ProcessError),
}

/// Result of a successful pipeline run.
#[derive(Debug)]
pub struct ScaffoldSummary {
    pub project_dir: PathBuf,
    pub project_name: String,
    pub package_manager: PackageManager,
    pub vcs: VcsOutcome,
}

impl ScaffoldSummary {
    /// Human-readable completion report with suggested next commands.
    pub fn render(&self) -> String {
        let pm = self.package_manager;
        format!(
            "\n✅ Setup complete!\n\n\
             📂 Project location: {}\n\
             📦 Project name: {}\n\
             📦 Package manager: {}\n\n\
             Next steps:\n\
             \x20 cd {}\n\
             \x20 {}   # Start Metro bundler\n\
             \x20 {}   # Run on iOS\n\
             \x20 {}   # Run on Android\n",
            self.project_dir.display(),
            self.project_name,
            pm,
            self.project_dir.display(),
            pm.run_script("start"),
            pm.run_script("ios"),
            pm.run_script("android"),
        )
    }
}

/// The scaffold pipeline. One instance drives one run.
pub struct ScaffoldPipeline {
    toolchain: Toolchain,
    apple_platform: bool,
}

impl ScaffoldPipeline {
    pub fn new() -> Self {
        Self {
            toolchain: Toolchain::default(),
            apple_platform: cfg!(target_os = "macos"),
        }
    }

    /// Pipeline with injected tools and platform capability.
    pub fn with_toolchain(toolchain: Toolchain, apple_platform: bool) -> Self {
        Self {
            toolchain,
            apple_platform,
        }
    }

    /// Run every step of the plan against an already-fetched template.
    ///
    /// The template's scratch directory is released before this returns,
    /// whichever way the run ends.
    pub async fn run(
        &self,
        request: &ScaffoldRequest,
        template: TemplateHandle,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<ScaffoldSummary, ScaffoldError> {
        let result = self.execute(request, template.root(), sink).await;
        template.release();
        result
    }

    async fn execute(
        &self,
        request: &ScaffoldRequest,
        template_root: &Path,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<ScaffoldSummary, ScaffoldError> {
        let steps = plan_steps(request, self.apple_platform);
        let total = steps.len();
        let project_dir = &request.directory;
        let mut vcs = VcsOutcome::Skipped;

        for (index, step) in steps.iter().enumerate() {
            let message = step.message(request.package_manager);
            progress::emit(sink, ProgressEvent::step(index, total, message.clone()));

            match step {
                ScaffoldStep::InitGenerator => {
                    let (program, base_args) = &self.toolchain.generator;
                    let mut args = base_args.clone();
                    args.extend([
                        request.project_name.clone(),
                        "--directory".to_string(),
                        project_dir.display().to_string(),
                        "--package-name".to_string(),
                        request.bundle_id.clone(),
                        "--skip-install".to_string(),
                    ]);
                    process::run_streamed(program, &args, index, total, &message, sink, None)
                        .await?;
                }
                ScaffoldStep::PurgeDefaults => {
                    for entry in FILES_TO_DELETE {
                        fsutil::remove_recursive(&project_dir.join(entry)).await?;
                    }
                }
                ScaffoldStep::CopyTemplate => {
                    for entry in FILES_TO_COPY {
                        fsutil::copy_recursive(&template_root.join(entry), &project_dir.join(entry))
                            .await?;
                    }
                }
                ScaffoldStep::MergeManifests => {
                    let template_manifest =
                        fsutil::read_json(&template_root.join("package.json")).await?;
                    let manifest_path = project_dir.join("package.json");
                    let mut manifest = fsutil::read_json(&manifest_path).await?;
                    fsutil::merge_package_manifest(
                        &mut manifest,
                        &template_manifest,
                        &request.project_name,
                    );
                    fsutil::write_json(&manifest_path, &manifest).await?;

                    let descriptor_path = project_dir.join("app.json");
                    let mut descriptor = fsutil::read_json(&descriptor_path).await?;
                    fsutil::merge_app_config(&mut descriptor, &request.project_name);
                    fsutil::write_json(&descriptor_path, &descriptor).await?;
                }
                ScaffoldStep::VcsInit => {
                    vcs = self.vcs_init(project_dir).await;
                }
                ScaffoldStep::InstallDeps => {
                    let (program, args) = request.package_manager.install_command();
                    process::run_streamed(
                        program,
                        args,
                        index,
                        total,
                        &message,
                        sink,
                        Some(project_dir),
                    )
                    .await?;
                }
                ScaffoldStep::PodInstall => {
                    let (program, args) = request.package_manager.run_script_command("pod-install");
                    process::run_streamed(
                        program,
                        &args,
                        index,
                        total,
                        &message,
                        sink,
                        Some(project_dir),
                    )
                    .await?;
                }
            }
        }

        progress::emit(sink, ProgressEvent::step(total, total, "Project ready"));

        Ok(ScaffoldSummary {
            project_dir: project_dir.clone(),
            project_name: request.project_name.clone(),
            package_manager: request.package_manager,
            vcs,
        })
    }

    /// Initialize a repository, stage everything, and commit the template.
    /// Never fails the run; the outcome records what actually happened.
    async fn vcs_init(&self, project_dir: &Path) -> VcsOutcome {
        fn in_dir(project_dir: &Path) -> RunOptions<'_> {
            RunOptions {
                cwd: Some(project_dir),
                inherit_stdio: false,
            }
        }
        let vcs = self.toolchain.vcs.as_str();

        // `init` inside an existing repository still exits 0; a non-zero
        // exit here surfaces again on add/commit below.
        let init = process::run(vcs, ["init"], in_dir(project_dir)).await;
        if let Err(ProcessError::Spawn { .. }) = init {
            return VcsOutcome::Skipped;
        }

        if let Err(e) = process::run(vcs, ["add", "."], in_dir(project_dir)).await {
            return VcsOutcome::Ignored(e);
        }

        match process::run(vcs, ["commit", "-m", COMMIT_MESSAGE], in_dir(project_dir)).await {
            Ok(()) => VcsOutcome::Committed,
            Err(e) => VcsOutcome::Ignored(e),
        }
    }
}

impl Default for ScaffoldPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch the template and run the full pipeline: the flow behind the
/// "create project" command.
///
/// Fetch-phase messages are surfaced under the first step slot so the
/// presentation layer sees one uninterrupted event stream.
pub async fn create_project(
    request: &ScaffoldRequest,
    sink: Option<&dyn ProgressSink>,
) -> Result<ScaffoldSummary, ScaffoldError> {
    let total = plan_steps(request, cfg!(target_os = "macos")).len();
    let on_fetch = move |message: &str| {
        progress::emit(sink, ProgressEvent::step(0, total, message));
    };

    let fetcher = TemplateFetcher::new()?;
    let template = fetcher
        .fetch(Some(&on_fetch as &(dyn Fn(&str) + Send + Sync)))
        .await?;

    ScaffoldPipeline::new().run(request, template, sink).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(install_deps: bool, pod_install: bool) -> ScaffoldRequest {
        ScaffoldRequest {
            project_name: "MyApp".to_string(),
            bundle_id: "com.acme.myapp".to_string(),
            directory: PathBuf::from("/tmp/MyApp"),
            package_manager: PackageManager::Bun,
            install_deps,
            pod_install,
        }
    }

    #[test]
    fn plan_has_five_base_steps() {
        assert_eq!(plan_steps(&request(false, false), true).len(), 5);
        assert_eq!(plan_steps(&request(true, false), true).len(), 6);
        assert_eq!(plan_steps(&request(true, true), true).len(), 7);

        // pod install on a non-Apple platform contributes nothing
        assert_eq!(plan_steps(&request(true, true), false).len(), 6);
        assert_eq!(plan_steps(&request(false, true), false).len(), 5);
    }

    #[test]
    fn plan_orders_conditional_steps_last() {
        let steps = plan_steps(&request(true, true), true);
        assert_eq!(steps[0], ScaffoldStep::InitGenerator);
        assert_eq!(steps[4], ScaffoldStep::VcsInit);
        assert_eq!(steps[5], ScaffoldStep::InstallDeps);
        assert_eq!(steps[6], ScaffoldStep::PodInstall);
    }

    #[test]
    fn install_message_names_the_package_manager() {
        let message = ScaffoldStep::InstallDeps.message(PackageManager::Pnpm);
        assert_eq!(message, "Installing dependencies (pnpm)...");
    }

    #[test]
    fn summary_suggests_the_chosen_package_manager_commands() {
        let summary = ScaffoldSummary {
            project_dir: PathBuf::from("/tmp/MyApp"),
            project_name: "MyApp".to_string(),
            package_manager: PackageManager::Yarn,
            vcs: VcsOutcome::Committed,
        };
        let rendered = summary.render();
        assert!(rendered.contains("MyApp"));
        assert!(rendered.contains("/tmp/MyApp"));
        assert!(rendered.contains("yarn start"));
        assert!(rendered.contains("yarn android"));
    }
}
