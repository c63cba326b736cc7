//! Charm-style CLI prompts using cliclack

use crate::commands::{self, CleanTarget, OneShotCommand};
use crate::pm::PackageManager;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::scaffold::{self, ScaffoldRequest};
use crate::tui::validate::{validate_bundle_id, validate_directory, validate_project_name};
use anyhow::Result;
use colored::Colorize;
use std::future::Future;
use std::path::PathBuf;

/// Pre-answered configuration for the create command; prompts fill whatever
/// is missing.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name
    pub name: Option<String>,

    /// Bundle identifier (e.g. com.company.myapp)
    pub bundle_id: Option<String>,

    /// Target directory to create the project in
    pub directory: Option<PathBuf>,

    /// Package manager to use
    pub package_manager: Option<PackageManager>,

    /// Install dependencies after scaffolding
    pub install_deps: bool,

    /// Run pod install after scaffolding (macOS only)
    pub pod_install: bool,

    /// Accept defaults for unanswered prompts (non-interactive mode)
    pub yes: bool,
}

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuCommand {
    Scaffold,
    Clean,
    PodInstall,
    RunAndroid,
    Version,
    Help,
}

/// Selection in the clean menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanChoice {
    Target(CleanTarget),
    All,
}

/// Optional setup steps offered after the main form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOption {
    InstallDeps,
    PodInstall,
}

/// Run the interactive menu and dispatch the chosen command.
pub async fn run() -> Result<()> {
    graceful(menu_flow()).await
}

/// Run the create command, prompting for whatever `args` leaves unanswered.
pub async fn run_create(args: CreateArgs) -> Result<()> {
    graceful(async {
        cliclack::intro("⚡ Create React Native Init App")?;
        create_flow(args).await
    })
    .await
}

/// Run a clean command; prompts for the target when none is given.
pub async fn run_clean(target: Option<CleanChoice>) -> Result<()> {
    graceful(async {
        let choice = match target {
            Some(choice) => {
                if !confirm_destructive(choice)? {
                    cliclack::outro_cancel("❌ Cancelled by user")?;
                    return Ok(());
                }
                choice
            }
            None => loop {
                if let Some(choice) = prompt_clean_choice()? {
                    break choice;
                }
            },
        };
        execute_clean(choice).await
    })
    .await
}

/// Run a single peripheral command, streaming its progress.
pub async fn run_one_shot(command: OneShotCommand) -> Result<()> {
    graceful(async {
        let printer = ProgressPrinter;
        match commands::run_command(command, Some(&printer)).await {
            Ok(output) => {
                println!("{}", output.green());
                Ok(())
            }
            Err(e) => {
                println!("{} {}", "❌ Error:".red(), e);
                Err(e.into())
            }
        }
    })
    .await
}

/// Treat a cancelled prompt as a clean exit rather than an error.
async fn graceful<F>(flow: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match flow.await {
        Err(e) if is_cancel(&e) => {
            let _ = cliclack::outro_cancel("❌ Cancelled by user");
            Ok(())
        }
        other => other,
    }
}

fn is_cancel(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::Interrupted)
}

async fn menu_flow() -> Result<()> {
    cliclack::intro("⚡ Create React Native Init App")?;
    cliclack::log::info("Create React Native projects with Clean Architecture")?;

    loop {
        let command: MenuCommand = cliclack::select("Select a command:")
            .item(
                MenuCommand::Scaffold,
                "🚀 Create New Project",
                "Create new project from template",
            )
            .item(
                MenuCommand::Clean,
                "🧹 Clean",
                "Clean caches and build folders",
            )
            .item(
                MenuCommand::PodInstall,
                "📦 Pod Install",
                "Install CocoaPods dependencies",
            )
            .item(
                MenuCommand::RunAndroid,
                "🤖 Run Android",
                "Run app on Android device/emulator",
            )
            .item(MenuCommand::Version, "ℹ️ Version", "Show CLI version and info")
            .item(MenuCommand::Help, "❓ Help", "Show available commands")
            .interact()?;

        match command {
            MenuCommand::Scaffold => return create_flow(CreateArgs::default()).await,
            MenuCommand::Clean => match prompt_clean_choice()? {
                Some(choice) => return execute_clean(choice).await,
                // Declined the destructive confirmation: back to the menu
                None => continue,
            },
            MenuCommand::PodInstall => return run_one_shot(OneShotCommand::PodInstall).await,
            MenuCommand::RunAndroid => return run_one_shot(OneShotCommand::RunAndroid).await,
            MenuCommand::Version => {
                println!("{}", version_text());
                return Ok(());
            }
            MenuCommand::Help => {
                println!("{}", help_text());
                return Ok(());
            }
        }
    }
}

async fn create_flow(args: CreateArgs) -> Result<()> {
    let request = prompt_scaffold_request(&args)?;

    cliclack::log::info(format!(
        "Creating {} in {}",
        request.project_name,
        request.directory.display()
    ))?;
    println!();

    let printer = ProgressPrinter;
    match scaffold::create_project(&request, Some(&printer)).await {
        Ok(summary) => {
            println!("{}", summary.render());
            cliclack::outro("Happy coding!")?;
            Ok(())
        }
        Err(e) => {
            cliclack::log::error(format!("{}", e))?;
            cliclack::outro_cancel("Setup failed")?;
            Err(e.into())
        }
    }
}

fn prompt_scaffold_request(args: &CreateArgs) -> Result<ScaffoldRequest> {
    let project_name = match &args.name {
        Some(name) => {
            validate_project_name(name).map_err(anyhow::Error::msg)?;
            name.clone()
        }
        None if args.yes => "MyApp".to_string(),
        None => cliclack::input("What is the name of your project?")
            .default_input("MyApp")
            .validate(|input: &String| validate_project_name(input))
            .interact()?,
    };

    let default_bundle = format!("com.company.{}", project_name.to_lowercase());
    let bundle_id = match &args.bundle_id {
        Some(bundle) => {
            validate_bundle_id(bundle).map_err(anyhow::Error::msg)?;
            bundle.clone()
        }
        None if args.yes => default_bundle,
        None => cliclack::input("Bundle Identifier")
            .default_input(&default_bundle)
            .validate(|input: &String| validate_bundle_id(input))
            .interact()?,
    };

    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let default_directory = current_dir.join(&project_name);
    let directory = match &args.directory {
        Some(dir) => dir.clone(),
        None if args.yes => default_directory,
        None => {
            let input: String = cliclack::input("Target Directory")
                .default_input(&default_directory.display().to_string())
                .validate(|input: &String| validate_directory(input))
                .interact()?;
            PathBuf::from(input)
        }
    };

    let package_manager = match args.package_manager {
        Some(pm) => pm,
        None if args.yes => PackageManager::Bun,
        None => cliclack::select("Which package manager do you want to use?")
            .item(PackageManager::Npm, "npm", "")
            .item(PackageManager::Yarn, "Yarn", "")
            .item(PackageManager::Pnpm, "pnpm", "")
            .item(PackageManager::Bun, "Bun", "")
            .initial_value(PackageManager::Bun)
            .interact()?,
    };

    let (install_deps, pod_install) = if args.install_deps || args.pod_install || args.yes {
        (args.install_deps, args.pod_install)
    } else {
        let selected: Vec<StepOption> = cliclack::multiselect("Select additional setup steps:")
            .item(StepOption::InstallDeps, "Install dependencies", "")
            .item(StepOption::PodInstall, "Run pod install (iOS)", "")
            .required(false)
            .interact()?;
        (
            selected.contains(&StepOption::InstallDeps),
            selected.contains(&StepOption::PodInstall),
        )
    };

    Ok(ScaffoldRequest {
        project_name,
        bundle_id,
        directory,
        package_manager,
        install_deps,
        pod_install,
    })
}

fn prompt_clean_choice() -> Result<Option<CleanChoice>> {
    let mut select = cliclack::select("🧹 What do you want to clean?");
    for target in CleanTarget::ALL {
        let label = if target.destructive() {
            format!("{} ⚠️", target.label())
        } else {
            target.label().to_string()
        };
        select = select.item(CleanChoice::Target(target), label, "");
    }
    let choice: CleanChoice = select.item(CleanChoice::All, "All ⚠️", "").interact()?;

    if confirm_destructive(choice)? {
        Ok(Some(choice))
    } else {
        Ok(None)
    }
}

fn confirm_destructive(choice: CleanChoice) -> Result<bool> {
    let target = match choice {
        CleanChoice::All => Some("all caches".to_string()),
        CleanChoice::Target(t) if t.destructive() => Some(t.label().to_string()),
        CleanChoice::Target(_) => None,
    };
    match target {
        Some(what) => {
            let confirmed: bool =
                cliclack::confirm(format!("⚠️ This will delete {}. Are you sure?", what))
                    .initial_value(false)
                    .interact()?;
            Ok(confirmed)
        }
        None => Ok(true),
    }
}

async fn execute_clean(choice: CleanChoice) -> Result<()> {
    let command = match choice {
        CleanChoice::All => OneShotCommand::CleanAll,
        CleanChoice::Target(target) => OneShotCommand::Clean(target),
    };
    run_one_shot(command).await
}

/// Prints step transitions and streams subprocess output, dimmed.
struct ProgressPrinter;

impl ProgressSink for ProgressPrinter {
    fn emit(&self, event: ProgressEvent) {
        match &event.log_chunk {
            Some(chunk) => print!("{}", chunk.dimmed()),
            None => {
                let shown = (event.step + 1).min(event.total);
                println!(
                    "{} {}",
                    format!("[{}/{}]", shown, event.total).cyan().bold(),
                    event.message
                );
            }
        }
    }
}

fn version_text() -> String {
    format!(
        "\n⚡ Create React Native Init App\n\
         Version: {}\n\
         React Native Template: {}\n\n\
         Usage:\n\
         \x20 rnia\n\
         \x20 rnia create\n\
         \x20 rnia clean\n\
         \x20 rnia pod-install\n\
         \x20 rnia run-android\n\n\
         Run 'rnia --help' for more information.\n",
        crate::VERSION,
        crate::RN_VERSION
    )
}

fn help_text() -> &'static str {
    "\n⚡ Available Commands:\n\n\
     🆕 create      - Create new React Native project from template\n\
     🧹 clean       - Clean caches and build folders\n\
     \x20  • Android    - Clean Android build folder\n\
     \x20  • iOS        - Clean iOS build folder\n\
     \x20  • Node Mods  - Remove node_modules\n\
     \x20  • Watchman   - Clear Watchman cache\n\
     \x20  • All        - Clean everything\n\
     📦 pod-install - Install CocoaPods dependencies\n\
     🤖 run-android - Run app on Android device/emulator\n\n\
     Examples:\n\
     \x20 rnia\n\
     \x20 rnia create --name MyApp\n\
     \x20 rnia clean android\n"
}
