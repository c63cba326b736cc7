//! rnia - create React Native projects with Clean Architecture

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rnia_core::commands::{CleanTarget, OneShotCommand};
use rnia_core::pm::PackageManager;
use rnia_core::tui::{self, CleanChoice, CreateArgs};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rnia")]
#[command(about = "Create React Native projects with Clean Architecture")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new React Native project from the template
    Create(CliCreateArgs),
    /// Clean caches and build folders
    Clean {
        /// Target to clean (prompts when omitted)
        #[arg(value_enum)]
        target: Option<CleanArg>,
    },
    /// Install CocoaPods dependencies
    PodInstall,
    /// Run the app on an Android device or emulator
    RunAndroid,
}

#[derive(Parser, Debug)]
struct CliCreateArgs {
    /// Project name
    #[arg(short, long)]
    name: Option<String>,

    /// Bundle identifier (e.g. com.company.myapp)
    #[arg(short, long)]
    bundle_id: Option<String>,

    /// Target directory
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Package manager to use
    #[arg(short, long, value_enum)]
    package_manager: Option<PmArg>,

    /// Install dependencies after scaffolding
    #[arg(long)]
    install: bool,

    /// Run pod install after scaffolding (macOS only)
    #[arg(long)]
    pod_install: bool,

    /// Accept defaults for unanswered prompts (non-interactive mode)
    #[arg(short, long)]
    yes: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PmArg {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl From<PmArg> for PackageManager {
    fn from(arg: PmArg) -> Self {
        match arg {
            PmArg::Npm => PackageManager::Npm,
            PmArg::Yarn => PackageManager::Yarn,
            PmArg::Pnpm => PackageManager::Pnpm,
            PmArg::Bun => PackageManager::Bun,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CleanArg {
    Android,
    Ios,
    Node,
    Watchman,
    All,
}

impl From<CleanArg> for CleanChoice {
    fn from(arg: CleanArg) -> Self {
        match arg {
            CleanArg::Android => CleanChoice::Target(CleanTarget::Android),
            CleanArg::Ios => CleanChoice::Target(CleanTarget::Ios),
            CleanArg::Node => CleanChoice::Target(CleanTarget::NodeModules),
            CleanArg::Watchman => CleanChoice::Target(CleanTarget::Watchman),
            CleanArg::All => CleanChoice::All,
        }
    }
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            bundle_id: args.bundle_id,
            directory: args.directory,
            package_manager: args.package_manager.map(Into::into),
            install_deps: args.install,
            pod_install: args.pod_install,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    let result = match args.command {
        Some(Command::Create(create_args)) => tui::run_create(create_args.into()).await,
        Some(Command::Clean { target }) => tui::run_clean(target.map(Into::into)).await,
        Some(Command::PodInstall) => tui::run_one_shot(OneShotCommand::PodInstall).await,
        Some(Command::RunAndroid) => tui::run_one_shot(OneShotCommand::RunAndroid).await,
        None => tui::run().await,
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
