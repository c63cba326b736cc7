//! Package manager command table
//!
//! A closed enumeration with an explicit mapping to install and run-script
//! commands. The pipeline receives the selected variant inside the request
//! rather than reading any ambient state.

use std::fmt;

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Yarn,
        PackageManager::Pnpm,
        PackageManager::Bun,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Program and arguments of the dependency install command.
    pub fn install_command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            PackageManager::Npm => ("npm", &["install"]),
            PackageManager::Yarn => ("yarn", &["install"]),
            PackageManager::Pnpm => ("pnpm", &["install"]),
            PackageManager::Bun => ("bun", &["install"]),
        }
    }

    /// Program and arguments that run a package script.
    pub fn run_script_command(&self, script: &str) -> (&'static str, Vec<String>) {
        match self {
            PackageManager::Npm => ("npm", vec!["run".to_string(), script.to_string()]),
            PackageManager::Yarn => ("yarn", vec![script.to_string()]),
            PackageManager::Pnpm => ("pnpm", vec![script.to_string()]),
            PackageManager::Bun => ("bun", vec!["run".to_string(), script.to_string()]),
        }
    }

    /// Shell form of the run-script command, for user-facing next steps.
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            PackageManager::Yarn => format!("yarn {}", script),
            PackageManager::Pnpm => format!("pnpm {}", script),
            PackageManager::Bun => format!("bun run {}", script),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "npm" => Some(PackageManager::Npm),
            "yarn" => Some(PackageManager::Yarn),
            "pnpm" => Some(PackageManager::Pnpm),
            "bun" => Some(PackageManager::Bun),
            _ => None,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for pm in PackageManager::ALL {
            assert_eq!(PackageManager::from_name(pm.name()), Some(pm));
        }
        assert_eq!(PackageManager::from_name("deno"), None);
    }

    #[test]
    fn run_script_forms() {
        assert_eq!(PackageManager::Npm.run_script("start"), "npm run start");
        assert_eq!(PackageManager::Yarn.run_script("start"), "yarn start");
        assert_eq!(PackageManager::Pnpm.run_script("start"), "pnpm start");
        assert_eq!(PackageManager::Bun.run_script("start"), "bun run start");
    }

    #[test]
    fn run_script_command_matches_shell_form() {
        let (program, args) = PackageManager::Bun.run_script_command("pod-install");
        assert_eq!(program, "bun");
        assert_eq!(args, vec!["run".to_string(), "pod-install".to_string()]);

        let (program, args) = PackageManager::Yarn.run_script_command("android");
        assert_eq!(program, "yarn");
        assert_eq!(args, vec!["android".to_string()]);
    }
}
