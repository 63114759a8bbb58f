// ============================================================================
// deps.rs — Backend availability check and package-manager installer
// ============================================================================
//
// The SVG and ICO backends are optional Cargo features. A build without them
// can still run: it detects what is missing, and with the user's consent
// reinstalls itself through the package manager with both features on.
// ============================================================================

use std::fmt;
use std::process::Command;

use colored::*;

use crate::config::InstallConfig;
use crate::error::{IconError, Result};

/// Set in the environment of a relaunched process so it never relaunches again.
pub const RELAUNCH_ENV: &str = "ICONFORGE_RELAUNCHED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Svg,
    Ico,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Svg, Backend::Ico];

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Svg => "svg",
            Backend::Ico => "ico",
        }
    }

    /// Crates pulled in by the backend's feature.
    pub fn crates(&self) -> &'static str {
        match self {
            Backend::Svg => "resvg",
            Backend::Ico => "ico, image",
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            Backend::Svg => cfg!(feature = "svg"),
            Backend::Ico => cfg!(feature = "ico"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.crates())
    }
}

/// Backends this binary was built without. Empty when everything is present.
pub fn missing_backends() -> Vec<Backend> {
    Backend::ALL
        .iter()
        .copied()
        .filter(|b| !b.is_available())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    /// Everything was already compiled in.
    Ready,
    /// The package manager installed a new build; this process must relaunch it.
    Installed,
}

#[derive(Debug, Clone)]
pub struct Installer {
    pub program: String,
    pub args: Vec<String>,
}

impl Installer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &InstallConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    /// The command line as a user would type it.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Runs the package manager with inherited stdio. Success follows its exit status.
    pub fn install(&self) -> Result<()> {
        println!("{}", "Installing required dependencies...".yellow());
        tracing::debug!(command = %self.command_line(), "running package manager");

        let status = Command::new(&self.program).args(&self.args).status();
        let result = match status {
            Ok(s) if s.success() => Ok(()),
            Ok(s) => Err(IconError::InstallFailed {
                status: s.to_string(),
            }),
            Err(e) => Err(IconError::InstallSpawn {
                program: self.program.clone(),
                source: e,
            }),
        };

        match &result {
            Ok(()) => println!("{}", "Dependencies installed successfully!".green()),
            Err(e) => {
                tracing::error!(error = %e, "dependency installation failed");
                eprintln!("{}", "Failed to install dependencies. Please install manually:".red());
                eprintln!("{}", self.command_line());
            }
        }
        result
    }
}

/// Makes sure every backend is present.
///
/// `confirm` is only called when something is missing; it receives the missing
/// backends and answers whether to run `installer`.
pub fn ensure_backends<F>(missing: &[Backend], installer: &Installer, confirm: F) -> Result<DependencyStatus>
where
    F: FnOnce(&[Backend]) -> Result<bool>,
{
    if missing.is_empty() {
        return Ok(DependencyStatus::Ready);
    }

    if std::env::var_os(RELAUNCH_ENV).is_some() {
        // Already reinstalled once and the new build still lacks them.
        return Err(IconError::MissingBackends(missing.to_vec()));
    }

    println!("{}", "Required dependencies not found.".yellow());
    for backend in missing {
        println!("  - {}", backend);
    }

    if !confirm(missing)? {
        return Err(IconError::DependenciesDeclined);
    }

    installer.install()?;
    Ok(DependencyStatus::Installed)
}

/// Re-runs the freshly installed binary with `args` and returns its exit code.
pub fn relaunch(args: &[String]) -> Result<i32> {
    let program = env!("CARGO_PKG_NAME");
    tracing::debug!(program, ?args, "relaunching installed binary");
    let status = Command::new(program)
        .args(args)
        .env(RELAUNCH_ENV, "1")
        .status()
        .map_err(|e| IconError::Relaunch {
            program: program.to_string(),
            source: e,
        })?;
    Ok(status.code().unwrap_or(1))
}
