//! Dependency installation after a template has been materialized.

use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use log::{debug, info};

/// Package manager used for the install step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Yarn,
    Npm,
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl PackageManager {
    /// Prefers yarn when it is installed, npm otherwise.
    pub fn detect() -> Self {
        if which::which("yarn").is_ok() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }
}

/// Runs `<package manager> install` inside `dir`.
///
/// # Errors
/// * `Error::InstallError` if the command cannot be started or exits unsuccessfully.
///   Files already written are kept.
pub fn run_install<P: AsRef<Path>>(dir: P, package_manager: PackageManager) -> Result<()> {
    let dir = dir.as_ref();
    info!("Installing dependencies with {package_manager}...");
    debug!("Running '{} install' in {}", package_manager, dir.display());

    let status = Command::new(package_manager.program())
        .arg("install")
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::InstallError(format!("could not run {package_manager}: {e}")))?;

    if !status.success() {
        return Err(Error::InstallError(format!(
            "'{package_manager} install' failed with status: {status}"
        )));
    }

    Ok(())
}
