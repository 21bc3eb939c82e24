//! Latest-version resolution for `package.json` files.
//! Dependencies pinned to `__LATEST__` are looked up concurrently in a
//! package registry and replaced by the current published version.

use crate::constants::LATEST_VERSION;
use crate::error::{Error, Result};
use log::debug;
use serde_json::{Map, Value};
use std::process::{Command, Stdio};

/// Dependency tables that may contain version sentinels.
const DEPENDENCY_FIELDS: [&str; 2] = ["dependencies", "devDependencies"];

/// Source of published package versions.
pub trait PackageRegistry: Sync {
    /// Returns the latest published version of `name`, or `None` if the
    /// registry does not know the package.
    fn latest_version(&self, name: &str) -> Result<Option<String>>;
}

/// Registry lookups through the `npm info` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpmCli;

impl NpmCli {
    pub fn new() -> Self {
        Self
    }
}

impl PackageRegistry for NpmCli {
    fn latest_version(&self, name: &str) -> Result<Option<String>> {
        debug!("Running 'npm info {name} --json'");
        let output = Command::new("npm")
            .args(["info", name, "--json"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::VersionLookupError {
                package: name.to_string(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stdout) || is_not_found(&stderr) {
                return Ok(None);
            }
            return Err(Error::VersionLookupError {
                package: name.to_string(),
                reason: format!("npm exited with {}: {}", output.status, stderr.trim()),
            });
        }

        parse_info(name, &stdout)
    }
}

fn is_not_found(output: &str) -> bool {
    output.contains("E404") || output.to_lowercase().contains("not found")
}

/// Reads `dist-tags.latest` out of `npm info --json` output.
pub fn parse_info(name: &str, text: &str) -> Result<Option<String>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let lookup_error = |reason: String| Error::VersionLookupError {
        package: name.to_string(),
        reason,
    };

    let info: Value = serde_json::from_str(text).map_err(|e| lookup_error(e.to_string()))?;
    info.pointer("/dist-tags/latest")
        .and_then(Value::as_str)
        .map(|latest| Some(latest.to_string()))
        .ok_or_else(|| lookup_error("response has no 'dist-tags.latest'".to_string()))
}

/// Replaces every `__LATEST__` dependency version with the latest published one.
///
/// Versions the registry does not know stay `__LATEST__`. Every other field,
/// and the order of keys, is preserved. The result is pretty printed with a
/// trailing newline.
///
/// # Errors
/// * `Error::PackageManifestError` if `package_json` is not valid JSON
/// * `Error::VersionLookupError` if any lookup fails for a reason other than "not found"
pub fn to_latest_versions(package_json: &str, registry: &dyn PackageRegistry) -> Result<String> {
    let mut package: Value = serde_json::from_str(package_json)
        .map_err(|e| Error::PackageManifestError(e.to_string()))?;

    for field in DEPENDENCY_FIELDS {
        if let Some(Value::Object(dependencies)) = package.get_mut(field) {
            update_dependencies(dependencies, registry)?;
        }
    }

    let mut text = serde_json::to_string_pretty(&package)
        .map_err(|e| Error::PackageManifestError(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

fn update_dependencies(
    dependencies: &mut Map<String, Value>,
    registry: &dyn PackageRegistry,
) -> Result<()> {
    let pending: Vec<String> = dependencies
        .iter()
        .filter(|(_, version)| version.as_str() == Some(LATEST_VERSION))
        .map(|(name, _)| name.clone())
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    // Nothing is applied until every lookup of this table has finished.
    for (name, latest) in fetch_latest(&pending, registry)? {
        match latest {
            Some(version) => {
                debug!("Resolved {name} to {version}");
                dependencies.insert(name, Value::String(version));
            }
            None => debug!("Package '{name}' not found, keeping {LATEST_VERSION}"),
        }
    }
    Ok(())
}

fn fetch_latest(
    names: &[String],
    registry: &dyn PackageRegistry,
) -> Result<Vec<(String, Option<String>)>> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = names
            .iter()
            .map(|name| (name, scope.spawn(move || registry.latest_version(name))))
            .collect();

        // Join every lookup before reporting the first failure.
        let joined: Vec<_> = handles
            .into_iter()
            .map(|(name, handle)| (name, handle.join()))
            .collect();

        joined
            .into_iter()
            .map(|(name, outcome)| {
                let latest = outcome.map_err(|_| Error::VersionLookupError {
                    package: name.clone(),
                    reason: "lookup thread panicked".to_string(),
                })??;
                Ok((name.clone(), latest))
            })
            .collect()
    })
}
