//! Configuration handling for stencil.
//! Locates the root `stencil.yml` and parses it, along with each template's
//! `.template.yml` manifest, into typed structures with defaults applied.

use crate::constants::{DEFAULT_FOLDER_KEY, TEMPLATE_FILES};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of the root configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootConfig {
    /// Glob patterns, relative to the configuration's directory, matching template directories.
    #[serde(default)]
    pub template_dirs: Vec<String>,
}

/// Contents of a template's manifest file.
#[derive(Debug, Deserialize)]
pub struct TemplateManifest {
    pub name: String,
    /// Empty or missing means [`DEFAULT_FOLDER_KEY`].
    #[serde(default)]
    pub folder: Option<String>,
    /// Placeholder keys mapped to the description shown when asking for a value.
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub install: bool,
}

impl TemplateManifest {
    /// Variable key naming the output folder.
    pub fn folder_key(&self) -> &str {
        match self.folder.as_deref().map(str::trim) {
            Some(folder) if !folder.is_empty() => folder,
            _ => DEFAULT_FOLDER_KEY,
        }
    }
}

/// Searches `start_dir` and then each of its ancestors for a file named `file_name`.
///
/// # Returns
/// * `Option<PathBuf>` - Full path of the closest match, `None` once the
///   filesystem root is reached without one
pub fn find_closest_ancestor<P: AsRef<Path>>(start_dir: P, file_name: &str) -> Option<PathBuf> {
    start_dir.as_ref().ancestors().map(|dir| dir.join(file_name)).find(|candidate| {
        debug!("Looking for configuration at {}", candidate.display());
        candidate.is_file()
    })
}

/// Parses the root configuration file.
///
/// # Errors
/// * `Error::ConfigParseError` carrying the path and the parser message if the
///   file cannot be read or is not valid YAML
pub fn parse_root_config<P: AsRef<Path>>(path: P) -> Result<RootConfig> {
    let path = path.as_ref();
    let parse_error = |reason: String| Error::ConfigParseError {
        path: path.display().to_string(),
        reason,
    };
    let content = std::fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;

    // An empty document is a configuration with no template directories.
    if content.trim().is_empty() {
        return Ok(RootConfig::default());
    }
    let config: Option<RootConfig> =
        serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
    Ok(config.unwrap_or_default())
}

/// Finds the manifest file inside a template directory.
pub fn find_manifest<P: AsRef<Path>>(template_dir: P) -> Option<PathBuf> {
    TEMPLATE_FILES
        .iter()
        .map(|file| template_dir.as_ref().join(file))
        .find(|path| path.is_file())
}

/// Loads and parses the manifest of a template directory.
///
/// # Errors
/// * `Error::TemplateManifestError` if no manifest exists, it cannot be read,
///   or it is not a valid manifest (for example, `name` is missing)
pub fn load_manifest<P: AsRef<Path>>(template_dir: P) -> Result<TemplateManifest> {
    let template_dir = template_dir.as_ref();
    let path = find_manifest(template_dir).ok_or_else(|| Error::TemplateManifestError {
        path: template_dir.display().to_string(),
        reason: format!("no manifest file found (tried: {})", TEMPLATE_FILES.join(", ")),
    })?;
    let manifest_error = |reason: String| Error::TemplateManifestError {
        path: path.display().to_string(),
        reason,
    };

    debug!("Loading template manifest from {}", path.display());
    let content = std::fs::read_to_string(&path).map_err(|e| manifest_error(e.to_string()))?;
    serde_yaml::from_str(&content).map_err(|e| manifest_error(e.to_string()))
}
