//! Template registry loading.
//! Expands the `templateDirs` patterns of the root configuration and turns
//! every directory with a valid manifest into a [`Template`].

use crate::config::{find_closest_ancestor, load_manifest, parse_root_config};
use crate::constants::CONFIG_FILE;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, error, warn};
use std::path::{Path, PathBuf};

/// One scaffold definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Absolute path of the template's source directory.
    pub dir: PathBuf,
    pub name: String,
    /// Variable whose value names the output folder and replaces `__<folder>__` in paths.
    pub folder: String,
    /// Placeholder keys mapped to their prompt text.
    pub variables: IndexMap<String, String>,
    /// Whether dependencies are installed after materialization.
    pub install: bool,
}

/// Loaded templates for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory containing the root configuration.
    pub root_dir: PathBuf,
    /// Templates in discovery order.
    pub templates: Vec<Template>,
}

impl Settings {
    /// Looks up a template by its manifest name. The first match wins.
    pub fn find(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.name == name)
    }
}

/// Loads the template registry.
///
/// # Arguments
/// * `config_path` - Explicit root configuration, skips the ancestor search
/// * `cwd` - Directory the ancestor search starts from
///
/// # Errors
/// * `Error::ConfigNotFoundError` if no root configuration can be located
/// * `Error::ConfigParseError` if the root configuration is malformed
/// * `Error::GlobPatternError` if a `templateDirs` entry is not a valid pattern
pub fn load_settings<P: AsRef<Path>>(config_path: Option<&Path>, cwd: P) -> Result<Settings> {
    let cwd = cwd.as_ref();
    let path = match config_path.map(|path| cwd.join(path)) {
        Some(path) if path.is_file() => path,
        Some(path) => {
            warn!("Configuration file '{}' does not exist", path.display());
            return Err(Error::ConfigNotFoundError {
                config_file: path.display().to_string(),
                start_dir: cwd.display().to_string(),
            });
        }
        None => find_closest_ancestor(cwd, CONFIG_FILE).ok_or_else(|| {
            Error::ConfigNotFoundError {
                config_file: CONFIG_FILE.to_string(),
                start_dir: cwd.display().to_string(),
            }
        })?,
    };

    let config = parse_root_config(&path)
        .inspect_err(|_| error!("Invalid configuration file: {}", path.display()))?;

    let root_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut templates = Vec::new();
    for pattern in &config.template_dirs {
        for dir in expand_pattern(&root_dir, pattern)? {
            if let Some(template) = load_template(&dir) {
                templates.push(template);
            }
        }
    }

    debug!("Loaded {} template(s) from {}", templates.len(), path.display());
    Ok(Settings { root_dir, templates })
}

/// Expands one `templateDirs` pattern into the directories it matches,
/// in the order the glob walk yields them.
fn expand_pattern(root_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // The configuration's own location is literal, only `pattern` is a glob.
    let escaped_root = glob::Pattern::escape(&root_dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_root).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();
    let glob_error = |reason: String| Error::GlobPatternError {
        pattern: pattern.to_string(),
        reason,
    };

    let mut dirs = Vec::new();
    for entry in glob::glob(&full_pattern).map_err(|e| glob_error(e.to_string()))? {
        match entry {
            Ok(path) if path.is_dir() => dirs.push(path),
            Ok(path) => debug!("Skipping '{}': not a directory", path.display()),
            Err(e) => debug!("Skipping unreadable path: {e}"),
        }
    }
    Ok(dirs)
}

/// Reads the manifest of `dir`. A directory without a valid manifest is not a template.
fn load_template(dir: &Path) -> Option<Template> {
    match load_manifest(dir) {
        Ok(manifest) => Some(Template {
            dir: dir.to_path_buf(),
            folder: manifest.folder_key().to_string(),
            name: manifest.name,
            variables: manifest.variables,
            install: manifest.install,
        }),
        Err(e) => {
            debug!("Skipping template directory: {e}");
            None
        }
    }
}
