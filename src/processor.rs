//! Template materialization.
//! Walks a template directory, substitutes `__key__` placeholders in paths and
//! content, and writes the result into a new output directory.

use globset::GlobSet;
use indexmap::IndexMap;
use log::{debug, info};
use std::fs;
use std::path::{is_separator, Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{PACKAGE_JSON, UNNAMED_FOLDER};
use crate::error::{Error, Result};
use crate::hooks::{BeforeWrite, WriteAction, WriteFile};
use crate::ignore::build_exclusions;
use crate::npm::{to_latest_versions, PackageRegistry};
use crate::settings::Template;

/// Values for a template's placeholders, keyed by variable name.
pub type Variables = IndexMap<String, String>;

/// Content of a file read from a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    /// Copied verbatim, placeholders are not substituted.
    Binary(Vec<u8>),
}

/// A file discovered in a template directory.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// Base name of the file.
    pub name: String,
    /// Path relative to the template root.
    pub path: PathBuf,
    pub content: FileContent,
}

/// Result of a successful materialization.
#[derive(Debug, Clone)]
pub struct Materialized {
    pub output_dir: PathBuf,
    /// Every file written, in write order.
    pub files: Vec<PathBuf>,
}

/// Returns the placeholder token for `key`.
pub fn token(key: &str) -> String {
    format!("__{key}__")
}

/// Replaces the token of every variable with a non-empty value.
///
/// Tokens of keys without a value are left untouched.
pub fn substitute(text: &str, variables: &Variables) -> String {
    variables
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .fold(text.to_string(), |text, (key, value)| text.replace(&token(key), value))
}

/// Name of the output folder: the folder variable's value with path
/// separators turned into hyphens, or `Unnamed` when it has no value.
pub fn folder_name(template: &Template, variables: &Variables) -> String {
    match variables.get(&template.folder) {
        Some(value) if !value.is_empty() => {
            value.chars().map(|c| if is_separator(c) { '-' } else { c }).collect()
        }
        _ => UNNAMED_FOLDER.to_string(),
    }
}

/// Computes the destination path of a template file, relative to the output directory.
///
/// `__<folder>__` becomes the folder name, then every other placeholder is
/// substituted like file content.
///
/// # Errors
/// * `Error::InvalidPathError` if the path is not UTF-8, or the substituted
///   path would leave the output directory
pub fn resolve_target_path(
    relative_path: &Path,
    template: &Template,
    folder_name: &str,
    variables: &Variables,
) -> Result<PathBuf> {
    let invalid = || Error::InvalidPathError {
        path: relative_path.display().to_string(),
    };
    let path = relative_path.to_str().ok_or_else(invalid)?;
    let path = path.replace(&token(&template.folder), folder_name);
    let path = PathBuf::from(substitute(&path, variables));

    if path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
        Ok(path)
    } else {
        Err(Error::InvalidPathError { path: path.display().to_string() })
    }
}

/// A file is binary when its first 8KB contain a null byte.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(8192).any(|&b| b == 0)
}

/// Lists the files of a template directory, relative to its root, skipping
/// manifests and operating system metadata. Directories are walked in file
/// name order. File contents are not read.
pub fn list_files<P: AsRef<Path>>(template_dir: P, exclusions: &GlobSet) -> Result<Vec<PathBuf>> {
    let template_dir = template_dir.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(template_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(template_dir).to_path_buf();
            Error::read(path, e.into())
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative_path = entry
            .path()
            .strip_prefix(template_dir)
            .map_err(|_| Error::InvalidPathError { path: entry.path().display().to_string() })?;

        if exclusions.is_match(relative_path) {
            debug!("Skipping excluded file {}", relative_path.display());
            continue;
        }
        files.push(relative_path.to_path_buf());
    }
    Ok(files)
}

/// Reads every file [`list_files`] finds in a template directory.
///
/// # Errors
/// * `Error::ReadError` naming the first entry that cannot be walked or read
pub fn load_files<P: AsRef<Path>>(template_dir: P, exclusions: &GlobSet) -> Result<Vec<TemplateFile>> {
    let template_dir = template_dir.as_ref();

    list_files(template_dir, exclusions)?
        .into_iter()
        .map(|path| {
            let source = template_dir.join(&path);
            let bytes = fs::read(&source).map_err(|e| Error::read(&source, e))?;
            let content = if is_binary(&bytes) {
                FileContent::Binary(bytes)
            } else {
                match String::from_utf8(bytes) {
                    Ok(text) => FileContent::Text(text),
                    Err(e) => FileContent::Binary(e.into_bytes()),
                }
            };
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            Ok(TemplateFile { name, path, content })
        })
        .collect()
}

/// Counts the files a materialization of `template` would write.
pub fn count_files(template: &Template) -> Result<usize> {
    let exclusions = build_exclusions()?;
    Ok(list_files(&template.dir, &exclusions)?.len())
}

/// Creates the output directory, failing if it already exists.
///
/// # Errors
/// * `Error::DestinationConflictError` if anything exists at `output_dir`
/// * `Error::WriteError` if the directory cannot be created
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() {
        return Err(Error::DestinationConflictError {
            output_dir: output_dir.display().to_string(),
        });
    }
    fs::create_dir_all(output_dir).map_err(|e| Error::write(output_dir, e.into()))?;
    Ok(output_dir.to_path_buf())
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Turns a template and a set of variable values into a new directory.
pub struct Processor<'a> {
    template: &'a Template,
    variables: &'a Variables,
    registry: &'a dyn PackageRegistry,
    before_write: Option<&'a dyn BeforeWrite>,
}

impl<'a> Processor<'a> {
    pub fn new(
        template: &'a Template,
        variables: &'a Variables,
        registry: &'a dyn PackageRegistry,
    ) -> Self {
        Self { template, variables, registry, before_write: None }
    }

    /// Offers every file to `hook` before it is written.
    pub fn with_before_write(mut self, hook: &'a dyn BeforeWrite) -> Self {
        self.before_write = Some(hook);
        self
    }

    /// Writes the template into `<target_dir>/<folder name>`.
    ///
    /// Files are written one at a time in walk order. A failure stops the
    /// loop and leaves already written files in place.
    ///
    /// # Errors
    /// * `Error::DestinationConflictError` if the output directory exists; nothing is written
    /// * `Error::ReadError` if a template file cannot be read; nothing is written
    /// * `Error::WriteError` wrapping the cause of any failure while writing a file
    pub fn materialize<P: AsRef<Path>>(&self, target_dir: P) -> Result<Materialized> {
        let folder_name = folder_name(self.template, self.variables);
        let output_dir = target_dir.as_ref().join(&folder_name);
        if output_dir.exists() {
            return Err(Error::DestinationConflictError {
                output_dir: output_dir.display().to_string(),
            });
        }

        // Read the whole template first so an unreadable file leaves nothing behind.
        let exclusions = build_exclusions()?;
        let files = load_files(&self.template.dir, &exclusions)?;

        let output_dir = ensure_output_dir(output_dir)?;
        info!("Creating:");

        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let path = self.process_file(file, &output_dir, &folder_name)?;
            info!("  {}", path.display());
            written.push(path);
        }

        Ok(Materialized { output_dir, files: written })
    }

    fn process_file(&self, file: &TemplateFile, output_dir: &Path, folder_name: &str) -> Result<PathBuf> {
        let target = resolve_target_path(&file.path, self.template, folder_name, self.variables)
            .map_err(|e| Error::write(output_dir.join(&file.path), e))?;
        let target = output_dir.join(target);

        let (mut path, mut content) = match &file.content {
            FileContent::Text(text) => {
                let mut text = substitute(text, self.variables);
                if file.name == PACKAGE_JSON {
                    debug!("Resolving latest versions in {}", target.display());
                    text = to_latest_versions(&text, self.registry)
                        .map_err(|e| Error::write(&target, e))?;
                }
                (target, FileContent::Text(text))
            }
            FileContent::Binary(bytes) => (target, FileContent::Binary(bytes.clone())),
        };

        if let Some(hook) = self.before_write {
            let (text, is_binary) = match &content {
                FileContent::Text(text) => (text.as_str(), false),
                FileContent::Binary(_) => ("", true),
            };
            let action = hook
                .before_write(&WriteFile { path: &path, text, is_binary })
                .map_err(|e| Error::write(&path, e))?;
            match action {
                WriteAction::Unchanged => {}
                WriteAction::Text(text) => content = FileContent::Text(text),
                WriteAction::Path(new_path) => path = new_path,
                WriteAction::Full { path: new_path, text } => {
                    path = new_path;
                    content = FileContent::Text(text);
                }
            }
        }

        let bytes = match &content {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Binary(bytes) => bytes.as_slice(),
        };
        write_file(&path, bytes).map_err(|e| Error::write(&path, e))?;
        Ok(path)
    }
}
