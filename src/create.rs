//! Core orchestration of the `create` and `ls` operations.
//! Combines registry loading, template selection, variable collection,
//! materialization and the optional install step.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::hooks::BeforeWrite;
use crate::install::{run_install, PackageManager};
use crate::npm::PackageRegistry;
use crate::processor::{count_files, Processor};
use crate::prompt::Prompter;
use crate::settings::{load_settings, Settings, Template};

/// Inputs of a `create` run.
pub struct CreateOptions<'a> {
    /// Explicit root configuration. Searched for from `cwd` when `None`.
    pub settings_path: Option<PathBuf>,
    /// Directory the configuration search starts from.
    pub cwd: PathBuf,
    /// Directory the new project folder is created in.
    pub target_dir: PathBuf,
    /// Template to use without asking.
    pub template_name: Option<String>,
    pub before_write: Option<&'a dyn BeforeWrite>,
    /// Skip the dependency install even if the template asks for it.
    pub skip_install: bool,
}

impl<'a> CreateOptions<'a> {
    /// Options that search from `cwd` and create the project inside it.
    pub fn new<P: Into<PathBuf>>(cwd: P) -> Self {
        let cwd = cwd.into();
        Self {
            settings_path: None,
            target_dir: cwd.clone(),
            cwd,
            template_name: None,
            before_write: None,
            skip_install: false,
        }
    }
}

/// Outcome of a successful `create` run.
#[derive(Debug, Clone)]
pub struct Created {
    pub template: String,
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub installed: bool,
}

/// Creates a new project from a template.
///
/// # Flow
/// 1. Loads the template registry
/// 2. Picks the template by name, or asks the prompter
/// 3. Collects variable values
/// 4. Materializes the template
/// 5. Installs dependencies when the template asks for it
///
/// # Errors
/// * `Error::ConfigNotFoundError` / `Error::ConfigParseError` without a usable configuration
/// * `Error::TemplateNotFoundError` if `template_name` matches no template
/// * `Error::DestinationConflictError` if the output folder already exists
/// * `Error::WriteError` if writing a file fails
/// * `Error::InstallError` if the install step fails; files are kept
pub fn create(
    options: CreateOptions<'_>,
    prompt: &dyn Prompter,
    registry: &dyn PackageRegistry,
) -> Result<Created> {
    let settings = load_settings(options.settings_path.as_deref(), &options.cwd)?;
    let template = select_template(&settings, options.template_name.as_deref(), prompt)?;
    info!("Create from template: {}", template.name);

    let variables = prompt.collect_variables(template)?;
    debug!("Collected {} variable(s)", variables.len());

    let mut processor = Processor::new(template, &variables, registry);
    if let Some(hook) = options.before_write {
        processor = processor.with_before_write(hook);
    }
    let materialized = processor.materialize(&options.target_dir)?;

    let installed = template.install && !options.skip_install;
    if installed {
        run_install(&materialized.output_dir, PackageManager::detect())?;
    } else if template.install {
        debug!("Skipping dependency install");
    }

    info!("Done");
    Ok(Created {
        template: template.name.clone(),
        output_dir: materialized.output_dir,
        files: materialized.files,
        installed,
    })
}

fn select_template<'s>(
    settings: &'s Settings,
    name: Option<&str>,
    prompt: &dyn Prompter,
) -> Result<&'s Template> {
    if let Some(name) = name {
        return settings
            .find(name)
            .ok_or_else(|| Error::TemplateNotFoundError { name: name.to_string() });
    }
    if settings.templates.is_empty() {
        return Err(Error::NoTemplatesError {
            config_dir: settings.root_dir.display().to_string(),
        });
    }
    prompt
        .select_template(&settings.templates)?
        .ok_or_else(|| Error::PromptError("no template selected".to_string()))
}

/// One row of the template listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub folder: String,
    pub dir: PathBuf,
    /// Files a materialization would write, `None` if the directory could not be walked.
    pub files: Option<usize>,
}

/// Lists the templates of the configuration found from `cwd` or at `settings_path`.
///
/// A template whose files cannot be counted is still listed.
pub fn list_templates<P: AsRef<Path>>(
    settings_path: Option<&Path>,
    cwd: P,
) -> Result<Vec<TemplateSummary>> {
    let settings = load_settings(settings_path, cwd)?;
    let summaries = settings
        .templates
        .iter()
        .map(|template| {
            let files = count_files(template)
                .inspect_err(|e| warn!("Could not count files of template '{}': {e}", template.name))
                .ok();
            TemplateSummary {
                name: template.name.clone(),
                folder: template.folder.clone(),
                dir: template.dir.clone(),
                files,
            }
        })
        .collect();
    Ok(summaries)
}
