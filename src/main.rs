//! stencil's main application entry point.
//! Handles command-line argument parsing and dispatches to the `ls` and
//! `create` operations.

use std::path::Path;

use log::warn;
use stencil::{
    cli::{get_args, Args, Commands},
    create::{create, list_templates, CreateOptions, TemplateSummary},
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    npm::NpmCli,
    processor::Variables,
    prompt::DialoguerPrompter,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        if let Error::ConfigNotFoundError { .. } = err {
            warn!("No '{}' found. Create one listing your templateDirs.", stencil::constants::CONFIG_FILE);
        }
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    let cwd = std::env::current_dir()?;

    match args.command {
        Commands::Ls { config } => {
            let templates = list_templates(config.as_deref(), &cwd)?;
            print_templates(&templates);
            Ok(())
        }
        Commands::Create { template, config, output, data, skip_install } => {
            let answers: Variables = data.into_iter().collect();
            let prompt = DialoguerPrompter::with_answers(answers);
            let options = CreateOptions {
                settings_path: config,
                target_dir: output.map(|dir| cwd.join(dir)).unwrap_or_else(|| cwd.clone()),
                cwd,
                template_name: template,
                before_write: None,
                skip_install,
            };

            let created = create(options, &prompt, &NpmCli::new())?;
            println!(
                "Created '{}' from template '{}' ({} files).",
                created.output_dir.display(),
                created.template,
                created.files.len()
            );
            Ok(())
        }
    }
}

fn print_templates(templates: &[TemplateSummary]) {
    if templates.is_empty() {
        println!("No templates found.");
        return;
    }

    let name_width = templates.iter().map(|t| t.name.len()).max().unwrap_or(0).max("Template".len());
    println!("{:<name_width$}  {:>5}  {:<10}  Directory", "Template", "Files", "Folder");
    for template in templates {
        println!(
            "{:<name_width$}  {:>5}  {:<10}  {}",
            template.name,
            template.files.map_or_else(|| "?".to_string(), |n| n.to_string()),
            template.folder,
            display_dir(&template.dir)
        );
    }
}

fn display_dir(dir: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| dir.strip_prefix(cwd).ok().map(|p| p.display().to_string()))
        .unwrap_or_else(|| dir.display().to_string())
}
