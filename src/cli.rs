//! Command-line interface implementation for stencil.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for stencil.
#[derive(Parser, Debug)]
#[command(author, version, about = "stencil: create new sub-projects from templates", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available templates
    #[command(visible_alias = "l")]
    Ls {
        /// Path to the root configuration file (searched for upwards by default)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Create a new project from a template
    #[command(visible_aliases = ["tmpl", "t"])]
    Create {
        /// Name of the template to use (prompted for when omitted)
        #[arg(value_name = "TEMPLATE")]
        template: Option<String>,

        /// Path to the root configuration file (searched for upwards by default)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Directory the new project folder is created in (current directory by default)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Set a variable value instead of being asked for it (can be repeated)
        #[arg(short, long = "data", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        data: Vec<(String, String)>,

        /// Do not install dependencies even if the template asks for it
        #[arg(long)]
        skip_install: bool,
    },
}

/// Parses a `KEY=VALUE` pair. The value may be empty and may contain `=`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VALUE: no `=` or empty key in `{s}`")),
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if no command is given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::MissingRequiredArgument
            | ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            }
            _ => e.exit(),
        },
    }
}
