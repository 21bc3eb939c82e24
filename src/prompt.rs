//! User input and interaction handling.
//! Selecting a template and collecting a value for each of its variables
//! happens behind the [`Prompter`] trait so that non-interactive callers can
//! supply their own answers.

use crate::error::{Error, Result};
use crate::processor::Variables;
use crate::settings::Template;
use dialoguer::{Input, Select};
use log::debug;

/// Source of a template choice and of variable values.
pub trait Prompter {
    /// Picks one of `templates`. `None` means nothing was chosen.
    fn select_template<'t>(&self, templates: &'t [Template]) -> Result<Option<&'t Template>>;

    /// Obtains a value for the variables of `template`. Keys left out are not substituted.
    fn collect_variables(&self, template: &Template) -> Result<Variables>;
}

/// Turns a variable description into prompt text: a trailing period is
/// dropped and a colon added unless the text is a question.
pub fn format_question(description: &str) -> String {
    let description = description.strip_suffix('.').unwrap_or(description);
    if description.ends_with('?') {
        description.to_string()
    } else {
        format!("{description}:")
    }
}

/// Terminal prompts built on dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter {
    /// Values supplied up front, e.g. with `--data`. These keys are not asked for.
    answers: Variables,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: Variables) -> Self {
        Self { answers }
    }
}

impl Prompter for DialoguerPrompter {
    fn select_template<'t>(&self, templates: &'t [Template]) -> Result<Option<&'t Template>> {
        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        let selection = Select::new()
            .with_prompt("Select a template")
            .items(&names)
            .default(0)
            .interact_opt()
            .map_err(|e| Error::PromptError(e.to_string()))?;

        Ok(selection.and_then(|index| templates.get(index)))
    }

    fn collect_variables(&self, template: &Template) -> Result<Variables> {
        let mut variables = Variables::new();
        for (key, description) in &template.variables {
            let value = match self.answers.get(key) {
                Some(value) => {
                    debug!("Using preloaded answer for '{key}'");
                    value.clone()
                }
                None => Input::<String>::new()
                    .with_prompt(format_question(description))
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| Error::PromptError(e.to_string()))?,
            };
            variables.insert(key.clone(), value);
        }
        Ok(variables)
    }
}
