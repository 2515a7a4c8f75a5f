//! Interactive operator prompts via `dialoguer`.

use anyhow::{Context, Result};

use crate::application::ports::Prompter;
use crate::domain::InputField;

/// Terminal prompter. The credential is read without echo.
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn ask(&self, field: InputField) -> Result<String> {
        let prompt = match field.default_value() {
            Some(default) => format!("{} (default: {default})", field.prompt()),
            None => field.prompt().to_string(),
        };
        if field.is_secret() {
            return dialoguer::Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
                .with_context(|| format!("reading {}", field.prompt()));
        }
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("reading {}", field.prompt()))
    }
}
