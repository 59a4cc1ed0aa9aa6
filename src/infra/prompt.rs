//! Interactive configuration prompts via `dialoguer`.

use anyhow::{Context, Result};
use dialoguer::{Input, Password, Select};

use crate::application::ports::Prompter;
use crate::domain::config::{
    DeployConfig, SUGGESTED_MODELS, validate_base_url, validate_model, validate_notebooks_dir,
};

const CUSTOM_MODEL: &str = "(custom)";

/// Terminal prompter. Only constructed when prompts are allowed.
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn prompt(&self, draft: &DeployConfig) -> Result<DeployConfig> {
        println!();
        println!("  Configuration setup");
        println!();

        let api_key = prompt_api_key(&draft.ai.api_key)?;

        let base_url: String = Input::new()
            .with_prompt("AI API base URL")
            .default(draft.ai.base_url.clone())
            .validate_with(|v: &String| validate_base_url(v.trim()).map_err(|e| e.to_string()))
            .interact_text()
            .context("reading base URL")?;

        let model = prompt_model(&draft.ai.model)?;

        let notebooks_dir: String = Input::new()
            .with_prompt("Notebooks directory")
            .default(draft.paths.notebooks_dir.clone())
            .validate_with(|v: &String| {
                validate_notebooks_dir(v.trim()).map_err(|e| e.to_string())
            })
            .interact_text()
            .context("reading notebooks directory")?;

        let mut config = draft.clone();
        config.ai.api_key = api_key;
        config.ai.base_url = base_url.trim().to_string();
        config.ai.model = model;
        config.paths.notebooks_dir = notebooks_dir.trim().to_string();
        Ok(config)
    }
}

/// An empty answer keeps the current key, if there is one.
fn prompt_api_key(current: &str) -> Result<String> {
    let prompt = if current.is_empty() {
        "AI API key"
    } else {
        "AI API key (leave empty to keep the current key)"
    };
    let entered = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(!current.is_empty())
        .interact()
        .context("reading API key")?;
    let entered = entered.trim();
    if entered.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(entered.to_string())
    }
}

fn prompt_model(current: &str) -> Result<String> {
    let mut choices: Vec<String> = SUGGESTED_MODELS.iter().map(ToString::to_string).collect();
    choices.push(CUSTOM_MODEL.to_string());

    let default = SUGGESTED_MODELS
        .iter()
        .position(|m| *m == current)
        .unwrap_or(choices.len() - 1);

    let idx = Select::new()
        .with_prompt("AI model")
        .items(&choices[..])
        .default(default)
        .interact()
        .context("model selection")?;

    if choices[idx] != CUSTOM_MODEL {
        return Ok(choices[idx].clone());
    }

    let mut input = Input::<String>::new()
        .with_prompt("Custom model name")
        .validate_with(|v: &String| validate_model(v.trim()).map_err(|e| e.to_string()));
    if !current.is_empty() && !SUGGESTED_MODELS.contains(&current) {
        input = input.default(current.to_string());
    }
    let model = input.interact_text().context("reading model name")?;
    Ok(model.trim().to_string())
}
