//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = &ctx.config.api;
    ctx.output.info("");
    ctx.output.info("[api]");
    ctx.output.kv("endpoint", &api.endpoint);
    ctx.output.kv("channel_header", &api.channel_header);
    if api.channel_token.is_some() {
        ctx.output.kv("channel_token", "(set)");
    }
    if let Some(locale) = &api.locale {
        ctx.output.kv("locale", locale);
    }
    if let Some(ms) = api.timeout_ms {
        ctx.output.kv("timeout_ms", &ms.to_string());
    }
    if let Some(retries) = api.max_retries {
        ctx.output.kv("max_retries", &retries.to_string());
    }

    let collection = &ctx.config.collection;
    ctx.output.info("");
    ctx.output.info("[collection]");
    ctx.output.kv("page_size", &collection.page_size.to_string());
    ctx.output.kv(
        "enrichment_concurrency",
        &collection.enrichment_concurrency.to_string(),
    );

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
