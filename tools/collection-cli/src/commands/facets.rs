//! Facet catalogue command.

use anyhow::{bail, Context as _, Result};
use turbo_catalog::facets::FacetCatalog;
use turbo_data::{CommerceApi, GraphqlClient};

use super::FacetsArgs;
use crate::context::Context;

/// Run the facets command.
pub async fn run(args: FacetsArgs, ctx: &Context) -> Result<()> {
    let client = GraphqlClient::new(ctx.config.api.clone()).context("Failed to create API client")?;

    let spinner = ctx.output.spinner("Loading facets");
    let groups = client.facets().await;
    spinner.finish_and_clear();
    let catalog = FacetCatalog::new(groups.context("Failed to load facets")?);

    let groups = match &args.group {
        Some(key) => match catalog.resolve_group(key) {
            Some(group) => vec![group.clone()],
            None => bail!("Unknown facet group: {}", key),
        },
        None => catalog.groups().to_vec(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&groups);
        return Ok(());
    }

    if groups.is_empty() {
        ctx.output.info("No facets defined.");
        return Ok(());
    }

    for group in &groups {
        ctx.output.header(&format!("{} ({}, id {})", group.name, group.code, group.id));
        for value in &group.values {
            ctx.output.list_item(&format!("{} ({}, id {})", value.name, value.code, value.id));
        }
    }

    Ok(())
}
