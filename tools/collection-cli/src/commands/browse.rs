//! Collection browsing command.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use turbo_catalog::search::{FilterState, QueryParams, SortState, PAGE_PARAM, SORT_PARAM, TERM_PARAM};
use turbo_collection::{CollectionEngine, CollectionView, MemoryRouter};
use turbo_data::GraphqlClient;

use super::BrowseArgs;
use crate::context::Context;
use crate::output::{brand_badge, truncate};

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let query = browse_query(&args)?;
    let path = format!("/collections/{}", args.slug);
    ctx.output.debug(&format!("GET {}?{}", path, query));

    let mut config = ctx.config.collection_config(&args.slug);
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }

    let api = GraphqlClient::new(ctx.config.api.clone()).context("Failed to create API client")?;
    let router = Arc::new(MemoryRouter::new(path, &query.to_query_string()));
    let engine = CollectionEngine::new(config, Arc::new(api), router.clone());

    let spinner = ctx.output.spinner(&format!("Searching {}", args.slug));
    engine.init().await;
    spinner.set_message("Resolving brands");
    engine.settle().await;
    spinner.finish_and_clear();

    let view = engine.view();
    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    print_view(&view, ctx);
    ctx.output.debug(&format!("url: {}", router.url()));

    Ok(())
}

/// Build the page URL query the storefront would see for these arguments.
fn browse_query(args: &BrowseArgs) -> Result<QueryParams> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for arg in &args.filters {
        let (group, values) = FilterState::parse_arg(arg)?;
        let entry = groups.entry(group.into_inner()).or_default();
        for value in values {
            let value = value.into_inner();
            if !entry.contains(&value) {
                entry.push(value);
            }
        }
    }

    let mut query: QueryParams = groups
        .into_iter()
        .map(|(group, values)| (group, values.join(",")))
        .collect();

    if let Some(page) = args.page {
        query.set(PAGE_PARAM, page.to_string());
    }
    if let Some(sort) = &args.sort {
        let sort: SortState = sort.parse()?;
        query.set(SORT_PARAM, sort.as_param());
    }
    if let Some(term) = args.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        query.set(TERM_PARAM, term);
    }

    Ok(query)
}

fn print_view(view: &CollectionView, ctx: &Context) {
    let pagination = &view.pagination_info;

    ctx.output.header(&format!(
        "Products {}-{} of {} (page {} of {}, {})",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total_products,
        pagination.current_page,
        pagination.total_pages.max(1),
        view.sort.display_name(),
    ));

    if view.products.is_empty() {
        ctx.output.warn("No products match.");
    } else {
        let widths = [32, 20, 24];
        ctx.output.table_row(&["NAME", "PRICE", "BRAND"], &widths);
        for product in &view.products {
            let item = &product.product;
            ctx.output.table_row(
                &[
                    &truncate(&item.product_name, widths[0]),
                    &item.price_with_tax.display(&item.currency_code),
                    &brand_badge(&product.brand),
                ],
                &widths,
            );
        }
    }

    if !view.facet_values.is_empty() {
        ctx.output.header("Facets");
        for group in &view.facet_values {
            let values: Vec<String> = group
                .values
                .iter()
                .map(|v| {
                    let marker = if view.filters.is_selected(&group.id, &v.id) { "*" } else { "" };
                    format!("{}{} ({})", marker, v.name, v.count)
                })
                .collect();
            ctx.output.kv(&group.name, &values.join(", "));
        }
    }

    if pagination.total_pages > 1 {
        let pages: Vec<String> = pagination
            .page_numbers(7)
            .into_iter()
            .map(|p| {
                if p == pagination.current_page {
                    format!("[{}]", p)
                } else {
                    p.to_string()
                }
            })
            .collect();
        ctx.output.info(&format!("Pages: {}", pages.join(" ")));
    }
}
