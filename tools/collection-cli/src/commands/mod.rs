//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod facets;

use clap::{Args, Subcommand};

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Collection slug.
    pub slug: String,

    /// Facet filter as `group=value[,value...]`; groups and values may be
    /// given by id, code or name. Repeatable.
    #[arg(short, long = "filter")]
    pub filters: Vec<String>,

    /// Page number (1-based).
    #[arg(short, long)]
    pub page: Option<i64>,

    /// Sort order: title-asc, title-desc, price-asc or price-desc.
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Free-text search term.
    #[arg(short, long)]
    pub q: Option<String>,

    /// Products per page (default from config).
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Arguments for the facets command.
#[derive(Args)]
pub struct FacetsArgs {
    /// Only show the group with this id, code or name.
    #[arg(short, long)]
    pub group: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
