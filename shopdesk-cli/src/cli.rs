//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shopdesk_lib::api::Resource;

#[derive(Parser)]
#[command(
    name = "shopdesk",
    version,
    about = "Shop back-office from the terminal",
    long_about = "Browse back-office resources through the same grid controller the admin \
                  screens use, and maintain the grid layout preferences and form drafts it \
                  stores."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level instead of info.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preferences database (defaults to the platform data directory).
    #[arg(long, env = "SHOPDESK_PREFS_DB", global = true, value_name = "PATH")]
    pub prefs_db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch and display one page of a resource.
    List(ListArgs),

    /// Inspect or edit stored grid preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// Manage stored form drafts.
    #[command(subcommand)]
    Drafts(DraftsCommand),
}

#[derive(Args)]
pub struct ApiArgs {
    /// API base URL.
    #[arg(long, env = "SHOPDESK_API_URL", value_name = "URL")]
    pub api_url: String,

    /// Session token sent as a bearer credential.
    #[arg(long, env = "SHOPDESK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

#[derive(Args)]
pub struct ListArgs {
    /// products, categories, banners, offers, orders or users.
    pub resource: Resource,

    /// Grid whose stored preferences apply (defaults to the resource name).
    #[arg(long)]
    pub grid_id: Option<String>,

    /// Page number, starting at 1.
    #[arg(long)]
    pub page: Option<u32>,

    /// Rows per page; must be one of the grid's page size options.
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort as `field` or `field:asc|desc`.
    #[arg(long, value_name = "FIELD[:DIR]")]
    pub sort: Option<String>,

    /// Filter as `field:operator:value`. Repeatable.
    #[arg(long = "filter", value_name = "FIELD:OP:VALUE")]
    pub filters: Vec<String>,

    /// Free-text quick filter.
    #[arg(long)]
    pub search: Option<String>,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Subcommand)]
pub enum PrefsCommand {
    /// List stored keys.
    List {
        /// Only keys starting with this prefix.
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Show a grid's stored page size, widths and visibility.
    Show { grid_id: String },
    /// Store a column width.
    Resize {
        grid_id: String,
        field: String,
        width: u32,
    },
    /// Hide a column.
    Hide { grid_id: String, field: String },
    /// Show a hidden column.
    Unhide { grid_id: String, field: String },
    /// Remove all stored preferences of a grid.
    Reset { grid_id: String },
}

#[derive(Subcommand)]
pub enum DraftsCommand {
    /// Print a stored draft.
    Show { key: String },
    /// Remove a stored draft.
    Clear { key: String },
}
