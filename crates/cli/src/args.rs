use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use domain::models::EntityKind;
use services::services::export::ExportFormat;

/// Yuntas admin - manage blogs, products, leads and users from the terminal
#[derive(Parser, Debug)]
#[command(name = "yuntas", version, long_about = None)]
pub struct Cli {
    /// Configuration file (default: <config_dir>/yuntas/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "YUNTAS_API_URL", global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token; overrides the stored session for this run
    #[arg(long, env = "YUNTAS_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Blog posts
    Blogs {
        #[command(subcommand)]
        action: BlogAction,
    },
    /// Product catalogue
    Productos {
        #[command(subcommand)]
        action: ProductoAction,
    },
    /// Leads captured by the contact forms
    Clientes {
        #[command(subcommand)]
        action: ClienteAction,
    },
    /// Admin users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Ranked title suggestions for a search query
    Suggest { entity: EntityKind, query: String },
    /// Export the loaded collection
    Export(ExportArgs),
    /// Stored bearer token
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// UI preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Case-insensitive filter on the title/name
    #[arg(long, short)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum BlogAction {
    List(ListArgs),
    Show { id: i64 },
    Delete { id: i64 },
    Create(BlogArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BlogArgs {
    #[arg(long)]
    pub producto_id: Option<i64>,
    #[arg(long)]
    pub subtitulo: String,
    #[arg(long, value_name = "FILE")]
    pub imagen_principal: PathBuf,
    /// Repeat for each paragraph, in order
    #[arg(long = "parrafo", required = true)]
    pub parrafos: Vec<String>,
    /// Repeat for each gallery image
    #[arg(long = "imagen", value_name = "FILE")]
    pub imagenes: Vec<PathBuf>,
    /// Alt text of each `--imagen`, in the same order
    #[arg(long = "alt")]
    pub alts: Vec<String>,
    #[arg(long, default_value = "")]
    pub meta_titulo: String,
    #[arg(long, default_value = "")]
    pub meta_descripcion: String,
}

#[derive(Subcommand, Debug)]
pub enum ProductoAction {
    List(ListArgs),
    Show { id: i64 },
    Delete { id: i64 },
    /// Upload one more image for a product
    AddImage {
        id: i64,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
        #[arg(long, default_value = "")]
        alt: String,
    },
    RemoveImage { id: i64, image_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ClienteAction {
    List(ListArgs),
    Show { id: i64 },
    Delete { id: i64 },
    Create(ClienteArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ClienteArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ClienteArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub celular: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub producto_id: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    List(ListArgs),
    Show { id: i64 },
    Delete { id: i64 },
    Create(UserArgs),
    Update {
        id: i64,
        #[command(flatten)]
        fields: UserArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct UserArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Required when creating; leave out to keep the current one
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub celular: Option<String>,
    #[arg(long = "role")]
    pub roles: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    pub entity: EntityKind,

    #[arg(long, short)]
    pub format: ExportFormat,

    /// Directory for CSV files (default: [export] output_dir, then Downloads)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Page to export for server-paged collections
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    SetToken {
        #[arg(value_name = "TOKEN")]
        value: String,
    },
    Clear,
    Status,
}

#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Show or change the dark mode preference
    DarkMode { value: Option<Switch> },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
    Toggle,
}
