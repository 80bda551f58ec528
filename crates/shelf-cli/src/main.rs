use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelf_application::ProductService;
use shelf_client::ApiClient;
use shelf_core::config::ApiConfig;
use shelf_core::session::MemorySession;

mod commands;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf CLI - product inventory administration", long_about = None)]
struct Cli {
    /// Override the API base URL (default: SHELF_API_URL or the local dev endpoint)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print a bearer token
    Login { username: String, password: String },
    /// List products, optionally filtered by a search term
    List {
        /// Case-insensitive filter over name, description and tags
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a single product
    Show { id: String },
    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Repeat for each tag
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        price: f64,
    },
    /// Update an existing product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replaces the full tag set when given
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Delete a product
    Delete { id: String },
    /// Suggest tags for a draft product
    SuggestTags {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Show inventory statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.api_url {
        Some(url) => ApiConfig::new(url.clone()),
        None => ApiConfig::load(),
    };
    let client = Arc::new(ApiClient::new(&config));

    let session = Arc::new(match std::env::var("SHELF_TOKEN") {
        Ok(token) if !token.trim().is_empty() => MemorySession::with_token(token),
        _ => MemorySession::new(),
    });
    let service = ProductService::new(client.clone(), session);

    match cli.command {
        Commands::Login { username, password } => {
            commands::login::run(client.as_ref(), &username, &password).await
        }
        Commands::List { search } => commands::products::list(&service, search.as_deref()).await,
        Commands::Show { id } => commands::products::show(&service, &id).await,
        Commands::Create {
            name,
            description,
            tags,
            price,
        } => commands::products::create(&service, name, description, tags, price).await,
        Commands::Update {
            id,
            name,
            description,
            tags,
            price,
        } => commands::products::update(&service, &id, name, description, tags, price).await,
        Commands::Delete { id } => commands::products::delete(&service, &id).await,
        Commands::SuggestTags { name, description } => {
            commands::products::suggest(&service, &name, &description).await
        }
        Commands::Stats => commands::stats::run(&service).await,
    }
}
