pub mod output;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::{FormPatch, HttpProductApi, ProductApi, ProductStore, DEFAULT_BASE_URL};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Catalog CLI - browse and manage products through the Catalog API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "CATALOG_API_URL", default_value = DEFAULT_BASE_URL, help = "API base URL")]
    pub server: String,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List all products, newest first")]
    List,

    #[command(about = "Show a single product")]
    Show {
        #[arg(help = "Product ID")]
        id: i32,
    },

    #[command(about = "Add a product")]
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image: String,
        #[arg(long)]
        price: String,
    },

    #[command(about = "Edit a product; omitted fields keep their current value")]
    Edit {
        #[arg(help = "Product ID")]
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        price: Option<String>,
    },

    #[command(about = "Delete a product")]
    Delete {
        #[arg(help = "Product ID")]
        id: i32,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Which slice of the store a command renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Products,
    CurrentProduct,
}

/// Runs one command. Returns `false` when the store ended with its error flag set.
pub async fn run(cli: Cli) -> anyhow::Result<bool> {
    let output_format = OutputFormat::from_cli(&cli);
    let api = HttpProductApi::new(&cli.server)?;
    let mut store = ProductStore::new(api);

    let view = execute(&mut store, cli.command).await;

    output::render(&output_format, &mut store, view)?;
    Ok(store.state().error.is_none())
}

pub async fn execute<A: ProductApi>(store: &mut ProductStore<A>, command: Commands) -> View {
    match command {
        Commands::List => {
            store.fetch_products().await;
            View::Products
        }
        Commands::Show { id } => {
            store.fetch_product(id).await;
            View::CurrentProduct
        }
        Commands::Add { name, image, price } => {
            store.set_form_data(FormPatch {
                name: Some(name),
                image: Some(image),
                price: Some(price),
            });
            store.add_product().await;
            View::Products
        }
        Commands::Edit { id, name, image, price } => {
            store.fetch_product(id).await;
            if store.state().error.is_none() {
                store.set_form_data(FormPatch { name, image, price });
                store.update_product(id).await;
            }
            View::Products
        }
        Commands::Delete { id } => {
            store.fetch_products().await;
            store.delete_product(id).await;
            View::Products
        }
    }
}
