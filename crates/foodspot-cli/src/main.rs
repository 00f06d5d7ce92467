use clap::{Parser, Subcommand};
use foodspot_geoapify::GeoapifyClient;
use foodspot_search::{FoodSearch, SearchCaches, SearchSettings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "foodspot-cli")]
#[command(about = "Find food places near a coordinate")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search and print the categorized response as JSON
    Search {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = foodspot_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search { lat, lng, pretty } => {
            let client = GeoapifyClient::from_app_config(&config)?;
            let settings = SearchSettings::from_app_config(&config);
            let caches = SearchCaches::new(&settings);
            let search = FoodSearch::new(client, caches, settings);

            let response = search.search(lat, lng).await?;
            tracing::info!(total = response.total_restaurants(), "search finished");

            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{json}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
