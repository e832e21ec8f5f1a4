use airport_postcodes::config::Config;
use airport_postcodes::constants;
use airport_postcodes::infra::http_client::ReqwestHttp;
use airport_postcodes::logging;
use airport_postcodes::pipeline::Pipeline;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "airport_postcodes")]
#[command(about = "Collects airport names, coordinates and postal codes into a CSV file")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full scrape and export
    Run {
        /// Destination CSV file (overrides config and AIRPORTS_OUTPUT_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Listing partitions to fetch (comma-separated letters). Default: A-Z
        #[arg(long)]
        partitions: Option<String>,
        /// Config file. Default: config.toml when present
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_partitions(list: Option<String>) -> Vec<String> {
    match list {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => constants::all_partitions(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            output,
            partitions,
            config,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(path) = output {
                config.output.path = path;
            }
            let partitions = parse_partitions(partitions);

            println!("🚀 Collecting airports for partitions {}", partitions.join(","));
            info!("Output will be written to {}", config.output.path.display());

            let http = Arc::new(ReqwestHttp::new(&config.http)?);
            let pipeline = Pipeline::new(config, http);

            match pipeline.run(&partitions).await {
                Ok(result) => {
                    println!("\n📊 Pipeline Results:");
                    println!("   Raw name cells: {}", result.raw_names);
                    println!("   Airports: {}", result.airports);
                    println!("   Coordinates from detail pages: {}", result.coordinates_from_pages);
                    println!("   Coordinates from geocoding: {}", result.coordinates_from_geocoding);
                    println!("   Still without coordinates: {}", result.missing_coordinates);
                    println!("   Postal codes resolved: {}", result.postal_codes_resolved);
                    println!(
                        "   Skipped postal lookup (no coordinates): {}",
                        result.skipped_without_coordinates
                    );
                    println!("   Still without postal code: {}", result.missing_postal_codes);
                    for report in &result.reports {
                        println!(
                            "   [{}] {} ok, {} missed {:?}",
                            report.stage,
                            report.succeeded,
                            report.total_missed(),
                            report.missed
                        );
                    }
                    println!("   Output file: {}", result.output_file.display());
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}
