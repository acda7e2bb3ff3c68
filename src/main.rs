use anyhow::{Context, Result};
use clap::Parser;

use tripai::cli::{Cli, Command};
use tripai::config::TripAiConfig;
use tripai::export::{PdfExporter, render_text};
use tripai::map::MapView;
use tripai::models::TripRequest;
use tripai::planner::TripPlanner;
use tripai::{llm, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = TripAiConfig::load_with_demo(cli.config.clone(), cli.demo)?;

    logging::init(&config.logging, cli.verbose)?;

    let client = llm::create_client(&config).context("Failed to create model client")?;
    let planner = TripPlanner::new(client).with_max_days(config.planner.max_days);

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(&config, planner).await
        }
        Command::Plan {
            destination,
            budget,
            days,
            interests,
            pdf,
            json,
        } => {
            let max_days = config.planner.max_days;
            let request = TripRequest::with_limit(&destination, budget, days, interests, max_days)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let itinerary = planner
                .plan(&request)
                .await
                .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?;

            if json {
                let map = MapView::from_itinerary(&itinerary, config.planner.default_tile_layer);
                let out = serde_json::json!({ "itinerary": itinerary, "map": map });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", render_text(&request, &itinerary));
            }

            if let Some(path) = pdf {
                let exporter = PdfExporter::from_config(&config.export)?;
                let bytes = exporter.render(&request, &itinerary)?;
                std::fs::write(&path, bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!("Wrote PDF to {}", path.display());
            }
            Ok(())
        }
    }
}
