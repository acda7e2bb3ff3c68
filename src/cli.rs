//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "tripai",
    version,
    about = "Personalized AI trip planner: day-by-day itineraries, maps and PDF exports"
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use the canned demo itinerary instead of the model API
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the web planner
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Generate one itinerary and print it
    Plan {
        #[arg(short, long)]
        destination: String,
        #[arg(short, long, default_value_t = 1000.0)]
        budget: f64,
        #[arg(long, default_value_t = 3)]
        days: u32,
        /// Repeat for several interests
        #[arg(short, long = "interest")]
        interests: Vec<String>,
        /// Also write the itinerary as a PDF
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Print the itinerary and map as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
