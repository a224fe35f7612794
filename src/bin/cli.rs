//! Salesdash CLI
//!
//! One-shot access to the prediction backend:
//! - Predict sales for a month
//! - Classify a customer by features
//! - Generate a default config file

use clap::{Parser, Subcommand};
use salesdash::config::generate_default_config;
use salesdash::{logging, parse_features, parse_month, AnalyticsApi, ApiClient, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "salesdash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query the sales prediction backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Prediction backend URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict sales for a month
    Predict {
        /// Month number (1-12)
        month: String,
    },

    /// Find the segment of a customer
    Segment {
        /// Comma-separated features, e.g. "25,40000,30" (age, income, spending score)
        features: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_default()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    logging::init_tracing(&config.logging);

    match cli.command {
        Commands::Predict { month } => {
            let month = parse_month(&month)?;
            let client = ApiClient::new(config.api.clone())?;
            let prediction = client.predict_sales(month).await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&prediction)?),
                _ => match prediction.value() {
                    Some(value) => println!("Predicted sales for month {}: {:.1}", month, value),
                    None => anyhow::bail!("backend returned no predicted value"),
                },
            }
        }

        Commands::Segment { features } => {
            let features = parse_features(&features)?;
            let client = ApiClient::new(config.api.clone())?;
            let segment = client.segment_customers(&features).await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&segment)?),
                _ => println!("Customer belongs to segment {}", segment.customer_segment),
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Wrote default config to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}
