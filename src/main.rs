//! Salesdash
//!
//! Interactive terminal dashboard. Reads commands from stdin and redraws the
//! text charts after every backend response.
//!
//! ```text
//! sales 6                 predict sales for June
//! segment 25,40000,30     classify a customer (age, income, score)
//! show                    print both charts
//! json                    print the dashboard state as JSON
//! reset                   re-create both charts
//! quit
//! ```

use anyhow::Context;
use clap::Parser;
use salesdash::{logging, ApiClient, Config, Dashboard, TerminalSurface};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "salesdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive sales prediction and customer segmentation dashboard")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prediction backend URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Run the sample update sequence after startup
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if args.demo {
        config.dashboard.demo_on_start = true;
    }

    logging::init_tracing(&config.logging);
    tracing::info!("Salesdash v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Prediction backend: {}", config.api.base_url);

    let client = Arc::new(ApiClient::new(config.api.clone()).context("building HTTP client")?);
    let surface = Box::new(TerminalSurface::new(std::io::stdout()));
    let dashboard = Dashboard::new(client, surface, config.dashboard.clone());
    dashboard.initialize().await;

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => continue,
            "sales" | "s" => {
                let dashboard = dashboard.clone();
                let raw = rest.to_string();
                tokio::spawn(async move {
                    match dashboard.request_sales_prediction(&raw).await {
                        Ok(value) => println!("Predicted sales for month {}: {:.1}", raw.trim(), value),
                        Err(e) => eprintln!("{}", e),
                    }
                });
            }
            "segment" | "g" => {
                let dashboard = dashboard.clone();
                let raw = rest.to_string();
                tokio::spawn(async move {
                    match dashboard.request_customer_segment(&raw).await {
                        Ok(segment) => println!("Customer belongs to segment {}", segment),
                        Err(e) => eprintln!("{}", e),
                    }
                });
            }
            "show" => {
                let state = dashboard.state();
                let state = state.lock().await;
                print!("{}", state.render_text());
                if let Some(status) = state.last_error() {
                    println!("Last error ({}): {}", status.at.format("%H:%M:%S"), status.message);
                }
            }
            "json" => {
                let snapshot = dashboard.snapshot().await;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            "reset" => {
                dashboard.state().lock().await.initialize();
            }
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            other => eprintln!("Unknown command: {} (try 'help')", other),
        }
    }

    tracing::info!("Salesdash stopped");
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  sales <month>            predict sales for a month (1-12)");
    println!("  segment <f1,f2,...>      classify a customer by features");
    println!("  show                     print both charts");
    println!("  json                     print dashboard state as JSON");
    println!("  reset                    re-create both charts");
    println!("  quit");
}
