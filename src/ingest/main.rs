//! Gazetteer ingest.
//!
//! Fetches named places for one region from the Overpass API and writes the
//! pipe-delimited gazetteer file the server reads.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Fetch place coordinates for a region into the gazetteer file")]
struct Args {
    /// Region name, matched against admin_level=4 areas (e.g. "Lombardia")
    #[arg(short, long)]
    region: String,

    /// Output gazetteer file
    #[arg(short, long, default_value = "data/locations.txt")]
    output: PathBuf,

    /// Overpass API endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: OverpassTags,
}

#[derive(Debug, Default, Deserialize)]
struct OverpassTags {
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Fetching locations for region: {}", args.region);

    let query = format!(
        r#"[out:json][timeout:50];
area["name"="{}"]["admin_level"="4"]->.region;
(
  node["place"~"city|town|village|hamlet"](area.region);
);
out body;"#,
        args.region
    );

    let client = reqwest::Client::builder()
        .user_agent("Tamarack/0.1 (gazetteer ingest)")
        .timeout(Duration::from_secs(50))
        .build()?;

    let response = client
        .post(&args.endpoint)
        .form(&[("data", query)])
        .send()
        .await
        .context("Overpass request failed")?
        .error_for_status()
        .context("Overpass returned an error status")?;

    let data: OverpassResponse = response
        .json()
        .await
        .context("Failed to parse Overpass response")?;

    info!("Received {} elements", data.elements.len());

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let mut written = 0usize;
    for element in data.elements {
        let (Some(name), Some(lat), Some(lon)) = (element.tags.name, element.lat, element.lon)
        else {
            continue;
        };
        // The gazetteer format has no escaping; such a name could never be
        // loaded back.
        if name.contains('|') {
            warn!("skipping place with '|' in name: {name}");
            continue;
        }
        writeln!(file, "{name}|{lat}|{lon}")?;
        written += 1;
    }

    info!(
        "Saved {} locations to '{}'",
        written,
        args.output.display()
    );

    Ok(())
}
