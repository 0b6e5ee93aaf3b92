use listing_normalizer::config::Settings;
use listing_normalizer::pipeline::normalize_rows;
use listing_normalizer::report::{address_counter, flatten_all};
use listing_normalizer::sources;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Listing Normalizer");
    info!("=====================");

    let settings = Settings::from_env()?;
    let source = sources::from_settings(&settings.source);

    info!("Fetching raw rows from {} source...", source.source_name());
    let rows = source.fetch_rows().await?;
    let total = rows.len();

    // Skip-and-log: a bad row never aborts the batch
    let mut listings = Vec::with_capacity(total);
    for outcome in normalize_rows(rows).await {
        match outcome.result {
            Ok(listing) => listings.push(listing),
            Err(e) => warn!(
                "Skipping row {} (id {}): {}",
                outcome.index,
                outcome.id.as_deref().unwrap_or("?"),
                e
            ),
        }
    }

    info!("✅ Normalized {} of {} rows", listings.len(), total);

    let count = address_counter(&listings);
    info!("Address values: {:?}", count);

    let json = serde_json::to_string_pretty(&flatten_all(&listings))?;
    tokio::fs::write(&settings.output_path, json).await?;
    info!("💾 Saved flattened rows to {}", settings.output_path.display());

    Ok(())
}
