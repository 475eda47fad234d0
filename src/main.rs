use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    lowview::cli::run().await
}
