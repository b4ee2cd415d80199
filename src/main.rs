use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    teensybrew::cli::run().await
}
