use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    slide_layout_cli::run_cli().await
}
