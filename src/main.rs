use anyhow::Result;
use tictactoe_arcade::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run_cli().await
}
