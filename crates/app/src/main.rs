use presupuesto_client::{Client, Planner};

use crate::error::Result;

mod commands;
mod config;
mod editor;
mod error;
mod table;
mod toast;

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "presupuesto={level},presupuesto_client={level},engine={level}",
            level = settings.level
        ))
        .init();

    let client = Client::new(&settings.base_url)?;
    tracing::debug!(
        "budget {} from {} (invalid cells: {:?})",
        settings.year,
        client.base_url(),
        settings.invalid_cells
    );

    let mut planner = Planner::new(
        client,
        toast::Terminal,
        settings.year,
        settings.invalid_cells,
        settings.download_dir,
    );

    commands::run(&mut planner, command).await
}
