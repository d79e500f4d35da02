mod cli;
mod config;
mod coze;
mod error;
mod job;
mod plan;
mod server;
mod service;
mod siliconflow;
mod telemetry;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use cli::{Cli, Command};
use config::AppConfig;
use service::PlanService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // Ctrl-C cancels whatever is running: the server shuts down gracefully,
    // a generation or search stops at its next await point.
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
                cancel.cancel();
            }
        }
    });

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            let port = config.port;
            let service = PlanService::new(config).context("building HTTP clients")?;
            server::serve(service, port, cancel).await?;
        }
        Command::Generate { tags, json } => {
            let service = PlanService::new(config).context("building HTTP clients")?;
            if json {
                let plans = service.generate_plans(tags, &cancel).await?;
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                let progress = ui::GenerationProgress::start();
                match service.generate_plans(tags, &cancel).await {
                    Ok(plans) => {
                        progress.finish(plans.len());
                        ui::print_plans(&plans);
                    }
                    Err(e) => {
                        progress.fail(&e.user_message());
                        return Err(e.into());
                    }
                }
            }
        }
        Command::Search { tags } => {
            let service = PlanService::new(config).context("building HTTP clients")?;
            let outcome = service.search(tags, &cancel).await?;
            println!("{}", outcome.search_results);
        }
    }

    Ok(())
}
