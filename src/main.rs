use anyhow::{anyhow, Result};
use habu::integration::{HabuConfig, Orchestrator};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habu=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Habu");

    let config = HabuConfig::from_env().map_err(|e| {
        error!("{}", e);
        anyhow!(e.user_message())
    })?;

    let (mut orchestrator, controller) = Orchestrator::new(&config)?;

    habu::ui::run(controller).map_err(|e| anyhow!("UI error: {}", e))?;

    orchestrator.join();
    info!("Habu stopped");
    Ok(())
}
