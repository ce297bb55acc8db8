use anyhow::Context;
use clap::Parser;
use microgrid_api::{config::MicrogridConfig, create_app};
use std::path::PathBuf;

/// Command line arguments for the microgrid estimator server
#[derive(Parser, Debug)]
#[command(name = "microgrid-estimator")]
#[command(about = "Microgrid steady-state power balance estimator")]
struct Args {
    /// Path to the microgrid configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    port: u16,
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<MicrogridConfig> {
    let Some(path) = path else {
        tracing::info!("No config file given, using the default microgrid");
        return Ok(MicrogridConfig::default());
    };

    let config_content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let config: MicrogridConfig = serde_json::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

    tracing::info!(
        "Loaded microgrid config from {}: {} inverters",
        path.display(),
        config.inverters.len()
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt().pretty().init();

    let config = load_config(args.config.as_ref()).await?;
    let app_state = config
        .into_state()
        .context("Invalid microgrid configuration")?;

    let grid = app_state.grid_state();
    tracing::info!(
        "Initial grid state: {:.3} Hz, {:.2} V, {:.0} W, {:.0} VAR",
        grid.frequency,
        grid.voltage,
        grid.total_real_power,
        grid.total_reactive_power
    );

    // Build our application with routes
    let app = create_app(app_state);

    let bind_addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
