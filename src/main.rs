use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use actions_check::{
    descriptor, init_telemetry, ActionPlugin, ActionsCheckExecutor, HttpStepReporter,
    PluginConfig, PluginServer,
};

#[derive(Parser)]
#[command(name = "actions-check")]
#[command(about = "Flow action check plugin for the workflow runner")]
#[command(
    long_about = "Serves the Actions Check action over the runner's plugin protocol. \
                  The host launches this binary with the magic cookie in the environment, \
                  reads the discovery line from stdout and drives the plugin over RPC."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the plugin protocol (what the host runs)
    Serve,
    /// Print the plugin descriptor as JSON for registration tooling
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let _ = PluginConfig::load_env_file();
            init_telemetry()?;
            let config = PluginConfig::load()?;

            let executor = ActionsCheckExecutor::new(HttpStepReporter::new());
            let plugin: Arc<dyn ActionPlugin> = Arc::new(executor);
            let server = PluginServer::new(config.handshake, plugin);
            server.serve(&config.listen.addr).await?;
        }
        Commands::Info => {
            println!("{}", serde_json::to_string_pretty(&descriptor())?);
        }
    }

    Ok(())
}
