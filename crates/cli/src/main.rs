use std::sync::Arc;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    portico_config::GatewayConfig,
    portico_gateway::{groups::RouteGroups, lifecycle, server},
    portico_services::{Cache, NoopCache},
};

#[derive(Parser)]
#[command(name = "portico", about = "Portico — AI agent platform gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server.
    Gateway {
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "portico starting");

    match cli.command {
        Commands::Gateway { bind, port } => {
            let config = Arc::new(GatewayConfig::from_env()?);

            // Route groups plug in their own implementations here; the
            // shell runs with no-op groups until they do.
            let groups = RouteGroups::noop();
            let cache: Option<Arc<dyn Cache>> = config
                .cache_url
                .as_ref()
                .map(|_| Arc::new(NoopCache) as Arc<dyn Cache>);

            let resources = lifecycle::startup(Arc::clone(&config), &groups, cache).await?;
            server::serve(&bind, port, resources, &groups).await
        },
    }
}
