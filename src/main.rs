use std::path::PathBuf;
#[cfg(feature = "dashboard")]
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
#[cfg(feature = "dashboard")]
use tracing::error;
use tracing::info;
#[cfg(not(feature = "dashboard"))]
use tracing::warn;

use crossarb::application::ExecutionMode;
use crossarb::infrastructure::bootstrap::build_context;
use crossarb::infrastructure::config::Config;
use crossarb::infrastructure::orchestrator::Orchestrator;

const DEFAULT_CONFIG: &str = "config.toml";

/// Crossarb - cross-venue prediction market arbitrage.
#[derive(Parser, Debug)]
#[command(name = "crossarb")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file. A missing default file means all defaults.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Execution mode, overriding config and `MODE` (sim or live).
    #[arg(long)]
    mode: Option<ExecutionMode>,

    /// Capital ceiling in USD, overriding config and `CAPITAL_USD`.
    #[arg(long)]
    capital: Option<Decimal>,

    /// Run a single scan cycle and exit.
    #[arg(long)]
    once: bool,

    /// Do not serve the status dashboard.
    #[arg(long)]
    no_dashboard: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = if cli.config.as_os_str() == DEFAULT_CONFIG && !cli.config.exists() {
        Config::parse_toml("")?
    } else {
        Config::load(&cli.config)
            .with_context(|| format!("failed to load {}", cli.config.display()))?
    };

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(capital) = cli.capital {
        config.capital.max_capital_usd = capital;
    }
    if cli.no_dashboard {
        config.dashboard.enabled = false;
    }
    config.validate()?;
    Ok(config)
}

type DashboardHandle = (oneshot::Sender<()>, JoinHandle<()>);

#[cfg(feature = "dashboard")]
fn spawn_dashboard(config: &Config, orchestrator: &Orchestrator) -> Option<DashboardHandle> {
    use crossarb::adapter::inbound::dashboard::{serve, DashboardState};

    if !config.dashboard.enabled {
        return None;
    }

    let context = orchestrator.context();
    let state = DashboardState::new(
        config.mode,
        Arc::clone(context.guard()),
        Arc::clone(context.portfolio()),
    );
    let dashboard = config.dashboard.clone();
    let (stop, stopped) = oneshot::channel();

    let server = tokio::spawn(async move {
        let shutdown = async {
            let _ = stopped.await;
        };
        if let Err(e) = serve(&dashboard, state, shutdown).await {
            error!(error = %e, host = %dashboard.host, port = dashboard.port, "Dashboard failed");
        }
    });
    Some((stop, server))
}

#[cfg(not(feature = "dashboard"))]
fn spawn_dashboard(config: &Config, _orchestrator: &Orchestrator) -> Option<DashboardHandle> {
    if config.dashboard.enabled {
        warn!("Dashboard enabled but the dashboard feature is disabled");
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    config.logging.init();
    info!(mode = %config.mode, "crossarb starting");

    let context = build_context(&config)
        .await
        .context("failed to build application")?;
    let orchestrator = Orchestrator::new(context, config.schedule.interval());

    if cli.once {
        let report = orchestrator.run_once().await;
        info!(
            opportunities = report.opportunities,
            executed = report.executed,
            "Single cycle finished"
        );
    } else {
        let dashboard = spawn_dashboard(&config, &orchestrator);
        orchestrator
            .run_until(async {
                let _ = signal::ctrl_c().await;
            })
            .await;
        if let Some((stop, server)) = dashboard {
            let _ = stop.send(());
            let _ = server.await;
        }
    }

    info!("crossarb stopped");
    Ok(())
}
