//! Read-only status dashboard.
//!
//! | Route     | Response                                   |
//! |-----------|--------------------------------------------|
//! | `/`       | HTML page with mode, capital and P&L       |
//! | `/status` | The same figures as JSON                   |
//! | `/health` | `{"status": "ok"}`                         |
//!
//! Handlers only read the capital guard and the portfolio; nothing here can
//! place orders or move capital.

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

use crate::application::{CapitalGuard, ExecutionMode, PortfolioTracker};
use crate::domain::Usd;
use crate::error::Result;
use crate::infrastructure::config::DashboardConfig;

/// Shared handles the handlers read from.
#[derive(Clone)]
pub struct DashboardState {
    mode: ExecutionMode,
    guard: Arc<CapitalGuard>,
    portfolio: Arc<PortfolioTracker>,
}

impl DashboardState {
    #[must_use]
    pub fn new(
        mode: ExecutionMode,
        guard: Arc<CapitalGuard>,
        portfolio: Arc<PortfolioTracker>,
    ) -> Self {
        Self {
            mode,
            guard,
            portfolio,
        }
    }

    /// Current figures, read under the guard and portfolio locks.
    #[must_use]
    pub fn status(&self) -> StatusView {
        let pnl = self.portfolio.snapshot();
        StatusView {
            mode: self.mode.to_string(),
            max_capital_usd: self.guard.max_capital(),
            allocated_usd: self.guard.used(),
            free_usd: self.guard.free_capital(),
            open_positions: pnl.open_positions,
            realized_pnl: pnl.realized_pnl,
            unrealized_pnl: pnl.unrealized_pnl,
            fees_paid: pnl.fees_paid,
            total_pnl: pnl.total_pnl,
            taken_at: pnl.taken_at,
        }
    }
}

/// Body of `/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub mode: String,
    pub max_capital_usd: Usd,
    pub allocated_usd: Usd,
    pub free_usd: Usd,
    pub open_positions: usize,
    pub realized_pnl: Usd,
    pub unrealized_pnl: Usd,
    pub fees_paid: Usd,
    pub total_pnl: Usd,
    pub taken_at: DateTime<Utc>,
}

/// Build the dashboard routes.
pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/status", get(status))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind `config.host:config.port` and serve until `shutdown` resolves.
///
/// # Errors
///
/// Returns an IO error if the address cannot be bound.
pub async fn serve<F>(config: &DashboardConfig, state: DashboardState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    serve_on(listener, state, shutdown).await
}

/// Serve on an already bound listener.
///
/// # Errors
///
/// Returns an IO error if the server fails.
pub async fn serve_on<F>(listener: TcpListener, state: DashboardState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = ?listener.local_addr().ok(), "Dashboard listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Dashboard stopped");
    Ok(())
}

async fn index(State(state): State<DashboardState>) -> Html<String> {
    Html(render_html(&state.status()))
}

async fn status(State(state): State<DashboardState>) -> Json<StatusView> {
    Json(state.status())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Render the status page.
#[must_use]
pub fn render_html(view: &StatusView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="10">
<title>crossarb</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 2rem; background: #0f0f12; color: #e0e0e0; }}
h1 {{ color: #00d4aa; }}
.card {{ background: #1a1a1f; padding: 1.5rem; border-radius: 8px; margin: 1rem 0; }}
</style>
</head>
<body>
<h1>crossarb</h1>
<div class="card">
<p>Mode: {mode}</p>
<p>Capital: {capital}</p>
<p>Allocated: {allocated}</p>
<p>Free: {free}</p>
<p>Open positions: {open}</p>
<p>P&amp;L: {pnl}</p>
</div>
<p><small>Updated {taken_at}</small></p>
</body>
</html>
"#,
        mode = view.mode.to_uppercase(),
        capital = usd(view.max_capital_usd),
        allocated = usd(view.allocated_usd),
        free = usd(view.free_usd),
        open = view.open_positions,
        pnl = usd(view.total_pnl),
        taken_at = view.taken_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

fn usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
