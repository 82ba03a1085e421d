//! Composition root.
//!
//! Turns a validated [`Config`] into a fully wired [`AppContext`]. Missing
//! credentials never fail the build: the affected feature is disabled and a
//! warning is logged.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::adapter::outbound::kalshi::{KalshiAuth, KalshiClient};
use crate::adapter::outbound::llm::OpenAi;
use crate::adapter::outbound::notifier::discord::{DiscordConfig, DiscordNotifier};
use crate::adapter::outbound::notifier::format::AlertFilter;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::notifier::{LogNotifier, NotifierRegistry};
use crate::adapter::outbound::polymarket::GammaClient;
use crate::application::{
    AppContext, BalanceSnapshot, CapitalGuard, CycleSettings, Executor, LlmValidator, PortfolioTracker,
    RuleBasedValidator, Scanner,
};
use crate::domain::Venue;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{OpportunityValidator, OrderPlacer};

/// Build every service and adapter named by `config`.
///
/// # Errors
///
/// Returns an error only for malformed endpoint configuration.
pub async fn build_context(config: &Config) -> Result<AppContext> {
    let guard = Arc::new(CapitalGuard::new(config.capital.max_capital_usd));
    let portfolio = Arc::new(PortfolioTracker::new(Arc::clone(&guard)));

    let polymarket = Arc::new(GammaClient::from_config(&config.polymarket));
    let kalshi = Arc::new(KalshiClient::new(&config.kalshi, kalshi_auth(config))?);

    let mut executor = Executor::new(Arc::clone(&guard), config.mode)
        .with_order_timeout(config.schedule.order_timeout());
    if config.mode.is_live() {
        for placer in build_order_placers(config, &kalshi).await {
            executor = executor.with_placer(placer);
        }
        for venue in [Venue::Polymarket, Venue::Kalshi] {
            if !executor.has_placer(venue) {
                warn!(venue = %venue, "Live mode without credentials; executions will be refused");
            }
        }
        reconcile_balance(&guard, &kalshi).await;
    }

    let scanner = Scanner::new(config.scanner.clone(), config.fees);
    let validator = build_validator(config);
    let notifier = Arc::new(build_notifier_registry(config));

    let settings = CycleSettings {
        max_position_pct: config.capital.max_position_pct,
        fetch_timeout: config.schedule.fetch_timeout(),
    };

    info!(
        mode = %config.mode,
        max_capital = %config.capital.max_capital_usd,
        max_position_pct = %config.capital.max_position_pct,
        min_profit_pct = %config.scanner.min_profit_pct,
        validator = validator.name(),
        notifiers = notifier.len(),
        "Application context built"
    );

    Ok(AppContext::new(
        polymarket,
        kalshi,
        scanner,
        validator,
        guard,
        executor,
        portfolio,
        notifier,
        settings,
    ))
}

/// LLM validator when an OpenAI key is configured, otherwise the rule.
#[must_use]
pub fn build_validator(config: &Config) -> Arc<dyn OpportunityValidator> {
    let rule = RuleBasedValidator::new(config.scanner.min_profit_pct);

    if !config.llm.is_enabled() {
        info!("OPENAI_API_KEY not set, using rule-based validation");
        return Arc::new(rule);
    }

    match OpenAi::from_config(&config.llm) {
        Ok(client) => {
            info!(model = %config.llm.model, "LLM validation enabled");
            Arc::new(
                LlmValidator::new(Arc::new(client), rule)
                    .with_timeout(std::time::Duration::from_secs(config.llm.timeout_secs)),
            )
        }
        Err(e) => {
            warn!(error = %e, "Failed to create LLM client, using rule-based validation");
            Arc::new(rule)
        }
    }
}

/// Log notifier plus every alert channel with credentials.
#[must_use]
pub fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    let filter = AlertFilter {
        notify_opportunities: config.alerts.notify_opportunities,
        notify_executions: config.alerts.notify_executions,
    };

    #[cfg(feature = "telegram")]
    if let (Some(token), Some(chat_id)) = (
        config.alerts.telegram_token.as_ref(),
        config.alerts.telegram_chat_id,
    ) {
        registry.register(Box::new(TelegramNotifier::new(TelegramConfig {
            bot_token: token.clone(),
            chat_id,
            filter,
        })));
        info!("Telegram notifier enabled");
    }

    #[cfg(not(feature = "telegram"))]
    if config.alerts.telegram_token.is_some() {
        warn!("TELEGRAM_TOKEN set but the telegram feature is disabled");
    }

    if let Some(webhook_url) = config.alerts.discord_webhook.as_ref() {
        registry.register(Box::new(DiscordNotifier::new(DiscordConfig {
            webhook_url: webhook_url.clone(),
            filter,
        })));
        info!("Discord notifier enabled");
    }

    registry
}

/// Record venue balances on the guard so admission also checks real funds.
///
/// Only Kalshi reports a balance; Polymarket collateral lives on-chain.
pub async fn reconcile_balance(guard: &CapitalGuard, kalshi: &KalshiClient) {
    if !kalshi.is_authenticated() {
        return;
    }

    match kalshi.get_balance().await {
        Ok(balance) => {
            let snapshot =
                BalanceSnapshot::from_venues(HashMap::from([(Venue::Kalshi, balance)]), Utc::now());
            info!(total = %snapshot.total_usd, "Venue balances reconciled");
            guard.set_balance_snapshot(snapshot);
        }
        Err(e) => warn!(error = %e, "Balance reconciliation failed, using configured capital only"),
    }
}

fn kalshi_auth(config: &Config) -> Option<KalshiAuth> {
    let (Some(key), Some(secret)) = (
        config.kalshi.api_key.as_deref(),
        config.kalshi.api_secret.as_deref(),
    ) else {
        return None;
    };

    match KalshiAuth::from_secret(key, secret) {
        Ok(auth) => Some(auth),
        Err(e) => {
            warn!(error = %e, "Invalid Kalshi credentials, requests will be unsigned");
            None
        }
    }
}

async fn build_order_placers(
    config: &Config,
    kalshi: &Arc<KalshiClient>,
) -> Vec<Arc<dyn OrderPlacer>> {
    let mut placers: Vec<Arc<dyn OrderPlacer>> = Vec::new();

    if kalshi.is_authenticated() {
        placers.push(Arc::clone(kalshi) as Arc<dyn OrderPlacer>);
    }

    #[cfg(feature = "polymarket")]
    if config.polymarket.has_credentials() {
        use crate::adapter::outbound::polymarket::PolymarketOrderPlacer;

        match PolymarketOrderPlacer::connect(&config.polymarket).await {
            Ok(placer) => placers.push(Arc::new(placer)),
            Err(e) => warn!(error = %e, "Polymarket order placement unavailable"),
        }
    }

    #[cfg(not(feature = "polymarket"))]
    if config.polymarket.has_credentials() {
        warn!("POLY_PRIVATE_KEY set but the polymarket feature is disabled");
    }

    placers
}
