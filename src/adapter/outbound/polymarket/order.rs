//! Order placement on the Polymarket CLOB.
//!
//! Requires the `polymarket` feature. Each leg is a limit BUY of the
//! outcome token named in [`OrderRequest::order_ref`].

use std::str::FromStr;
use std::sync::Arc;

use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use polymarket_client_sdk::auth::state::Authenticated;
use polymarket_client_sdk::auth::{Normal, Signer};
use polymarket_client_sdk::clob::types::Side as ClobSide;
use polymarket_client_sdk::clob::{Client, Config as ClobConfig};
use polymarket_client_sdk::types::U256;
use tracing::info;

use crate::domain::{OrderId, Venue};
use crate::error::{ConfigError, ExecutionError, Result};
use crate::infrastructure::config::PolymarketConfig;
use crate::port::{OrderPlacer, OrderRequest};

/// Type alias for the authenticated CLOB client.
type AuthenticatedClient = Client<Authenticated<Normal>>;

/// Places limit orders through an authenticated CLOB session.
pub struct PolymarketOrderPlacer {
    client: Arc<AuthenticatedClient>,
    signer: Arc<PrivateKeySigner>,
}

impl PolymarketOrderPlacer {
    /// Authenticate with the CLOB using `POLY_PRIVATE_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the private key is missing or invalid, or if
    /// CLOB authentication fails.
    pub async fn connect(config: &PolymarketConfig) -> Result<Self> {
        let private_key = config
            .private_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingField {
                field: "POLY_PRIVATE_KEY",
            })?;

        let signer = PrivateKeySigner::from_str(private_key)
            .map_err(|e| ConfigError::InvalidValue {
                field: "POLY_PRIVATE_KEY",
                reason: e.to_string(),
            })?
            .with_chain_id(Some(config.chain_id));

        info!(
            chain_id = config.chain_id,
            address = %signer.address(),
            "Creating CLOB client"
        );

        let client = Client::new(&config.clob_url, ClobConfig::default())
            .map_err(|e| ExecutionError::AuthFailed(format!("Failed to create CLOB client: {e}")))?
            .authentication_builder(&signer)
            .authenticate()
            .await
            .map_err(|e| ExecutionError::AuthFailed(e.to_string()))?;

        info!("CLOB client authenticated");

        Ok(Self {
            client: Arc::new(client),
            signer: Arc::new(signer),
        })
    }
}

#[async_trait]
impl OrderPlacer for PolymarketOrderPlacer {
    fn venue(&self) -> Venue {
        Venue::Polymarket
    }

    async fn place_order(&self, request: &OrderRequest) -> Result<OrderId> {
        let token_id =
            U256::from_str(&request.order_ref).map_err(|e| ExecutionError::InvalidTokenId {
                token_id: request.order_ref.clone(),
                reason: e.to_string(),
            })?;

        // Outcome tokens are bought outright; the leg's side is encoded in
        // which token `order_ref` names.
        let order = self
            .client
            .limit_order()
            .token_id(token_id)
            .side(ClobSide::Buy)
            .price(request.price)
            .size(request.quantity)
            .build()
            .await
            .map_err(|e| ExecutionError::OrderBuildFailed(e.to_string()))?;

        let signed_order = self
            .client
            .sign(self.signer.as_ref(), order)
            .await
            .map_err(|e| ExecutionError::SigningFailed(e.to_string()))?;

        let response = self
            .client
            .post_order(signed_order)
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(e.to_string()))?;

        info!(
            order_id = %response.order_id,
            market = %request.market_ref,
            side = %request.side,
            size = %request.quantity,
            price = %request.price,
            "Polymarket order submitted"
        );

        Ok(OrderId::new(response.order_id))
    }
}
