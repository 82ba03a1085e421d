//! Mock [`OrderPlacer`] for testing.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{OrderId, Venue};
use crate::error::{Error, ExecutionError, Result};
use crate::port::{OrderPlacer, OrderRequest};

/// Outcome of one scripted order.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Accept(String),
    Reject(String),
    Hang(Duration),
}

/// An order placer that records every request and answers from a script.
///
/// When the script is exhausted, orders are accepted with generated ids
/// (`<venue>-<n>`).
pub struct ScriptedOrderPlacer {
    venue: Venue,
    script: Mutex<VecDeque<ScriptedOutcome>>,
    requests: Mutex<Vec<OrderRequest>>,
}

impl ScriptedOrderPlacer {
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Accept every order.
    pub fn accepting(venue: Venue) -> Self {
        Self::new(venue)
    }

    /// Reject the first order with `reason`, accept the rest.
    pub fn rejecting(venue: Venue, reason: &str) -> Self {
        Self::new(venue).then(ScriptedOutcome::Reject(reason.to_string()))
    }

    /// Append an outcome to the script.
    pub fn then(self, outcome: ScriptedOutcome) -> Self {
        self.script.lock().push_back(outcome);
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<OrderRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl OrderPlacer for ScriptedOrderPlacer {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderId> {
        let n = {
            let mut requests = self.requests.lock();
            requests.push(order.clone());
            requests.len()
        };
        let outcome = self.script.lock().pop_front();

        match outcome {
            None => Ok(OrderId::new(format!("{}-{n}", self.venue))),
            Some(ScriptedOutcome::Accept(id)) => Ok(OrderId::new(id)),
            Some(ScriptedOutcome::Reject(reason)) => {
                Err(Error::Execution(ExecutionError::OrderRejected(reason)))
            }
            Some(ScriptedOutcome::Hang(duration)) => {
                tokio::time::sleep(duration).await;
                Ok(OrderId::new(format!("{}-late-{n}", self.venue)))
            }
        }
    }
}
