//! Opportunity validation port.

use async_trait::async_trait;

use crate::domain::Opportunity;

/// Final accept/reject gate between detection and execution.
///
/// Validators never fail: any internal error must resolve to a decision.
#[async_trait]
pub trait OpportunityValidator: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &'static str;

    /// Whether the opportunity should be executed.
    async fn validate(&self, opportunity: &Opportunity) -> bool;
}
