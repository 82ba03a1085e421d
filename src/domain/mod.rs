//! Venue-agnostic domain types and pure logic.

pub mod error;
pub mod fee;
pub mod id;
pub mod market;
pub mod money;
pub mod opportunity;
pub mod position;
pub mod similarity;
pub mod venue;

pub use error::DomainError;
pub use fee::FeeSchedule;
pub use id::{MarketRef, OrderId, PositionId};
pub use market::Market;
pub use money::{Price, Usd};
pub use opportunity::{
    CrossVenuePair, LegTarget, Opportunity, OpportunityDetails, OpportunityKind, OpportunityLeg,
};
pub use position::{PnlSnapshot, Position, PositionStatus};
pub use similarity::SimilarityMatcher;
pub use venue::{Side, Venue};
