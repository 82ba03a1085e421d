//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the identifier is blank.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Venue-side market reference: a Kalshi ticker or a Polymarket condition id.
    MarketRef
);

string_id!(
    /// Order identifier returned by a venue (or synthesized in simulation).
    OrderId
);

string_id!(
    /// Position identifier, derived from the order ids that opened it.
    PositionId
);

impl PositionId {
    /// Derive a position id from the order ids of a confirmed execution.
    #[must_use]
    pub fn from_orders(order_ids: &[OrderId]) -> Self {
        if order_ids.is_empty() {
            return Self::new("unknown");
        }
        let joined: Vec<&str> = order_ids.iter().map(OrderId::as_str).collect();
        Self::new(joined.join("+"))
    }
}
