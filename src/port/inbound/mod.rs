//! Inbound (driving) ports consumed by the scan cycle.
//!
//! - [`validator`]: accept/reject decision for detected opportunities

pub mod validator;
