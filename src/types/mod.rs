//! Core value types shared across the SDK.

pub mod amount;

pub use alloy_primitives::Address;
pub use amount::{BalanceDelta, TOKEN_DECIMALS, TokenAmount};
