//! Wire types for the upstream provider APIs and the relay's client contract.
//!
//! Serialization happens only at the gateway boundary; the relay core works
//! with raw bytes and tagged unions and converts to these types right before
//! the provider call.

pub mod chat;
pub mod generate;
pub mod relaying;
