//! Relay core: request handling, prompt assembly, session bookkeeping and
//! the two provider gateways.
//!
//! The binary (`src/main.rs`) wires config, logging and the real gateways
//! together; everything here is constructed from injected parts so the
//! router can be exercised with mock gateways in tests.

pub mod config;
pub mod extract;
pub mod gateway;
pub mod prompt;
pub mod routers;
pub mod server;
pub mod session;
