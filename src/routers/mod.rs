//! Request handlers, one module per provider route.

pub mod error;
mod form;
pub mod gemini;
pub mod openai;
