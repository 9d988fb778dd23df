//! Game-state API client.
//!
//! The remote service owns every schema here. Responses are decoded into
//! lenient structs that keep unknown fields, and non-2xx answers are
//! surfaced with their body untouched.

mod client;
mod dynamo;
mod types;

pub use client::{GameStateClient, StateSource};
pub use dynamo::unmarshall;
pub use types::*;
