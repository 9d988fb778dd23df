//! Client configuration.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or ClientConfig::new(api_base_url)
//!     → loader.rs (parse, deserialize, validate)
//!     → ClientConfig (immutable once built)
//!     → handed to GameStateClient / RequestBuilder / fusion calls
//! ```
//!
//! Every well-known address (memo program, action recipient, fusion
//! program, token metadata program) lives in [`ProgramIds`] so deployments
//! on other clusters can override them without code changes.

pub mod loader;
pub mod schema;

pub use loader::{load_config, validate_config, ConfigError};
pub use schema::{ClientConfig, ProgramIds};
