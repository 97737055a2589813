//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → NavigatorConfig (validated, immutable)
//!     → resolver settings handed to the RouteTable,
//!       history and observability settings to the Navigator and binary
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table is built against it once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{HistoryConfig, NavigatorConfig, ObservabilityConfig, ResolverConfig};
pub use validation::ValidationError;
