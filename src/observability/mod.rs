//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing and navigation produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stderr (plain or JSON lines)
//!     → Prometheus text rendered by the binary
//! ```
//!
//! # Design Decisions
//! - Structured fields (path, route, view, navigation id) on every event
//! - Metrics are cheap and no-ops without a recorder

pub mod logging;
pub mod metrics;
