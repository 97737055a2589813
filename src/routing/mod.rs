//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     Route tree (route.rs builder)
//!     → table.rs (flatten in declaration order, join parent/child patterns)
//!     → validate names, params, targets, redirects
//!     → Freeze as immutable RouteTable
//!
//! Requested path
//!     → path.rs (normalize, split, decode)
//!     → resolver.rs (first full-pattern match, default children, redirects)
//!     → Return: Resolved view chain + params, or ResolveError
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (segment comparison only)
//! - Deterministic: same input always resolves the same way
//! - First match wins (declaration order, no specificity ranking)

pub mod path;
pub mod resolver;
pub mod route;
pub mod table;

pub use path::{Params, PathPattern};
pub use resolver::{ResolveError, Resolved};
pub use route::{BundledViews, DeferredView, LoadError, Route, RouteComponent, ViewRef, ViewSource};
pub use table::{RouteId, RouteRecord, RouteTable, TableError};
