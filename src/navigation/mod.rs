//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! push / replace / back / forward / navigate_to_*
//!     → location.rs (parse target, relative to current location)
//!     → RouteTable::resolve (view chain + params, redirects followed)
//!     → components.rs (materialize views, deferred ones loaded once)
//!     → controller.rs (ticket check, history.rs update, state swap)
//!     → NavigationState (readers load Arc snapshots)
//! ```
//!
//! # Design Decisions
//! - Single writer (Navigator), many readers
//! - The only suspension point is the deferred view load
//! - A newer navigation supersedes one still loading views

pub mod components;
pub mod controller;
pub mod error;
pub mod history;
pub mod location;
pub mod state;

pub use components::ComponentCache;
pub use controller::{NavigationTarget, Navigator};
pub use error::NavigationError;
pub use history::History;
pub use location::Location;
pub use state::NavigationState;
