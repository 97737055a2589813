//! Client-side navigation for the review portal front-end.
//!
//! A declarative route table maps URL paths to view chains: onboarding
//! screens at the top level, and the application pages nested inside a
//! persistent shell. The [`navigation::Navigator`] resolves paths and
//! named routes against it, loads deferred views once, and owns the
//! current navigation state.

pub mod app_routes;
pub mod config;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use config::NavigatorConfig;
pub use navigation::{NavigationError, NavigationState, NavigationTarget, Navigator};
pub use routing::{Route, RouteTable};
