//! Navigation failures reported to the caller.

use thiserror::Error;

use crate::routing::{LoadError, ResolveError};

/// Errors that end a navigation without changing the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Resolution failed (no match, redirect cycle, unknown name, missing param).
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A deferred view could not be loaded. Not retried until the next navigation.
    #[error(transparent)]
    DeferredLoad(#[from] LoadError),

    /// A newer navigation started while this one was loading views.
    #[error("navigation to {path} was superseded by a newer navigation")]
    Superseded { path: String },

    #[error("invalid location {target:?}: {reason}")]
    InvalidLocation { target: String, reason: String },
}

impl NavigationError {
    pub fn is_no_match(&self) -> bool {
        matches!(self, NavigationError::Resolve(ResolveError::NoMatch { .. }))
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            NavigationError::Resolve(ResolveError::NoMatch { .. }) => "no_match",
            NavigationError::Resolve(ResolveError::RedirectCycle { .. }) => "redirect_cycle",
            NavigationError::Resolve(_) => "invalid_target",
            NavigationError::DeferredLoad(_) => "load_failed",
            NavigationError::Superseded { .. } => "superseded",
            NavigationError::InvalidLocation { .. } => "invalid_location",
        }
    }
}
