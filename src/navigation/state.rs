//! Current navigation state.

use serde::Serialize;
use uuid::Uuid;

use crate::navigation::location::Location;
use crate::routing::{Params, RouteId, ViewRef};

/// Snapshot of a committed navigation.
///
/// Replaced wholesale on every commit; readers hold an `Arc` to the
/// snapshot they loaded and never observe a half-applied navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// Navigation ID, for correlating logs.
    pub id: Uuid,
    /// Where the navigation ended up, after redirects.
    pub location: Location,
    pub name: Option<String>,
    pub params: Params,
    /// Rendered views, outermost shell first.
    pub views: Vec<ViewRef>,
    pub matched: Vec<RouteId>,
    pub redirected_from: Option<String>,
}

impl NavigationState {
    /// State before the first navigation: the root location, nothing rendered.
    pub fn initial() -> Self {
        Self {
            id: Uuid::nil(),
            location: Location::root(),
            name: None,
            params: Params::new(),
            views: Vec::new(),
            matched: Vec::new(),
            redirected_from: None,
        }
    }

    pub fn is_initial(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn full_path(&self) -> String {
        self.location.full_path()
    }

    /// Innermost rendered view.
    pub fn leaf_view(&self) -> Option<&ViewRef> {
        self.views.last()
    }
}
