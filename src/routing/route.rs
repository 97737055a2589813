//! Route declarations and view components.
//!
//! # Responsibilities
//! - Name the views a route renders (`ViewRef`)
//! - Distinguish resident views from deferred ones
//! - Provide the builder used to declare the route tree

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference to a view component rendered by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewRef(String);

impl ViewRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deferred view failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load view {view}: {reason}")]
pub struct LoadError {
    pub view: String,
    pub reason: String,
}

impl LoadError {
    pub fn new(view: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            reason: reason.into(),
        }
    }
}

/// Source of deferred view components.
pub trait ViewSource: Send + Sync + fmt::Debug {
    /// Fetch the named view. Called at most once per successful load.
    fn fetch(&self, view: &str) -> BoxFuture<'static, Result<ViewRef, LoadError>>;
}

/// Views compiled into the application bundle.
///
/// Fetching yields to the scheduler once, standing in for the chunk
/// download, and then hands back the named view.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledViews;

impl ViewSource for BundledViews {
    fn fetch(&self, view: &str) -> BoxFuture<'static, Result<ViewRef, LoadError>> {
        let view = ViewRef::new(view);
        Box::pin(async move {
            tokio::task::yield_now().await;
            Ok(view)
        })
    }
}

/// A view loaded on first navigation to its route.
#[derive(Clone)]
pub struct DeferredView {
    view: String,
    source: Arc<dyn ViewSource>,
}

impl DeferredView {
    pub fn new(view: impl Into<String>, source: Arc<dyn ViewSource>) -> Self {
        Self {
            view: view.into(),
            source,
        }
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn load(&self) -> BoxFuture<'static, Result<ViewRef, LoadError>> {
        self.source.fetch(&self.view)
    }
}

impl fmt::Debug for DeferredView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredView")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

/// What a route renders.
#[derive(Debug, Clone)]
pub enum RouteComponent {
    /// Always available.
    Resident(ViewRef),
    /// Loaded once on demand, then cached.
    Deferred(DeferredView),
}

impl RouteComponent {
    /// Name of the view, without loading it.
    pub fn view_name(&self) -> &str {
        match self {
            RouteComponent::Resident(view) => view.name(),
            RouteComponent::Deferred(deferred) => deferred.view(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, RouteComponent::Deferred(_))
    }
}

/// Declaration of one node of the route tree.
///
/// Top-level paths are absolute (`/onboarding/auth`); child paths are
/// relative to their parent (`organizations/:id/projects`), and the empty
/// child path marks the parent's default child.
#[derive(Debug, Clone, Default)]
pub struct Route {
    pub(crate) path: String,
    pub(crate) name: Option<String>,
    pub(crate) component: Option<RouteComponent>,
    pub(crate) redirect: Option<String>,
    pub(crate) children: Vec<Route>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn component(mut self, component: RouteComponent) -> Self {
        self.component = Some(component);
        self
    }

    /// Render a view that is always resident.
    pub fn resident(self, view: impl Into<String>) -> Self {
        self.component(RouteComponent::Resident(ViewRef::new(view)))
    }

    /// Render a view fetched from `source` on first use.
    pub fn deferred(self, view: impl Into<String>, source: Arc<dyn ViewSource>) -> Self {
        self.component(RouteComponent::Deferred(DeferredView::new(view, source)))
    }

    /// Re-resolve against `target` instead of rendering.
    ///
    /// Relative targets are taken from the parent's full path.
    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    pub fn children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bundled_views_yield_named_view() {
        let deferred = DeferredView::new("Settings", Arc::new(BundledViews));
        assert_eq!(deferred.load().await.unwrap(), ViewRef::new("Settings"));
    }

    #[test]
    fn test_builder() {
        let route = Route::new("/app")
            .resident("AppLayout")
            .children(vec![Route::new("").redirect("dashboard")]);

        assert_eq!(route.path(), "/app");
        assert_eq!(route.component.as_ref().map(|c| c.view_name()), Some("AppLayout"));
        assert_eq!(route.children.len(), 1);
        assert_eq!(route.children[0].redirect.as_deref(), Some("dashboard"));
    }

    #[test]
    fn test_component_kind() {
        let resident = RouteComponent::Resident(ViewRef::new("Dashboard"));
        let deferred = RouteComponent::Deferred(DeferredView::new("Settings", Arc::new(BundledViews)));
        assert!(!resident.is_deferred());
        assert!(deferred.is_deferred());
        assert_eq!(deferred.view_name(), "Settings");
    }
}
