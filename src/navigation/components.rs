//! Deferred view cache.
//!
//! # Responsibilities
//! - Load each deferred view at most once per process
//! - Share one in-flight load between concurrent navigations
//! - Leave failed loads uncached so a later navigation retries them

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::observability::metrics;
use crate::routing::{DeferredView, LoadError, RouteComponent, RouteId, ViewRef};

/// Memoizing cache of deferred views, keyed by route.
#[derive(Debug, Default)]
pub struct ComponentCache {
    cells: DashMap<RouteId, Arc<OnceCell<ViewRef>>>,
}

impl ComponentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a route's component, loading it if it is deferred.
    pub async fn view_for(
        &self,
        route: RouteId,
        component: &RouteComponent,
    ) -> Result<ViewRef, LoadError> {
        match component {
            RouteComponent::Resident(view) => Ok(view.clone()),
            RouteComponent::Deferred(deferred) => self.load(route, deferred).await,
        }
    }

    /// Load a deferred view, or return the cached copy.
    pub async fn load(&self, route: RouteId, deferred: &DeferredView) -> Result<ViewRef, LoadError> {
        // Clone the cell out so no map shard lock is held across the await.
        let cell = self.cells.entry(route).or_default().value().clone();

        let view = cell
            .get_or_try_init(|| async {
                tracing::debug!(route = %route, view = deferred.view(), "Loading deferred view");
                let result = deferred.load().await;
                metrics::record_deferred_load(deferred.view(), result.is_ok());
                if let Err(e) = &result {
                    tracing::warn!(route = %route, error = %e, "Deferred view failed to load");
                }
                result
            })
            .await?
            .clone();

        metrics::record_cached_views(self.loaded_count());
        Ok(view)
    }

    pub fn is_loaded(&self, route: RouteId) -> bool {
        self.cells
            .get(&route)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    /// Number of deferred views loaded so far.
    pub fn loaded_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.initialized()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::ViewSource;
    use futures_util::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FlakySource {
        calls: AtomicUsize,
    }

    impl ViewSource for FlakySource {
        fn fetch(&self, view: &str) -> BoxFuture<'static, Result<ViewRef, LoadError>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let view = view.to_string();
            Box::pin(async move {
                if call == 0 {
                    Err(LoadError::new(view, "chunk unavailable"))
                } else {
                    Ok(ViewRef::new(view))
                }
            })
        }
    }

    #[tokio::test]
    async fn test_failed_load_is_retried_then_cached() {
        let source = Arc::new(FlakySource::default());
        let deferred = DeferredView::new("Settings", source.clone());
        let cache = ComponentCache::new();
        let route = RouteId::from_index(3);

        assert!(cache.load(route, &deferred).await.is_err());
        assert!(!cache.is_loaded(route));

        assert_eq!(cache.load(route, &deferred).await.unwrap(), ViewRef::new("Settings"));
        assert_eq!(cache.load(route, &deferred).await.unwrap(), ViewRef::new("Settings"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_loaded(route));
        assert_eq!(cache.loaded_count(), 1);
    }

    #[tokio::test]
    async fn test_resident_views_bypass_cache() {
        let cache = ComponentCache::new();
        let component = RouteComponent::Resident(ViewRef::new("Dashboard"));
        let view = cache.view_for(RouteId::from_index(0), &component).await.unwrap();
        assert_eq!(view.name(), "Dashboard");
        assert_eq!(cache.loaded_count(), 0);
    }
}
