//! Navigation controller.
//!
//! # Responsibilities
//! - Turn navigation targets (paths, URLs, named routes) into locations
//! - Resolve them against the route table
//! - Load the deferred views of the resolved chain
//! - Commit the new state and history entry, unless superseded
//!
//! # Design Decisions
//! - The controller is the single writer of navigation state; readers load
//!   an `Arc` snapshot without locking
//! - Every navigation takes a generation ticket; only the newest ticket may
//!   commit, so a slow view load cannot overwrite a later navigation
//! - Failed navigations leave state and history untouched

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use futures_util::future::try_join_all;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::HistoryConfig;
use crate::navigation::components::ComponentCache;
use crate::navigation::error::NavigationError;
use crate::navigation::history::History;
use crate::navigation::location::Location;
use crate::navigation::state::NavigationState;
use crate::observability::metrics;
use crate::routing::{LoadError, Params, Resolved, RouteTable, ViewRef};

/// Where to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Absolute or relative path, optionally with query and hash.
    Path(String),
    /// A named route with its parameters.
    Named { name: String, params: Params },
}

impl NavigationTarget {
    pub fn named(name: impl Into<String>, params: Params) -> Self {
        NavigationTarget::Named {
            name: name.into(),
            params,
        }
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        NavigationTarget::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        NavigationTarget::Path(path)
    }
}

#[derive(Debug, Clone, Copy)]
enum HistoryMode {
    Push,
    Replace,
    Traverse(isize),
}

/// Owns the route table and the current navigation state.
#[derive(Debug)]
pub struct Navigator {
    table: Arc<RouteTable>,
    base: String,
    state: ArcSwap<NavigationState>,
    generation: AtomicU64,
    components: ComponentCache,
    history: Mutex<History>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, config: &HistoryConfig) -> Self {
        Self {
            table,
            base: config.base.clone(),
            state: ArcSwap::from_pointee(NavigationState::initial()),
            generation: AtomicU64::new(0),
            components: ComponentCache::new(),
            history: Mutex::new(History::new(Location::root(), config.capacity)),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn components(&self) -> &ComponentCache {
        &self.components
    }

    /// The last committed state.
    pub fn current(&self) -> Arc<NavigationState> {
        self.state.load_full()
    }

    /// Copy of the history stack.
    pub async fn history(&self) -> History {
        self.history.lock().await.clone()
    }

    /// Turn a target into a location, without resolving it.
    pub fn locate(&self, target: &NavigationTarget) -> Result<Location, NavigationError> {
        match target {
            NavigationTarget::Path(path) => Location::parse(path, &self.current().location),
            NavigationTarget::Named { name, params } => {
                let path = self.table.href_for(name, params)?;
                Location::parse(&path, &Location::root())
            }
        }
    }

    /// Resolve a target without navigating.
    pub fn resolve(&self, target: &NavigationTarget) -> Result<(Location, Resolved), NavigationError> {
        let location = self.locate(target)?;
        let resolved = self.table.resolve(&location.path)?;
        Ok((location, resolved))
    }

    /// Browser-facing href of a target, under the history base.
    pub fn href(&self, target: &NavigationTarget) -> Result<String, NavigationError> {
        let (location, _) = self.resolve(target)?;
        Ok(location.href(&self.base))
    }

    /// Navigate, adding a history entry.
    pub async fn push(&self, target: NavigationTarget) -> Result<Arc<NavigationState>, NavigationError> {
        self.navigate(target, HistoryMode::Push).await
    }

    /// Navigate, overwriting the current history entry.
    pub async fn replace(&self, target: NavigationTarget) -> Result<Arc<NavigationState>, NavigationError> {
        self.navigate(target, HistoryMode::Replace).await
    }

    pub async fn navigate_to_path(&self, path: &str) -> Result<Arc<NavigationState>, NavigationError> {
        self.push(NavigationTarget::from(path)).await
    }

    pub async fn navigate_to_name(
        &self,
        name: &str,
        params: Params,
    ) -> Result<Arc<NavigationState>, NavigationError> {
        self.push(NavigationTarget::named(name, params)).await
    }

    /// Navigate to a browser URL path that includes the history base.
    pub async fn navigate_to_url(&self, url: &str) -> Result<Arc<NavigationState>, NavigationError> {
        let location = Location::from_url(url, &self.base)?;
        self.push(NavigationTarget::Path(location.full_path())).await
    }

    /// Go one entry back. `Ok(None)` when already at the oldest entry.
    pub async fn back(&self) -> Result<Option<Arc<NavigationState>>, NavigationError> {
        self.traverse(-1).await
    }

    /// Go one entry forward. `Ok(None)` when already at the newest entry.
    pub async fn forward(&self) -> Result<Option<Arc<NavigationState>>, NavigationError> {
        self.traverse(1).await
    }

    async fn traverse(&self, delta: isize) -> Result<Option<Arc<NavigationState>>, NavigationError> {
        let target = self.history.lock().await.peek(delta).cloned();
        match target {
            Some(location) => self
                .navigate(NavigationTarget::Path(location.full_path()), HistoryMode::Traverse(delta))
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    async fn navigate(
        &self,
        target: NavigationTarget,
        mode: HistoryMode,
    ) -> Result<Arc<NavigationState>, NavigationError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let id = Uuid::new_v4();
        let span = tracing::info_span!("navigation", id = %id, ticket);

        let result = self.run(id, ticket, &target, mode).instrument(span).await;
        if let Err(e) = &result {
            metrics::record_navigation(e.kind());
            tracing::warn!(destination = ?target, error = %e, "Navigation failed");
        }
        result
    }

    async fn run(
        &self,
        id: Uuid,
        ticket: u64,
        target: &NavigationTarget,
        mode: HistoryMode,
    ) -> Result<Arc<NavigationState>, NavigationError> {
        let (location, resolved) = self.resolve(target)?;
        let location = location.with_path(resolved.path.clone());

        let current = self.current();
        if !matches!(mode, HistoryMode::Traverse(_))
            && !current.is_initial()
            && current.location == location
        {
            tracing::debug!(path = %location.full_path(), "Already at target location");
            metrics::record_navigation("duplicated");
            return Ok(current);
        }

        let views = self.load_views(&resolved).await?;

        // Commit under the history lock so the ticket check and the swap are one step.
        let mut history = self.history.lock().await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(path = %location.full_path(), "Navigation superseded");
            return Err(NavigationError::Superseded {
                path: location.full_path(),
            });
        }

        match mode {
            // The first navigation takes over the start entry.
            HistoryMode::Push if current.is_initial() => history.replace(location.clone()),
            HistoryMode::Push => history.push(location.clone()),
            HistoryMode::Replace => history.replace(location.clone()),
            HistoryMode::Traverse(delta) => {
                if !history.go(delta) {
                    tracing::debug!(delta, "History entry no longer exists");
                    return Err(NavigationError::Superseded {
                        path: location.full_path(),
                    });
                }
                history.replace(location.clone());
            }
        }

        let state = Arc::new(NavigationState {
            id,
            location,
            name: resolved.name,
            params: resolved.params,
            views,
            matched: resolved.matched,
            redirected_from: resolved.redirected_from,
        });
        self.state.store(state.clone());
        drop(history);

        tracing::info!(
            path = %state.full_path(),
            route = ?state.name,
            views = state.views.len(),
            redirected_from = ?state.redirected_from,
            "Navigation committed"
        );
        metrics::record_navigation("committed");
        Ok(state)
    }

    /// Materialize every view of the chain; deferred loads run concurrently.
    async fn load_views(&self, resolved: &Resolved) -> Result<Vec<ViewRef>, LoadError> {
        let loads = self
            .table
            .views_for(resolved)
            .map(|(record, component)| self.components.view_for(record.id, component));
        try_join_all(loads).await
    }
}
