//! Shared utilities for integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use app_navigator::app_routes::app_table_with;
use app_navigator::config::{HistoryConfig, ResolverConfig};
use app_navigator::navigation::Navigator;
use app_navigator::routing::{LoadError, ViewRef, ViewSource};
use futures_util::future::BoxFuture;
use tokio::sync::Notify;

/// A view source that counts fetches and can fail or hold them.
#[derive(Debug, Default)]
pub struct TestViews {
    calls: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl TestViews {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make fetches of `view` fail until `recover` is called.
    #[allow(dead_code)]
    pub fn fail(&self, view: &str) {
        self.failing.lock().unwrap().insert(view.to_string());
    }

    #[allow(dead_code)]
    pub fn recover(&self, view: &str) {
        self.failing.lock().unwrap().remove(view);
    }

    /// Hold fetches of `view` until the returned gate is notified.
    #[allow(dead_code)]
    pub fn gate(&self, view: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(view.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self, view: &str) -> usize {
        self.calls.lock().unwrap().get(view).copied().unwrap_or(0)
    }
}

impl ViewSource for TestViews {
    fn fetch(&self, view: &str) -> BoxFuture<'static, Result<ViewRef, LoadError>> {
        *self.calls.lock().unwrap().entry(view.to_string()).or_default() += 1;
        let fail = self.failing.lock().unwrap().contains(view);
        let gate = self.gates.lock().unwrap().get(view).cloned();
        let view = view.to_string();

        Box::pin(async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if fail {
                Err(LoadError::new(view, "chunk request failed"))
            } else {
                Ok(ViewRef::new(view))
            }
        })
    }
}

/// Navigator over the application table, with views from `views`.
pub fn navigator(views: Arc<TestViews>) -> Navigator {
    navigator_with(views, HistoryConfig::default())
}

pub fn navigator_with(views: Arc<TestViews>, history: HistoryConfig) -> Navigator {
    let table = app_table_with(views, ResolverConfig::default()).unwrap();
    Navigator::new(Arc::new(table), &history)
}

/// Wait until `view` has been fetched `count` times.
#[allow(dead_code)]
pub async fn wait_for_calls(views: &TestViews, view: &str, count: usize) {
    for _ in 0..1000 {
        if views.calls(view) >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("{view} was never fetched {count} times");
}

pub fn view_names(views: &[ViewRef]) -> Vec<&str> {
    views.iter().map(ViewRef::name).collect()
}
