//! The application's route table.
//!
//! Onboarding screens live at the top level, outside the shell. Everything
//! under `/app` renders inside `AppLayout`, with `Dashboard` as the default
//! page. `AppLayout` and `Dashboard` are resident; every other page is a
//! deferred view fetched from the given source.

use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::routing::{BundledViews, Route, RouteTable, TableError, ViewSource};

/// Declare the route tree, fetching deferred pages from `source`.
pub fn app_routes(source: Arc<dyn ViewSource>) -> Vec<Route> {
    let deferred = |path: &str, name: &str| Route::new(path).name(name).deferred(name, source.clone());

    vec![
        Route::new("/").redirect("/onboarding/auth"),
        deferred("/onboarding/auth", "OnboardingAuth"),
        deferred("/onboarding/repo-provider", "OnboardingRepoProvider"),
        deferred("/onboarding/pat", "OnboardingPAT"),
        Route::new("/app").resident("AppLayout").children(vec![
            Route::new("").redirect("/app/dashboard"),
            Route::new("dashboard").name("Dashboard").resident("Dashboard"),
            deferred("organizations", "Organizations"),
            deferred("organizations/:id/projects", "Projects"),
            deferred("organizations/:orgId/projects/:projectId/repos", "Repositories"),
            deferred(
                "organizations/:orgId/projects/:projectId/repos/:repoId/reviews",
                "CodeReviews",
            ),
            deferred(
                "organizations/:orgId/projects/:projectId/repos/:repoId/reviews/:reviewId",
                "ReviewDetails",
            ),
            deferred("settings", "Settings"),
            deferred("analytics", "Analytics"),
        ]),
    ]
}

/// Compile the application table with views from the bundle.
pub fn app_table(config: ResolverConfig) -> Result<RouteTable, TableError> {
    app_table_with(Arc::new(BundledViews), config)
}

/// Compile the application table with views from `source`.
pub fn app_table_with(source: Arc<dyn ViewSource>, config: ResolverConfig) -> Result<RouteTable, TableError> {
    RouteTable::compile(app_routes(source), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_table_compiles() {
        let table = app_table(ResolverConfig::default()).unwrap();
        assert_eq!(table.records().len(), 14);
        assert!(table.by_name("ReviewDetails").is_some());

        let shell = table.by_name("Dashboard").and_then(|r| r.parent).unwrap();
        let shell = table.record(shell).unwrap();
        assert_eq!(shell.path(), "/app");
        assert_eq!(shell.children.len(), 9);
        assert!(shell.default_child.is_some());
    }

    #[test]
    fn test_resident_and_deferred_split() {
        let table = app_table(ResolverConfig::default()).unwrap();
        let resident: Vec<&str> = table
            .records()
            .iter()
            .filter_map(|r| r.component.as_ref())
            .filter(|c| !c.is_deferred())
            .map(|c| c.view_name())
            .collect();
        assert_eq!(resident, vec!["AppLayout", "Dashboard"]);
    }
}
