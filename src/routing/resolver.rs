//! Path resolution against a compiled table.
//!
//! # Responsibilities
//! - Normalize the requested path
//! - Find the first record, in declaration order, whose full pattern matches
//! - Descend into default children of an exactly-matched parent
//! - Follow redirects until a renderable route is reached
//!
//! # Design Decisions
//! - Iterative: one loop per redirect hop, bounded by a visited set and a cap
//! - No specificity reordering; declaration order decides
//! - Pure: resolution has no side effects beyond logs and metrics

use std::collections::HashSet;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::observability::metrics;
use crate::routing::path::{normalize, segments, Params};
use crate::routing::table::{RouteId, RouteTable};

/// Errors produced while resolving a path or building one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no route matches {path}")]
    NoMatch { path: String },

    #[error("redirect cycle: {}", .chain.join(" -> "))]
    RedirectCycle { chain: Vec<String> },

    #[error("no route is named {0:?}")]
    UnknownRoute(String),

    #[error("route {route:?} requires parameter :{param}")]
    MissingParam { route: String, param: String },
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    /// The normalized path that was asked for.
    pub requested: String,
    /// The normalized path that finally matched, after redirects.
    pub path: String,
    /// Set when at least one redirect was followed.
    pub redirected_from: Option<String>,
    /// Name of the innermost matched route.
    pub name: Option<String>,
    /// Matched records, outermost first.
    pub matched: Vec<RouteId>,
    pub params: Params,
}

impl Resolved {
    /// The innermost matched record.
    pub fn leaf(&self) -> Option<RouteId> {
        self.matched.last().copied()
    }
}

enum Step {
    Matched { leaf: RouteId, params: Params },
    Redirect { target: String },
}

impl RouteTable {
    /// Resolve a path to the chain of records that render it.
    pub fn resolve(&self, path: &str) -> Result<Resolved, ResolveError> {
        let started = Instant::now();
        let mut hops = 0;
        let result = self.resolve_inner(path, &mut hops);
        metrics::record_resolution(started.elapsed(), result.is_ok());
        metrics::record_redirects(hops);
        result
    }

    /// Resolution without metrics; `hops` counts the redirects followed.
    pub(crate) fn resolve_inner(
        &self,
        path: &str,
        hops: &mut usize,
    ) -> Result<Resolved, ResolveError> {
        let requested = normalize(path, self.config.strict);
        let mut current = requested.clone();
        let mut chain = vec![current.clone()];
        let mut visited = HashSet::from([current.clone()]);

        loop {
            match self.match_path(&current) {
                Some(Step::Matched { leaf, params }) => {
                    let mut matched = self.lineage(leaf);
                    matched.reverse();
                    let name = self.records[leaf.index()].name.clone();
                    let redirected_from = (current != requested).then(|| requested.clone());

                    tracing::trace!(
                        path = %current,
                        route = ?name,
                        depth = matched.len(),
                        "Path resolved"
                    );
                    return Ok(Resolved {
                        requested,
                        path: current,
                        redirected_from,
                        name,
                        matched,
                        params,
                    });
                }
                Some(Step::Redirect { target }) => {
                    let target = normalize(&target, self.config.strict);
                    tracing::debug!(from = %current, to = %target, "Following redirect");
                    *hops += 1;

                    chain.push(target.clone());
                    if !visited.insert(target.clone()) || chain.len() > self.config.max_redirects + 1
                    {
                        tracing::warn!(chain = ?chain, "Redirect chain does not terminate");
                        return Err(ResolveError::RedirectCycle { chain });
                    }
                    current = target;
                }
                None => return Err(ResolveError::NoMatch { path: current }),
            }
        }
    }

    fn match_path(&self, path: &str) -> Option<Step> {
        let segs = segments(path);

        for record in &self.records {
            let Some(params) = record.pattern.captures(&segs, self.config.sensitive) else {
                continue;
            };

            let mut node = record;
            loop {
                if let Some(target) = &node.redirect {
                    // Parameters were checked against the source pattern at compile time.
                    let target = target.build(&params).unwrap_or_else(|_| target.to_string());
                    return Some(Step::Redirect { target });
                }
                if let Some(child) = node.default_child {
                    node = &self.records[child.index()];
                    continue;
                }
                if node.component.is_some() {
                    return Some(Step::Matched {
                        leaf: node.id,
                        params,
                    });
                }
                // A grouping route with no view of its own.
                break;
            }
        }
        None
    }

    /// Build the concrete path of a named route.
    pub fn href_for(&self, name: &str, params: &Params) -> Result<String, ResolveError> {
        let record = self
            .by_name(name)
            .ok_or_else(|| ResolveError::UnknownRoute(name.to_string()))?;
        record
            .pattern
            .build(params)
            .map_err(|param| ResolveError::MissingParam {
                route: name.to_string(),
                param,
            })
    }
}
