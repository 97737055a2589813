//! Compiled route table.
//!
//! # Responsibilities
//! - Flatten the declared route tree into an immutable arena
//! - Concatenate parent and child patterns into full patterns
//! - Validate the table once, before it is used
//!
//! # Design Decisions
//! - Records are stored in depth-first pre-order, which is also match order
//! - Flattening uses an explicit stack, not recursion
//! - A table that fails validation is never constructed

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::ResolverConfig;
use crate::routing::path::{normalize, Params, PathPattern, PatternError};
use crate::routing::resolver::{ResolveError, Resolved};
use crate::routing::route::{Route, RouteComponent};

/// Position of a record in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RouteId(usize);

impl RouteId {
    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Problems found while compiling a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("invalid path pattern {path:?}: {reason}")]
    InvalidPattern { path: String, reason: String },

    #[error("route name {0:?} is declared more than once")]
    DuplicateName(String),

    #[error("parameter :{param} appears twice in {path}")]
    DuplicateParam { path: String, param: String },

    #[error("route {path} declares both a component and a redirect")]
    ConflictingTarget { path: String },

    #[error("route {path} has no component, redirect or children")]
    MissingTarget { path: String },

    #[error("route {path} declares more than one default child")]
    DuplicateDefaultChild { path: String },

    #[error("redirect from {from} is invalid: {reason}")]
    InvalidRedirect { from: String, reason: String },

    #[error("redirect cycle: {}", .chain.join(" -> "))]
    RedirectCycle { chain: Vec<String> },
}

/// A compiled node of the route tree.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub id: RouteId,
    pub parent: Option<RouteId>,
    pub name: Option<String>,
    /// Full pattern, parents included.
    pub pattern: PathPattern,
    pub component: Option<RouteComponent>,
    /// Absolute redirect target; may reference the route's own parameters.
    pub redirect: Option<PathPattern>,
    pub children: Vec<RouteId>,
    /// The empty-path child rendered when the route is matched exactly.
    pub default_child: Option<RouteId>,
}

impl RouteRecord {
    /// The full path pattern as text, e.g. `/app/organizations/:id/projects`.
    pub fn path(&self) -> String {
        self.pattern.to_string()
    }
}

/// Immutable, validated route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    pub(crate) records: Vec<RouteRecord>,
    pub(crate) names: HashMap<String, RouteId>,
    pub(crate) config: ResolverConfig,
}

impl RouteTable {
    /// Compile and validate a route tree.
    pub fn compile(routes: Vec<Route>, config: ResolverConfig) -> Result<Self, TableError> {
        let mut records: Vec<RouteRecord> = Vec::new();
        let mut names = HashMap::new();

        // Reverse so siblings pop in declaration order.
        let mut stack: Vec<(Route, Option<RouteId>)> =
            routes.into_iter().rev().map(|r| (r, None)).collect();

        while let Some((route, parent)) = stack.pop() {
            let id = RouteId(records.len());
            let Route {
                path,
                name,
                component,
                redirect,
                children,
            } = route;

            let own = compile_own_pattern(&path, parent.is_some())?;
            let base = match parent {
                Some(parent_id) => records[parent_id.0].pattern.clone(),
                None => PathPattern::default(),
            };
            let pattern = base.join(&own).map_err(|e| pattern_error(&base, &path, e))?;
            let full_path = pattern.to_string();

            if component.is_some() && redirect.is_some() {
                return Err(TableError::ConflictingTarget { path: full_path });
            }
            if component.is_none() && redirect.is_none() && children.is_empty() {
                return Err(TableError::MissingTarget { path: full_path });
            }

            let redirect = redirect
                .map(|target| compile_redirect(&target, &base, &pattern))
                .transpose()?;

            if let Some(name) = &name {
                if names.insert(name.clone(), id).is_some() {
                    return Err(TableError::DuplicateName(name.clone()));
                }
            }

            if let Some(parent_id) = parent {
                let parent_record = &mut records[parent_id.0];
                parent_record.children.push(id);
                if own.is_empty() {
                    if parent_record.default_child.is_some() {
                        return Err(TableError::DuplicateDefaultChild {
                            path: parent_record.path(),
                        });
                    }
                    parent_record.default_child = Some(id);
                }
            }

            records.push(RouteRecord {
                id,
                parent,
                name,
                pattern,
                component,
                redirect,
                children: Vec::new(),
                default_child: None,
            });

            stack.extend(children.into_iter().rev().map(|child| (child, Some(id))));
        }

        let table = Self {
            records,
            names,
            config,
        };
        table.validate_redirects()?;

        tracing::debug!(
            routes = table.records.len(),
            named = table.names.len(),
            "Route table compiled"
        );
        Ok(table)
    }

    /// Every redirect must land on a renderable route without looping.
    fn validate_redirects(&self) -> Result<(), TableError> {
        for record in &self.records {
            let Some(target) = &record.redirect else {
                continue;
            };
            let placeholders: Params = record
                .pattern
                .param_names()
                .map(|name| (name.to_string(), "_".to_string()))
                .collect();
            let from = record.path();
            let path = target.build(&placeholders).map_err(|param| TableError::InvalidRedirect {
                from: from.clone(),
                reason: format!("target references unknown parameter :{param}"),
            })?;

            match self.resolve_inner(&path, &mut 0) {
                Ok(_) => {}
                Err(ResolveError::NoMatch { path }) => {
                    return Err(TableError::InvalidRedirect {
                        from,
                        reason: format!("target {path} matches no route"),
                    })
                }
                Err(ResolveError::RedirectCycle { mut chain }) => {
                    chain.insert(0, from);
                    return Err(TableError::RedirectCycle { chain });
                }
                Err(other) => {
                    return Err(TableError::InvalidRedirect {
                        from,
                        reason: other.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    pub fn record(&self, id: RouteId) -> Option<&RouteRecord> {
        self.records.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.names.get(name).and_then(|id| self.record(*id))
    }

    /// All records in match order.
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Components to render for a resolution, outermost first.
    pub fn views_for<'a>(
        &'a self,
        resolved: &'a Resolved,
    ) -> impl Iterator<Item = (&'a RouteRecord, &'a RouteComponent)> + 'a {
        resolved
            .matched
            .iter()
            .filter_map(move |id| self.record(*id))
            .filter_map(|record| record.component.as_ref().map(|c| (record, c)))
    }

    /// The record followed by its ancestors, innermost first.
    pub(crate) fn lineage(&self, id: RouteId) -> Vec<RouteId> {
        let mut chain = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            chain.push(current);
            next = self.records[current.0].parent;
        }
        chain
    }
}

fn compile_own_pattern(path: &str, is_child: bool) -> Result<PathPattern, TableError> {
    let invalid = |reason: &str| TableError::InvalidPattern {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    if is_child && path.starts_with('/') {
        return Err(invalid("child paths are relative to their parent"));
    }
    if !is_child && !path.starts_with('/') {
        return Err(invalid("top-level paths must start with '/'"));
    }
    if path.contains(['?', '#']) {
        return Err(invalid("query and hash are not part of a route path"));
    }
    PathPattern::parse(path).map_err(|e| match e {
        PatternError::EmptyParamName => invalid("parameter name is empty"),
        PatternError::DuplicateParam(param) => TableError::DuplicateParam {
            path: path.to_string(),
            param,
        },
    })
}

fn pattern_error(base: &PathPattern, path: &str, error: PatternError) -> TableError {
    let full = format!("{}/{}", base.to_string().trim_end_matches('/'), path);
    match error {
        PatternError::DuplicateParam(param) => TableError::DuplicateParam { path: full, param },
        PatternError::EmptyParamName => TableError::InvalidPattern {
            path: full,
            reason: "parameter name is empty".to_string(),
        },
    }
}

fn compile_redirect(
    target: &str,
    base: &PathPattern,
    source: &PathPattern,
) -> Result<PathPattern, TableError> {
    let invalid = |reason: String| TableError::InvalidRedirect {
        from: source.to_string(),
        reason,
    };
    let absolute = if target.starts_with('/') {
        normalize(target, false)
    } else {
        normalize(&format!("{}/{}", base, target), false)
    };
    let pattern = PathPattern::parse(&absolute).map_err(|e| invalid(format!("{e:?}")))?;
    for param in pattern.param_names() {
        if !source.param_names().any(|p| p == param) {
            return Err(invalid(format!("target references unknown parameter :{param}")));
        }
    }
    Ok(pattern)
}
