//! Navigation locations.
//!
//! # Responsibilities
//! - Parse navigation targets (absolute or relative) into path, query and hash
//! - Strip and re-apply the history base for browser URLs
//!
//! # Design Decisions
//! - Parsing goes through `url` against a fixed origin, so dot segments and
//!   relative references follow URL rules
//! - Targets that leave the origin are rejected

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::navigation::error::NavigationError;
use crate::routing::path::normalize;

const ORIGIN: &str = "http://navigator.local/";

/// A location inside the application, without the history base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub hash: Option<String>,
}

impl Location {
    /// The start location, before any navigation.
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
            query: BTreeMap::new(),
            hash: None,
        }
    }

    /// Parse `target` relative to `current`.
    pub fn parse(target: &str, current: &Location) -> Result<Self, NavigationError> {
        let origin = origin()?;
        let base = origin
            .join(&current.full_path())
            .map_err(|e| invalid(target, e))?;
        let url = base
            .join(&collapse_slashes(target))
            .map_err(|e| invalid(target, e))?;
        if url.origin() != origin.origin() {
            return Err(NavigationError::InvalidLocation {
                target: target.to_string(),
                reason: "target leaves the application origin".to_string(),
            });
        }
        Ok(Self::from_parsed(&url))
    }

    /// Parse a browser path that includes the history `base`.
    pub fn from_url(url: &str, base: &str) -> Result<Self, NavigationError> {
        let mut location = Self::parse(url, &Self::root())?;
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return Ok(location);
        }
        let stripped = match location.path.strip_prefix(base) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => {
                return Err(NavigationError::InvalidLocation {
                    target: url.to_string(),
                    reason: format!("path is outside the history base {base}"),
                })
            }
        };
        location.path = stripped;
        Ok(location)
    }

    fn from_parsed(url: &Url) -> Self {
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let hash = url.fragment().filter(|f| !f.is_empty()).map(str::to_string);
        Self {
            path: url.path().to_string(),
            query,
            hash,
        }
    }

    /// Same location with a different path, keeping query and hash.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    /// Path plus serialized query and hash.
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            out.push('?');
            out.push_str(&query);
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }

    /// Browser-facing href under the history `base`.
    pub fn href(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        format!("{}{}", base, self.full_path())
    }
}

/// Collapse repeated slashes in the path part of an absolute target, so
/// `//app` stays a path instead of naming a host.
fn collapse_slashes(target: &str) -> String {
    if !target.starts_with('/') {
        return target.to_string();
    }
    let split = target.find(['?', '#']).unwrap_or(target.len());
    let (path, rest) = target.split_at(split);
    format!("{}{}", normalize(path, true), rest)
}

fn origin() -> Result<Url, NavigationError> {
    Url::parse(ORIGIN).map_err(|e| invalid(ORIGIN, e))
}

fn invalid(target: &str, error: url::ParseError) -> NavigationError {
    NavigationError::InvalidLocation {
        target: target.to_string(),
        reason: error.to_string(),
    }
}
