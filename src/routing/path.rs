//! Path normalization and pattern matching.
//!
//! # Responsibilities
//! - Normalize requested paths into one canonical form
//! - Parse route path patterns into static and parameter segments
//! - Match a full pattern against a segmented path, binding parameters
//! - Build a concrete path from a pattern and parameter values
//!
//! # Design Decisions
//! - Repeated slashes collapse; a trailing slash is dropped unless strict
//! - Static segments compare after percent-decoding
//! - No regex: segment-by-segment comparison only

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use url::Url;

const SEGMENT_ORIGIN: &str = "http://navigator.local/";

/// Parameter bindings produced by a match, ordered by name.
pub type Params = BTreeMap<String, String>;

/// Normalize a requested path.
///
/// Ensures a leading `/` and collapses empty segments. Without `strict`,
/// a trailing slash is removed; with it, the trailing slash survives so
/// that `segments` yields an empty final segment that matches nothing.
pub fn normalize(path: &str, strict: bool) -> String {
    let trailing = strict && path.len() > 1 && path.ends_with('/');
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        return "/".to_string();
    }
    if trailing {
        out.push('/');
    }
    out
}

/// Split a normalized path into percent-decoded segments.
pub fn segments(path: &str) -> Vec<String> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').map(decode_segment).collect()
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches the literal text.
    Static(String),
    /// Matches any non-empty segment and binds it under this name.
    Param(String),
}

/// Reasons a pattern string is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    EmptyParamName,
    DuplicateParam(String),
}

/// A parsed route path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern such as `organizations/:id/projects`.
    ///
    /// Leading, trailing and repeated slashes carry no meaning here; the
    /// empty pattern matches zero segments.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        for raw in pattern.split('/').filter(|s| !s.is_empty()) {
            match raw.strip_prefix(':') {
                Some("") => return Err(PatternError::EmptyParamName),
                Some(name) => segments.push(Segment::Param(name.to_string())),
                None => segments.push(Segment::Static(decode_segment(raw))),
            }
        }
        let pattern = Self { segments };
        if let Some(dup) = pattern.first_duplicate_param() {
            return Err(PatternError::DuplicateParam(dup));
        }
        Ok(pattern)
    }

    /// Concatenate a child pattern onto this one.
    pub fn join(&self, child: &PathPattern) -> Result<Self, PatternError> {
        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());
        let pattern = Self { segments };
        if let Some(dup) = pattern.first_duplicate_param() {
            return Err(PatternError::DuplicateParam(dup));
        }
        Ok(pattern)
    }

    fn first_duplicate_param(&self) -> Option<String> {
        let mut seen = Vec::new();
        for name in self.param_names() {
            if seen.contains(&name) {
                return Some(name.to_string());
            }
            seen.push(name);
        }
        None
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Names of the parameters in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Match the whole pattern against the whole path.
    ///
    /// Returns the bound parameters, or `None` if the segment counts
    /// differ or any segment fails to match.
    pub fn captures(&self, path: &[String], sensitive: bool) -> Option<Params> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut params = Params::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Static(text) => {
                    let matched = if sensitive {
                        text == value
                    } else {
                        text.eq_ignore_ascii_case(value)
                    };
                    if !matched {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if value.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), value.clone());
                }
            }
        }
        Some(params)
    }

    /// Fill the pattern's parameters, producing an absolute path.
    ///
    /// Segments are encoded the way `url` encodes path segments, so a built
    /// path equals the one a browser would produce for the same values. On a
    /// missing value the name of the first unbound parameter is returned;
    /// `.` and `..` count as unbound since URL parsing would remove them.
    pub fn build(&self, params: &Params) -> Result<String, String> {
        let mut values = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Static(text) => values.push(text.as_str()),
                Segment::Param(name) => match params.get(name).map(String::as_str) {
                    Some("" | "." | "..") | None => return Err(name.clone()),
                    Some(value) => values.push(value),
                },
            }
        }
        Ok(encode_segments(&values))
    }
}

fn encode_segments(values: &[&str]) -> String {
    let Ok(mut url) = Url::parse(SEGMENT_ORIGIN) else {
        if values.is_empty() {
            return "/".to_string();
        }
        return values
            .iter()
            .map(|v| format!("/{}", urlencoding::encode(v)))
            .collect();
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(values);
    }
    url.path().to_string()
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Static(text) => write!(f, "/{}", text)?,
                Segment::Param(name) => write!(f, "/:{}", name)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(path: &str) -> Vec<String> {
        segments(&normalize(path, false))
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("", false), "/");
        assert_eq!(normalize("/", false), "/");
        assert_eq!(normalize("app", false), "/app");
        assert_eq!(normalize("/app/", false), "/app");
        assert_eq!(normalize("//app///dashboard/", false), "/app/dashboard");

        // Strict mode keeps the trailing slash but still collapses repeats
        assert_eq!(normalize("/app/", true), "/app/");
        assert_eq!(normalize("//app", true), "/app");
        assert_eq!(normalize("/", true), "/");
    }

    #[test]
    fn test_segments() {
        assert!(segments("/").is_empty());
        assert_eq!(segments("/a/b%20c"), vec!["a", "b c"]);
        assert_eq!(segments("/app/"), vec!["app", ""]);
    }

    #[test]
    fn test_parse_pattern() {
        let pattern = PathPattern::parse("organizations/:orgId/projects/:projectId").unwrap();
        assert_eq!(pattern.segments().len(), 4);
        assert_eq!(
            pattern.param_names().collect::<Vec<_>>(),
            vec!["orgId", "projectId"]
        );
        assert_eq!(pattern.to_string(), "/organizations/:orgId/projects/:projectId");

        assert!(PathPattern::parse("").unwrap().is_empty());
        assert_eq!(
            PathPattern::parse("a/:/b").unwrap_err(),
            PatternError::EmptyParamName
        );
        assert_eq!(
            PathPattern::parse(":id/x/:id").unwrap_err(),
            PatternError::DuplicateParam("id".into())
        );
    }

    #[test]
    fn test_join_detects_duplicates_across_levels() {
        let parent = PathPattern::parse("/orgs/:id").unwrap();
        let child = PathPattern::parse("projects/:id").unwrap();
        assert_eq!(
            parent.join(&child).unwrap_err(),
            PatternError::DuplicateParam("id".into())
        );
    }

    #[test]
    fn test_captures() {
        let pattern = PathPattern::parse("/app/organizations/:id/projects").unwrap();

        let params = pattern.captures(&segs("/app/organizations/42/projects"), true).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        assert!(pattern.captures(&segs("/app/organizations/42"), true).is_none());
        assert!(pattern
            .captures(&segs("/app/organizations/42/projects/x"), true)
            .is_none());
        assert!(pattern
            .captures(&segs("/APP/organizations/42/projects"), true)
            .is_none());
        assert!(pattern
            .captures(&segs("/APP/organizations/42/projects"), false)
            .is_some());
    }

    #[test]
    fn test_param_never_matches_empty_segment() {
        let pattern = PathPattern::parse("/app/:id").unwrap();
        assert!(pattern.captures(&segments("/app/"), true).is_none());
    }

    #[test]
    fn test_build() {
        let pattern = PathPattern::parse("/orgs/:orgId/repos/:repoId").unwrap();
        let mut params = Params::new();
        params.insert("orgId".into(), "acme corp".into());
        assert_eq!(pattern.build(&params).unwrap_err(), "repoId");

        params.insert("repoId".into(), "7".into());
        assert_eq!(pattern.build(&params).unwrap(), "/orgs/acme%20corp/repos/7");
        assert_eq!(PathPattern::default().build(&Params::new()).unwrap(), "/");
    }

    #[test]
    fn test_build_matches_browser_encoding() {
        let pattern = PathPattern::parse("/files/:name").unwrap();
        let mut params = Params::new();
        params.insert("name".into(), "a:b/c d".into());
        assert_eq!(pattern.build(&params).unwrap(), "/files/a:b%2Fc%20d");

        params.insert("name".into(), "..".into());
        assert_eq!(pattern.build(&params).unwrap_err(), "name");
    }
}
