//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Parse `/literal/:name` templates into segments at startup
//! - Match a request path and bind named segments
//! - Render a path back from parameters (path generation)
//!
//! # Design Decisions
//! - Purely syntactic: no regex, no type coercion, bound values are strings
//! - A placeholder never spans a `/` and never contains a `.`
//! - The optional format suffix (`.json`) is only accepted on the last segment

use std::borrow::Cow;
use std::fmt;

use crate::routing::error::RoutingError;
use crate::routing::route::Params;

/// Name of the parameter bound by the optional format suffix.
pub const FORMAT_PARAM: &str = "format";

/// One compiled segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path pattern such as `/method_test/:action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
    optional_format: bool,
}

impl PathPattern {
    /// Compile a pattern without a format suffix.
    pub fn parse(pattern: &str) -> Result<Self, RoutingError> {
        let invalid = |reason: &str| RoutingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for raw in rest.split('/') {
                if raw.is_empty() {
                    return Err(invalid("empty segment"));
                }
                let segment = match raw.strip_prefix(':') {
                    Some(name) => {
                        if !is_param_name(name) {
                            return Err(invalid("invalid placeholder name"));
                        }
                        if segments.contains(&Segment::Param(name.to_string())) {
                            return Err(invalid("duplicate placeholder name"));
                        }
                        Segment::Param(name.to_string())
                    }
                    None => {
                        if raw.contains(':') || raw.contains('.') {
                            return Err(invalid("literal segment contains ':' or '.'"));
                        }
                        Segment::Literal(raw.to_string())
                    }
                };
                segments.push(segment);
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
            optional_format: false,
        })
    }

    /// Compile a pattern that also accepts a `(.:format)` suffix.
    ///
    /// The root pattern `/` has no last segment and never takes a format.
    pub fn parse_with_format(pattern: &str) -> Result<Self, RoutingError> {
        let mut compiled = Self::parse(pattern)?;
        if compiled.has_param(FORMAT_PARAM) {
            return Err(RoutingError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "placeholder `format` is reserved".to_string(),
            });
        }
        compiled.optional_format = !compiled.segments.is_empty();
        Ok(compiled)
    }

    /// The pattern as written at registration.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn accepts_format(&self) -> bool {
        self.optional_format
    }

    /// Returns true if the pattern declares a placeholder with this name.
    pub fn has_param(&self, name: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Param(p) if p == name))
    }

    /// Match an already normalized path, returning the bound parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let parts = split_path(path)?;
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        let last = parts.len().saturating_sub(1);

        for (i, (segment, part)) in self.segments.iter().zip(parts.iter()).enumerate() {
            let mut part = *part;

            if i == last && self.optional_format {
                if let Some((stem, format)) = part.split_once('.') {
                    if format.is_empty() || format.contains('.') {
                        return None;
                    }
                    params.insert(FORMAT_PARAM, format);
                    part = stem;
                }
            }

            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() || part.contains('.') {
                        return None;
                    }
                    params.insert(name, part);
                }
            }
        }

        Some(params)
    }

    /// Render a concrete path, substituting every placeholder from `params`.
    ///
    /// `route` only labels the error when a parameter is missing.
    pub fn render(&self, route: &str, params: &Params) -> Result<String, RoutingError> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(lit) => path.push_str(lit),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| RoutingError::MissingParam {
                        route: route.to_string(),
                        param: name.clone(),
                    })?;
                    path.push_str(value);
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }

        if self.optional_format {
            if let Some(format) = params.get(FORMAT_PARAM) {
                path.push('.');
                path.push_str(format);
            }
        }

        Ok(path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)?;
        if self.optional_format {
            f.write_str("(.:format)")?;
        }
        Ok(())
    }
}

/// Strip the query string and trailing slashes and collapse repeated
/// slashes; the empty path becomes `/`.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let path = path.split_once('?').map_or(path, |(p, _)| p);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Cow::Borrowed("/");
    }
    if !trimmed.contains("//") {
        return Cow::Borrowed(trimmed);
    }

    let mut squeezed = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c == '/' && squeezed.ends_with('/') {
            continue;
        }
        squeezed.push(c);
    }
    Cow::Owned(squeezed)
}

fn split_path(path: &str) -> Option<Vec<&str>> {
    match path.strip_prefix('/')? {
        "" => Some(Vec::new()),
        rest => Some(rest.split('/').collect()),
    }
}

fn is_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
