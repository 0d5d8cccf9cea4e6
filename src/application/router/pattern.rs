//! Route matchers

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use http::{header, Method, Request};

/// Content type of the server-components payload.
pub const COMPONENT_CONTENT_TYPE: &str = "text/x-component";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, numeric: bool },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid path pattern '{pattern}': {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub reason: &'static str,
}

/// A path like `/todos/:id`. Parameters capture one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let invalid = |reason| PatternError {
            pattern: pattern.to_string(),
            reason,
        };
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                match part.strip_prefix(':') {
                    Some("") => return Err(invalid("empty parameter name")),
                    Some(name) => segments.push(Segment::Param {
                        name: name.to_string(),
                        numeric: false,
                    }),
                    None if part.is_empty() => return Err(invalid("empty segment")),
                    None => segments.push(Segment::Literal(part.to_string())),
                }
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Convert parameter `name` to a number when captured.
    pub fn with_numeric(mut self, name: &str) -> Self {
        for segment in &mut self.segments {
            if let Segment::Param { name: param, numeric } = segment {
                if param == name {
                    *numeric = true;
                }
            }
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a request path (no query string). One trailing slash is
    /// ignored.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let rest = path.strip_prefix('/')?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param { .. } if part.is_empty() => return None,
                Segment::Param { name, numeric: false } => {
                    params.insert(name, ParamValue::Text(part.to_string()));
                }
                Segment::Param { name, numeric: true } => {
                    // A failed conversion leaves the parameter absent.
                    if let Ok(number) = part.parse::<i64>() {
                        params.insert(name, ParamValue::Number(number));
                    }
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Number(i64),
}

/// Parameters captured by a path pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: BTreeMap<String, ParamValue>,
}

impl RouteParams {
    fn insert(&mut self, name: &str, value: ParamValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn number(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ParamValue::Text(s) => Some(s),
            ParamValue::Number(_) => None,
        }
    }

    /// The numeric `id` parameter
    pub fn id(&self) -> Option<i64> {
        self.number("id")
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPredicate {
    /// `Accept` lists the media type
    Accepts(String),
}

impl HeaderPredicate {
    pub fn accepts(media_type: impl Into<String>) -> Self {
        HeaderPredicate::Accepts(media_type.into())
    }

    pub fn matches(&self, request: &Request<Bytes>) -> bool {
        match self {
            HeaderPredicate::Accepts(wanted) => request
                .headers()
                .get_all(header::ACCEPT)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .flat_map(|value| value.split(','))
                .filter_map(|item| item.split(';').next())
                .any(|media| media.trim().eq_ignore_ascii_case(wanted)),
        }
    }
}

/// `(methods, path pattern, header predicate)`; absent parts match anything.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    methods: Option<Vec<Method>>,
    path: Option<PathPattern>,
    header: Option<HeaderPredicate>,
}

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: None,
            path: None,
            header: None,
        }
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    pub fn path(mut self, pattern: PathPattern) -> Self {
        self.path = Some(pattern);
        self
    }

    pub fn header(mut self, predicate: HeaderPredicate) -> Self {
        self.header = Some(predicate);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, request: &Request<Bytes>) -> Option<RouteParams> {
        if let Some(methods) = &self.methods {
            if !methods.contains(request.method()) {
                return None;
            }
        }
        if let Some(header) = &self.header {
            if !header.matches(request) {
                return None;
            }
        }
        match &self.path {
            Some(pattern) => pattern.matches(request.uri().path()),
            None => Some(RouteParams::default()),
        }
    }
}

/// `GET|POST /`, `GET|POST /todos/:id`, then any request accepting the
/// component payload. Component requests under `/todos/:id` keep the id
/// whatever their method.
pub fn default_routes() -> Vec<Route> {
    let index = PathPattern::parse("/").expect("static route pattern");
    let todo = PathPattern::parse("/todos/:id")
        .expect("static route pattern")
        .with_numeric("id");

    vec![
        Route::new("index")
            .methods([Method::GET, Method::POST])
            .path(index),
        Route::new("todo")
            .methods([Method::GET, Method::POST])
            .path(todo.clone()),
        Route::new("todo-component")
            .path(todo)
            .header(HeaderPredicate::accepts(COMPONENT_CONTENT_TYPE)),
        Route::new("component").header(HeaderPredicate::accepts(COMPONENT_CONTENT_TYPE)),
    ]
}
