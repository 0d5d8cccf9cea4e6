//! Module matchers for layer associations
//!
//! Glob patterns use gitignore semantics via the `ignore` crate, anchored at
//! the build context directory. Regex patterns match the module path with
//! forward slashes.

use std::fmt;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use regex::Regex;

use super::ModuleId;

/// Pattern-based module predicate.
#[derive(Clone)]
pub enum Matcher {
    Glob {
        pattern: String,
        root: PathBuf,
        matcher: Gitignore,
    },
    Regex(Regex),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MatcherError {
    #[error("invalid glob '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
}

impl Matcher {
    /// Build a glob matcher anchored at `root`.
    pub fn glob(root: &Path, pattern: &str) -> Result<Self, MatcherError> {
        let invalid = |message: String| MatcherError::InvalidGlob {
            pattern: pattern.to_string(),
            message,
        };

        let mut builder = GitignoreBuilder::new(root);
        builder
            .add_line(None, pattern)
            .map_err(|e| invalid(e.to_string()))?;
        let matcher = builder.build().map_err(|e| invalid(e.to_string()))?;

        Ok(Matcher::Glob {
            pattern: pattern.to_string(),
            root: root.to_path_buf(),
            matcher,
        })
    }

    pub fn regex(pattern: &str) -> Result<Self, MatcherError> {
        Regex::new(pattern)
            .map(Matcher::Regex)
            .map_err(|e| MatcherError::InvalidRegex {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    pub fn is_match(&self, module: &ModuleId) -> bool {
        match self {
            Matcher::Glob { root, matcher, .. } => {
                // Paths outside the context never match an anchored glob.
                let Ok(relative) = module.as_path().strip_prefix(root) else {
                    return false;
                };
                matcher.matched(relative, false).is_ignore()
            }
            Matcher::Regex(regex) => regex.is_match(&module.to_slash_string()),
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            Matcher::Glob { pattern, .. } => pattern,
            Matcher::Regex(regex) => regex.as_str(),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Glob { pattern, root, .. } => f
                .debug_struct("Glob")
                .field("pattern", pattern)
                .field("root", root)
                .finish(),
            Matcher::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Glob { pattern, .. } => write!(f, "glob '{}'", pattern),
            Matcher::Regex(regex) => write!(f, "regex '{}'", regex.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matches_inside_root() {
        let matcher = Matcher::glob(Path::new("/app"), "src/ssr/**/*.tsx").unwrap();
        assert!(matcher.is_match(&ModuleId::new("/app/src/ssr/entry.tsx")));
        assert!(matcher.is_match(&ModuleId::new("/app/src/ssr/nested/page.tsx")));
        assert!(!matcher.is_match(&ModuleId::new("/app/src/rsc/entry.tsx")));
    }

    #[test]
    fn glob_never_matches_outside_root() {
        let matcher = Matcher::glob(Path::new("/app"), "*.tsx").unwrap();
        assert!(!matcher.is_match(&ModuleId::new("/elsewhere/entry.tsx")));
    }

    #[test]
    fn regex_matches_slash_path() {
        let matcher = Matcher::regex(r"entry\.ssr\.tsx$").unwrap();
        assert!(matcher.is_match(&ModuleId::new("/app/src/framework/entry.ssr.tsx")));
        assert!(!matcher.is_match(&ModuleId::new("/app/src/framework/entry.rsc.tsx")));
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = Matcher::regex("(").unwrap_err();
        assert!(matches!(err, MatcherError::InvalidRegex { .. }));
    }
}
