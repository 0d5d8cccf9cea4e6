//! Property tests for route path patterns.

use proptest::prelude::*;

use stratum::application::router::PathPattern;

proptest! {
    /// PROPERTY: Numeric parameters round through the path intact.
    #[test]
    fn property_numeric_ids_are_captured(id in 0i64..=i64::MAX) {
        let pattern = PathPattern::parse("/todos/:id").unwrap().with_numeric("id");
        let params = pattern.matches(&format!("/todos/{}", id)).unwrap();
        prop_assert_eq!(params.id(), Some(id));
    }

    /// PROPERTY: A non-numeric segment still matches but leaves the id absent.
    #[test]
    fn property_non_numeric_ids_are_absent(segment in "[a-z][a-z0-9]{0,8}") {
        let pattern = PathPattern::parse("/todos/:id").unwrap().with_numeric("id");
        let params = pattern.matches(&format!("/todos/{}", segment)).unwrap();
        prop_assert_eq!(params.id(), None);
        prop_assert!(params.is_empty());
    }

    /// PROPERTY: Matching arbitrary paths never panics, and extra segments
    /// never match.
    #[test]
    fn property_matching_never_panics(path in "(/[a-zA-Z0-9%._-]{0,6}){0,5}") {
        let pattern = PathPattern::parse("/todos/:id").unwrap();
        let _ = pattern.matches(&path);
        let extended = format!("/todos/1{}/extra", path);
        prop_assert!(pattern.matches(&extended).is_none());
    }
}
