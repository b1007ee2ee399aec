//! Assertion macros for friendship views
//!
//! The macros call methods at the use site, so they work with any value
//! exposing `relationship_of` and `edge_id_for`.

/// Assert the relationship a view reports for a profile
#[macro_export]
macro_rules! assert_relationship {
    ($view:expr, $profile_id:expr, $expected:expr) => {
        assert_eq!(
            $view.relationship_of(&$profile_id),
            Some($expected),
            "Expected {:?} to be {:?}",
            $profile_id,
            $expected
        )
    };
}

/// Assert that a view holds no edge to a profile
#[macro_export]
macro_rules! assert_unlinked {
    ($view:expr, $profile_id:expr) => {
        assert!(
            $view.edge_id_for(&$profile_id).is_none(),
            "Expected no edge to {:?}",
            $profile_id
        )
    };
}
