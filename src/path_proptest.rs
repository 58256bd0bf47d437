//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{
        extension_of, fs_to_web, has_extension, is_within, is_wildcard, normalize, segments,
        AssetClass, SCRIPT_EXTENSIONS, STYLE_EXTENSIONS, TEMPLATE_EXTENSIONS,
    };
    use proptest::prelude::*;
    use std::path::{Component, Path, PathBuf};

    fn segment() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => "[a-z_]{1,8}",
            1 => Just("..".to_string()),
            1 => Just(".".to_string()),
        ]
    }

    fn relative_expr() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(segment(), 0..8)
    }

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: a normalized absolute path has no `.` or `..` components
        #[test]
        fn normalize_absolute_has_no_dot_components(parts in relative_expr()) {
            let path = parts.iter().fold(PathBuf::from("/addons"), |acc, p| acc.join(p));
            let normalized = normalize(&path);
            for component in normalized.components() {
                prop_assert!(
                    !matches!(component, Component::CurDir | Component::ParentDir),
                    "{:?} kept a dot component",
                    normalized
                );
            }
        }

        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(parts in relative_expr()) {
            let path = parts.iter().fold(PathBuf::from("/addons"), |acc, p| acc.join(p));
            let once = normalize(&path);
            prop_assert_eq!(normalize(&once), once);
        }

        /// Property: paths without dot segments are left unchanged
        #[test]
        fn normalize_preserves_plain_paths(parts in prop::collection::vec("[a-z_]{1,8}", 0..6)) {
            let path = parts.iter().fold(PathBuf::from("/addons"), |acc, p| acc.join(p));
            prop_assert_eq!(normalize(&path), path);
        }
    }

    // ============================================================================
    // is_within property tests
    // ============================================================================

    proptest! {
        /// Property: whatever the expression, a path judged inside the
        /// component root still starts with it after normalization
        #[test]
        fn is_within_implies_prefix(parts in relative_expr()) {
            let root = Path::new("/addons/web");
            let path = parts.iter().fold(PathBuf::from("/addons"), |acc, p| acc.join(p));
            if is_within(root, &path) {
                prop_assert!(normalize(&path).starts_with(root));
                prop_assert_ne!(normalize(&path), root.to_path_buf());
            }
        }

        /// Property: a sibling whose name extends the component name is never inside
        #[test]
        fn sibling_prefix_is_outside(
            suffix in "[a-z_]{1,6}",
            rest in prop::collection::vec("[a-z]{1,6}", 0..4),
        ) {
            let root = Path::new("/addons/web");
            let sibling = format!("/addons/web{}", suffix);
            let path = rest.iter().fold(PathBuf::from(sibling), |acc, p| acc.join(p));
            prop_assert!(!is_within(root, &path));
        }

        /// Property: plain descendants are always inside
        #[test]
        fn descendants_are_inside(rest in prop::collection::vec("[a-z_]{1,6}", 1..5)) {
            let root = Path::new("/addons/web");
            let path = rest.iter().fold(root.to_path_buf(), |acc, p| acc.join(p));
            prop_assert!(is_within(root, &path));
        }
    }

    // ============================================================================
    // expression classification property tests
    // ============================================================================

    proptest! {
        /// Property: expressions without metacharacters are never wildcards
        #[test]
        fn plain_expressions_are_not_wildcards(expr in "[a-z_/.]{0,30}") {
            prop_assert!(!is_wildcard(&expr));
        }

        /// Property: any star makes an expression a wildcard
        #[test]
        fn star_makes_wildcard(prefix in "[a-z/]{0,10}", suffix in "[a-z/.]{0,10}") {
            let expr = format!("{}*{}", prefix, suffix);
            prop_assert!(is_wildcard(&expr));
        }

        /// Property: fs_to_web output never contains a backslash and keeps its length
        #[test]
        fn fs_to_web_has_no_backslash(input in ".*") {
            let result = fs_to_web(&input);
            prop_assert!(!result.contains('\\'));
            prop_assert_eq!(result.len(), input.len());
        }

        /// Property: segments are never empty and never contain a slash
        #[test]
        fn segments_are_clean(expr in "[a-z/]{0,30}") {
            for part in segments(&expr) {
                prop_assert!(!part.is_empty());
                prop_assert!(!part.contains('/'));
            }
        }

        /// Property: every known extension has exactly one asset class
        #[test]
        fn known_extensions_classify(
            stem in "[a-z]{1,8}",
            ext in prop::sample::select(
                [SCRIPT_EXTENSIONS, STYLE_EXTENSIONS, TEMPLATE_EXTENSIONS].concat()
            ),
        ) {
            let path = format!("web/static/src/{}.{}", stem, ext);
            prop_assert_eq!(extension_of(&path), Some(ext));
            let class = AssetClass::of_path(&path);
            prop_assert!(class.is_some());
            prop_assert_eq!(
                has_extension(&path, TEMPLATE_EXTENSIONS),
                class == Some(AssetClass::Template)
            );
        }
    }
}
