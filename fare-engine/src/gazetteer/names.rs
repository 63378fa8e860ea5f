//! Identifier normalization.

/// Normalize a place id or display name for lookup.
///
/// Lowercases, collapses every run of non-word characters into a single
/// `_` and trims underscores from both ends. Word characters are Unicode
/// alphanumerics plus `_`, so Cyrillic names keep their letters.
///
/// # Examples
///
/// ```
/// use fare_engine::gazetteer::normalize;
///
/// assert_eq!(normalize("Iberostar Varadero"), "iberostar_varadero");
/// assert_eq!(normalize("  GrandMemories & Santuari "), "grandmemories_santuari");
/// assert_eq!(normalize("Бар Floridita"), "бар_floridita");
/// ```
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut gap = false;

    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            if gap && !out.is_empty() {
                out.push('_');
            }
            gap = false;
            out.push(c);
        } else {
            gap = true;
        }
    }

    out.trim_matches('_').to_string()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn idempotent(s in "\\PC{0,40}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn never_has_outer_underscores(s in "\\PC{0,40}") {
            let n = normalize(&s);
            prop_assert!(!n.starts_with('_'));
            prop_assert!(!n.ends_with('_'));
        }
    }
}
