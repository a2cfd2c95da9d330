//! Internal helpers for name normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! normalization rules so category lookups stay consistent across ops.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

const MAX_CATEGORY_NAME_LEN: usize = 64;

/// Normalize a category name for display: NFKC, trimmed, internal
/// whitespace collapsed to single spaces.
pub(crate) fn normalize_category_display(value: &str) -> ResultEngine<String> {
    let normalized: String = value.nfkc().collect();
    let display = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
    if display.is_empty() {
        return Err(EngineError::InvalidName(
            "category name must not be empty".to_string(),
        ));
    }
    if display.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "category name longer than {MAX_CATEGORY_NAME_LEN} characters"
        )));
    }
    Ok(display)
}

/// Normalize a display name into the key used for duplicate detection.
pub(crate) fn normalize_category_key(display: &str) -> String {
    display.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_collapses_whitespace() {
        assert_eq!(
            normalize_category_display("  Dining \t Out ").unwrap(),
            "Dining Out"
        );
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(normalize_category_display("   ").is_err());
    }

    #[test]
    fn key_is_case_insensitive() {
        assert_eq!(normalize_category_key("Dining Out"), "dining out");
    }
}
