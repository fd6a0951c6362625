//! Whitespace normalization for extracted paragraph text.
//!
//! Markup indentation and hard line breaks survive tag stripping, so paragraph
//! text is usually full of runs of spaces and newlines. [`collapse_whitespace`]
//! folds every run of Unicode whitespace (including no-break spaces) into a
//! single ASCII space and trims both ends.
//!
//! ```rust
//! use extract::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  Он\n   шел\u{a0}домой. "), "Он шел домой.");
//! ```

/// Folds whitespace runs into single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
