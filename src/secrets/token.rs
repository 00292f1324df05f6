//! Detection of `ENC[handle]` placeholders in string scalars.

const PREFIX: &str = "ENC[";
const SUFFIX: char = ']';

/// Returns the handle if `scalar` is an encrypted-secret placeholder.
///
/// Only ASCII spaces and tabs are trimmed before matching. The handle is
/// everything between the prefix and the *last* `]`, so `ENC[a]b]` yields
/// `a]b` and `ENC[]` yields the empty handle.
pub fn detect(scalar: &str) -> Option<&str> {
    let trimmed = scalar.trim_matches(|c| c == ' ' || c == '\t');
    trimmed.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)
}

/// Builds the placeholder text for `handle`.
pub fn placeholder(handle: &str) -> String {
    format!("{PREFIX}{handle}{SUFFIX}")
}
