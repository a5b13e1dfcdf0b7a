//! Comma-separated tag lists used by the framework and session forms.

/// Split a comma-separated form field into trimmed entries.
///
/// Order and duplicates are preserved. Entries that are empty after
/// trimming are dropped, so a blank field yields an empty list.
///
/// ```
/// use artlab_core::tags::parse_comma_list;
///
/// assert_eq!(parse_comma_list("a, b, b"), vec!["a", "b", "b"]);
/// assert!(parse_comma_list("").is_empty());
/// ```
pub fn parse_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a comma-separated form field into trimmed entries, keeping empty
/// ones. This is how the create form stores its lists: `"a,,b"` becomes
/// `["a", "", "b"]` and a blank field becomes `[""]`.
pub fn split_comma_list(input: &str) -> Vec<String> {
    input.split(',').map(|entry| entry.trim().to_string()).collect()
}

/// Render a tag list back into its form-field representation.
pub fn join_comma_list(entries: &[String]) -> String {
    entries.join(", ")
}
