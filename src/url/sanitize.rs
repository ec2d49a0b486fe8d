//! File-name sanitization for storage keys
//!
//! Known limitation: distinct URLs that differ only in characters mapped to
//! `_` produce the same file name, and the later write overwrites the earlier.

/// Characters that cannot appear in a file name on common filesystems
const ILLEGAL_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Extra characters replaced so the `.html` suffix is the only dot
const ADDITIONAL_REPLACED_CHARS: &[char] = &['.'];

/// Converts a URL into a file stem safe for any filesystem
///
/// The `http://` or `https://` prefix is dropped, then every illegal
/// character, control character and `.` becomes `_`.
///
/// # Examples
///
/// ```
/// use html_scraper::url::sanitize_url;
///
/// assert_eq!(sanitize_url("https://example.com/a?b=1"), "example_com_a_b=1");
/// ```
pub fn sanitize_url(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    stripped
        .chars()
        .map(|c| {
            if c.is_control()
                || ILLEGAL_FILENAME_CHARS.contains(&c)
                || ADDITIONAL_REPLACED_CHARS.contains(&c)
            {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Returns the full `.html` file name for a URL
pub fn html_file_name(url: &str) -> String {
    format!("{}.html", sanitize_url(url))
}
