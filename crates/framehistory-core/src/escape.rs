//! HTML escaping for text placed inside generated markup.

/// Escapes the five HTML-significant characters `& < > " '`.
///
/// The ampersand is replaced first so entities produced by the later
/// replacements are not escaped twice.
///
/// # Example
///
/// ```rust
/// use framehistory_core::html_escape;
///
/// assert_eq!(html_escape("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
/// ```
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
