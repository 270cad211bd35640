use ammonia;

/// Clean HTML content using the ammonia library.
///
/// This employs a whitelist-based sanitization strategy: it preserves safe tags
/// (like <b>, <p>) while stripping dangerous tags (like <script>, <iframe>)
/// and malicious attributes (like onclick).
///
/// Plain text passes through unchanged, so trimming semantics of callers are
/// preserved. This serves as a fail-safe against Stored XSS for clients that
/// render user text as HTML.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
