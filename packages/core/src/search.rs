// ABOUTME: Helpers for case-insensitive substring search
// ABOUTME: Builds escaped LIKE patterns shared by every listing query

/// Escape character used in every `LIKE ... ESCAPE '\'` clause
pub const LIKE_ESCAPE: char = '\\';

/// Build a `%term%` pattern for a case-insensitive substring match.
///
/// SQLite's `LIKE` treats `%` and `_` as wildcards, so both are escaped and the
/// query must carry `ESCAPE '\'`. Returns `None` for blank input so callers can
/// skip the clause entirely.
pub fn like_pattern(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(trimmed.len() + 2);
    pattern.push('%');
    for ch in trimmed.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    Some(pattern)
}
