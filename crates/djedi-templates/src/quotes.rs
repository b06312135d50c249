/// Find positions of a delimiter character in `s`, skipping occurrences inside
/// single- or double-quoted regions.
///
/// When `handle_escapes` is true, `\` inside a quoted region escapes the next
/// character (so `\"` does not close the quote).
///
/// The callback receives the byte index of each unquoted delimiter found.
/// Return `true` from the callback to stop early.
pub(crate) fn for_each_unquoted(
    s: &str,
    delimiter: impl Fn(char) -> bool,
    handle_escapes: bool,
    mut cb: impl FnMut(usize) -> bool,
) {
    let mut quote: Option<char> = None;
    let mut escape = false;

    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if handle_escapes && quote.is_some() => {
                escape = true;
            }
            '"' | '\'' if quote == Some(ch) => {
                quote = None;
            }
            '"' | '\'' if quote.is_none() => {
                quote = Some(ch);
            }
            _ if quote.is_some() => {}
            _ if delimiter(ch) => {
                if cb(idx) {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Split `s` on whitespace while respecting quoted regions (with escape handling).
///
/// Returns owned strings for each whitespace-delimited token.
pub(crate) fn split_on_whitespace(s: &str) -> Vec<String> {
    let mut pieces = Vec::with_capacity((s.len() / 8).clamp(2, 8));
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut escape = false;

    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if quote.is_some() => escape = true,
            '"' | '\'' if quote == Some(ch) => quote = None,
            '"' | '\'' if quote.is_none() => {
                quote = Some(ch);
                start.get_or_insert(idx);
            }
            c if quote.is_none() && c.is_whitespace() => {
                if let Some(s_start) = start.take() {
                    pieces.push(s[s_start..idx].to_owned());
                }
            }
            _ => {
                start.get_or_insert(idx);
            }
        }
    }
    if let Some(s_start) = start {
        pieces.push(s[s_start..].to_owned());
    }
    pieces
}

/// Strip the surrounding quotes of a string literal and resolve `\"`, `\'`
/// and `\\` escapes. Returns `None` when `s` is not a quoted literal.
pub(crate) fn unescape_string_literal(s: &str) -> Option<String> {
    let quote = s.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if s.len() < 2 || !s.ends_with(quote) {
        return None;
    }

    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some(&next) if next == quote || next == '\\' => {
                    out.push(next);
                    chars.next();
                }
                _ => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
    Some(out)
}
