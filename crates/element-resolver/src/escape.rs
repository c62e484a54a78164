//! Literal escaping for the two query languages.
//!
//! Both functions produce a literal that, spliced textually into a query
//! expression, evaluates to exactly the input string. Pure functions, no
//! failure modes.

/// Embed `value` in an XPath expression.
///
/// XPath 1.0 string literals have no escape syntax, so a value containing
/// both quote characters has to be rebuilt with `concat(...)`: the value is
/// split at every quote-character boundary and each segment is wrapped in
/// whichever quote character it does not contain.
pub fn xpath_literal(value: &str) -> String {
    // Quickly handle the common cases.
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }

    let mut parts = Vec::new();
    let mut segment = String::new();
    let mut seen_quote: Option<char> = None;
    for ch in value.chars() {
        if (ch == '\'' || ch == '"') && seen_quote.map_or(false, |q| q != ch) {
            parts.push(wrap_segment(&segment));
            segment.clear();
            seen_quote = None;
        }
        if ch == '\'' || ch == '"' {
            seen_quote = Some(ch);
        }
        segment.push(ch);
    }
    parts.push(wrap_segment(&segment));
    format!("concat({})", parts.join(","))
}

fn wrap_segment(segment: &str) -> String {
    // Tie-break segments containing neither quote toward single quotes,
    // matching the fast path above.
    if segment.contains('\'') {
        format!("\"{segment}\"")
    } else {
        format!("'{segment}'")
    }
}

/// Embed `value` in a CSS selector expression.
///
/// Values free of backslashes and one quote character are simply wrapped;
/// anything else is escaped character-by-character and wrapped in double
/// quotes.
pub fn css_literal(value: &str) -> String {
    if !value.contains('\\') {
        if !value.contains('\'') {
            return format!("'{value}'");
        }
        if !value.contains('"') {
            return format!("\"{value}\"");
        }
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(ch),
        }
    }
    escaped.push('"');
    escaped
}
