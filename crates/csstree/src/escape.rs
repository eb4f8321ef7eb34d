//! Identifier escaping following the CSSOM `CSS.escape()` algorithm.

/// Escapes a string for use as a CSS identifier (e.g. a class name).
///
/// ```rust
/// use csstree::escape;
///
/// assert_eq!(escape("hover:flex"), "hover\\:flex");
/// assert_eq!(escape("w-1/2"), "w-1\\/2");
/// assert_eq!(escape("2xl"), "\\32 xl");
/// ```
pub fn escape(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 8);

    if chars.len() == 1 && chars[0] == '-' {
        return "\\-".to_string();
    }

    for (idx, &c) in chars.iter().enumerate() {
        let code = c as u32;
        if code == 0 {
            out.push('\u{FFFD}');
            continue;
        }
        let leading_digit = c.is_ascii_digit() && (idx == 0 || (idx == 1 && chars[0] == '-'));
        if (0x01..=0x1f).contains(&code) || code == 0x7f || leading_digit {
            out.push_str(&format!("\\{:x} ", code));
            continue;
        }
        if code >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
            continue;
        }
        out.push('\\');
        out.push(c);
    }
    out
}

/// Reverses [`escape`] for simple backslash escapes.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut hex = String::new();
        while hex.len() < 6 && chars.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            hex.push(chars.next().unwrap_or_default());
        }
        if hex.is_empty() {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }
        if chars.peek() == Some(&' ') {
            chars.next();
        }
        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}');
        out.push(decoded);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_brackets_and_specials() {
        assert_eq!(escape("bg-[#0088cc]/50"), "bg-\\[\\#0088cc\\]\\/50");
        assert_eq!(escape("-z-10"), "-z-10");
        assert_eq!(escape("-"), "\\-");
        assert_eq!(escape("flex!"), "flex\\!");
    }

    #[test]
    fn unescape_round_trips_simple_escapes() {
        assert_eq!(unescape("hover\\:flex"), "hover:flex");
        assert_eq!(unescape("\\32 xl"), "2xl");
        assert_eq!(unescape("--spacing-2\\.5"), "--spacing-2.5");
    }
}
