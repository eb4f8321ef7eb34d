//! Bracket-aware splitting.
//!
//! Class names and selectors nest brackets, parentheses and quotes, so a
//! plain `str::split` cuts `[@media(width>=1px)]:flex` in the wrong place.
//! [`segment`] only splits on separators at nesting depth zero.

/// Splits `input` on `separator` wherever it appears outside of `()`, `[]`,
/// `{}` and quoted strings. Backslash-escaped characters never split.
///
/// ```rust
/// use csstree::segment;
///
/// assert_eq!(segment("hover:[&:focus]:flex", ':'), vec!["hover", "[&:focus]", "flex"]);
/// assert_eq!(segment("a, :is(b, c)", ','), vec!["a", " :is(b, c)"]);
/// ```
pub fn segment(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ if c == separator && stack.is_empty() => {
                parts.push(&input[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Returns `true` if every bracket in `input` is balanced and no quote is
/// left open.
pub fn is_balanced(input: &str) -> bool {
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.pop() != Some(c) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty() && quote.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_split_inside_arbitrary_variants() {
        assert_eq!(
            segment("[@media(width>=123px)]:flex", ':'),
            vec!["[@media(width>=123px)]", "flex"]
        );
        assert_eq!(
            segment("nth-[2n+1_of_.foo]:underline", ':'),
            vec!["nth-[2n+1_of_.foo]", "underline"]
        );
    }

    #[test]
    fn escaped_separators_do_not_split() {
        assert_eq!(segment("a\\:b:c", ':'), vec!["a\\:b", "c"]);
    }

    #[test]
    fn balance_check() {
        assert!(is_balanced("calc(1px+(2px))"));
        assert!(!is_balanced("calc(1px"));
        assert!(!is_balanced("a]"));
    }
}
