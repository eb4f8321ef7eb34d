//! Arbitrary value decoding and data type inference.

use once_cell::sync::Lazy;
use phf::phf_set;
use std::str::FromStr;

/// The kinds of value an arbitrary `[...]` may be interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Color,
    Length,
    Percentage,
    Number,
    Integer,
    Ratio,
    Url,
    Image,
    Position,
    BgSize,
    LineWidth,
    Angle,
    FamilyName,
    GenericName,
    AbsoluteSize,
    RelativeSize,
    Vector,
    Any,
}

impl FromStr for DataType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "color" => DataType::Color,
            "length" => DataType::Length,
            "percentage" => DataType::Percentage,
            "number" => DataType::Number,
            "integer" => DataType::Integer,
            "ratio" => DataType::Ratio,
            "url" => DataType::Url,
            "image" => DataType::Image,
            "position" => DataType::Position,
            "bg-size" => DataType::BgSize,
            "line-width" => DataType::LineWidth,
            "angle" => DataType::Angle,
            "family-name" => DataType::FamilyName,
            "generic-name" => DataType::GenericName,
            "absolute-size" => DataType::AbsoluteSize,
            "relative-size" => DataType::RelativeSize,
            "vector" => DataType::Vector,
            "any" => DataType::Any,
            _ => return Err(()),
        })
    }
}

static NAMED_COLORS: phf::Set<&'static str> = phf_set! {
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque",
    "black", "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue",
    "chartreuse", "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan",
    "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey",
    "darkkhaki", "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred",
    "darksalmon", "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey",
    "darkturquoise", "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey",
    "dodgerblue", "firebrick", "floralwhite", "forestgreen", "fuchsia", "gainsboro",
    "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow", "grey", "honeydew",
    "hotpink", "indianred", "indigo", "ivory", "khaki", "lavender", "lavenderblush",
    "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan",
    "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey", "lightpink",
    "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray", "lightslategrey",
    "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon",
    "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen",
    "mediumslateblue", "mediumspringgreen", "mediumturquoise", "mediumvioletred",
    "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite", "navy",
    "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru",
    "pink", "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown",
    "royalblue", "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna",
    "silver", "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen",
    "steelblue", "tan", "teal", "thistle", "tomato", "turquoise", "violet", "wheat",
    "white", "whitesmoke", "yellow", "yellowgreen", "transparent", "currentcolor",
    "canvas", "canvastext", "linktext", "visitedtext", "activetext", "buttonface",
    "buttontext", "buttonborder", "field", "fieldtext", "highlight", "highlighttext",
    "selecteditem", "selecteditemtext", "mark", "marktext", "graytext", "accentcolor",
    "accentcolortext",
};

static COLOR_FUNCTIONS: &[&str] = &[
    "rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "lab(", "lch(", "oklab(", "oklch(",
    "color(", "color-mix(", "light-dark(",
];

static LENGTH_UNITS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "cm", "mm", "Q", "in", "pc", "pt", "px", "em", "ex", "ch", "rem", "lh", "rlh", "vw",
        "vh", "vmin", "vmax", "vb", "vi", "svw", "svh", "lvw", "lvh", "dvw", "dvh", "cqw",
        "cqh", "cqi", "cqb", "cqmin", "cqmax",
    ]
});

const MATH_FUNCTIONS: &[&str] = &[
    "calc", "min", "max", "clamp", "mod", "rem", "sin", "cos", "tan", "asin", "acos",
    "atan", "atan2", "pow", "sqrt", "hypot", "log", "exp", "round",
];

/// Decodes the raw text of an arbitrary value: `_` becomes a space (`\_`
/// stays an underscore), `url()` contents are kept verbatim and operators
/// inside math functions are re-spaced.
///
/// ```
/// use tailor::value::decode_arbitrary_value;
///
/// assert_eq!(decode_arbitrary_value("1px_solid_red"), "1px solid red");
/// assert_eq!(decode_arbitrary_value("calc(100%-2rem)"), "calc(100% - 2rem)");
/// assert_eq!(decode_arbitrary_value("a\\_b"), "a_b");
/// ```
pub fn decode_arbitrary_value(input: &str) -> String {
    if input.starts_with("url(") && input.ends_with(')') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' if chars.peek().is_some_and(|&(_, next)| next == '_') => {
                chars.next();
                out.push('_');
            }
            '_' => out.push(' '),
            'u' if input[idx..].starts_with("url(") => {
                let end = find_closing(input, idx + 3).unwrap_or(input.len() - 1);
                out.push_str(&input[idx..=end]);
                while chars.peek().is_some_and(|&(i, _)| i <= end) {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }
    if MATH_FUNCTIONS.iter().any(|f| out.contains(&format!("{}(", f))) {
        add_whitespace_around_math_operators(&out)
    } else {
        out
    }
}

fn find_closing(input: &str, open: usize) -> Option<usize> {
    let mut depth = 0;
    for (idx, c) in input[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn add_whitespace_around_math_operators(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    // Stack of "is math context" flags for each open paren.
    let mut stack: Vec<bool> = Vec::new();
    let mut word = String::new();

    for (idx, &c) in chars.iter().enumerate() {
        match c {
            '(' => {
                let function = word.trim_start_matches(|c: char| !c.is_alphanumeric());
                let in_math = MATH_FUNCTIONS.contains(&function)
                    || (function.is_empty() && stack.last().copied().unwrap_or(false));
                stack.push(in_math);
                word.clear();
                out.push(c);
            }
            ')' => {
                stack.pop();
                word.clear();
                out.push(c);
            }
            '+' | '-' | '*' | '/' if stack.last().copied().unwrap_or(false) => {
                let prev = out.chars().last();
                let next = chars.get(idx + 1).copied();
                let is_sign = c == '+' || c == '-';
                let unary = matches!(prev, None | Some('(') | Some(' ') | Some(','))
                    || prev.is_some_and(|p| matches!(p, '*' | '/' | '+'));
                let in_identifier = c == '-'
                    && (word
                        .chars()
                        .next()
                        .is_some_and(|first| first.is_alphabetic() || first == '-')
                        || next == Some('-'));
                let exponent = is_sign
                    && prev.is_some_and(|p| p == 'e' || p == 'E')
                    && out
                        .chars()
                        .rev()
                        .nth(1)
                        .is_some_and(|p| p.is_ascii_digit());
                if in_identifier || exponent {
                    out.push(c);
                    word.push(c);
                    continue;
                }
                if is_sign && unary {
                    out.push(c);
                } else {
                    if !out.ends_with(' ') {
                        out.push(' ');
                    }
                    out.push(c);
                    if next != Some(' ') {
                        out.push(' ');
                    }
                }
                word.clear();
            }
            ',' => {
                out.push(c);
                word.clear();
            }
            _ => {
                if c.is_whitespace() {
                    word.clear();
                } else {
                    word.push(c);
                }
                out.push(c);
            }
        }
    }
    out
}

/// Returns `true` if `value` looks like a color.
pub fn is_color(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    (lower.starts_with('#') && lower.len() > 1 && lower[1..].chars().all(|c| c.is_ascii_hexdigit()))
        || NAMED_COLORS.contains(lower.as_str())
        || COLOR_FUNCTIONS.iter().any(|f| lower.starts_with(f))
}

fn is_number(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_length(value: &str) -> bool {
    if value == "0" {
        return true;
    }
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(end);
    is_number(number) && LENGTH_UNITS.contains(&unit)
}

fn is_math(value: &str) -> bool {
    MATH_FUNCTIONS
        .iter()
        .any(|f| value.starts_with(f) && value[f.len()..].starts_with('('))
}

pub fn is_percentage(value: &str) -> bool {
    value.strip_suffix('%').is_some_and(is_number)
}

pub fn is_positive_integer(value: &str) -> bool {
    value.parse::<u64>().is_ok() && !value.starts_with('+')
}

/// A spacing multiplier: a non-negative number in 0.25 increments.
pub fn is_spacing_multiplier(value: &str) -> bool {
    value
        .parse::<f64>()
        .is_ok_and(|n| n >= 0.0 && (n * 4.0).fract() == 0.0 && !value.starts_with('+'))
}

/// Returns `true` for a `a/b` fraction of positive integers.
pub fn is_fraction(value: &str) -> bool {
    match value.split_once('/') {
        Some((a, b)) => is_positive_integer(a) && is_positive_integer(b) && b != "0",
        None => false,
    }
}

fn matches(value: &str, data_type: DataType) -> bool {
    match data_type {
        DataType::Color => is_color(value),
        DataType::Length => is_length(value) || is_math(value),
        DataType::Percentage => is_percentage(value) || is_math(value),
        DataType::Number => is_number(value) || is_math(value),
        DataType::Integer => value.parse::<i64>().is_ok() || is_math(value),
        DataType::Ratio => {
            is_fraction(&value.replace(' ', "")) || is_number(value)
        }
        DataType::Url => value.starts_with("url("),
        DataType::Image => {
            value.starts_with("url(")
                || value.contains("gradient(")
                || value.starts_with("image(")
                || value.starts_with("image-set(")
                || value.starts_with("cross-fade(")
        }
        DataType::Position => value.split_whitespace().all(|part| {
            matches!(part, "top" | "right" | "bottom" | "left" | "center")
                || is_length(part)
                || is_percentage(part)
        }),
        DataType::BgSize => {
            matches!(value, "cover" | "contain" | "auto")
                || value
                    .split_whitespace()
                    .all(|part| part == "auto" || is_length(part) || is_percentage(part))
        }
        DataType::LineWidth => {
            matches!(value, "thin" | "medium" | "thick") || is_length(value) || is_math(value)
        }
        DataType::Angle => {
            ["deg", "rad", "grad", "turn"]
                .iter()
                .any(|unit| value.strip_suffix(unit).is_some_and(is_number))
        }
        DataType::FamilyName => {
            !is_color(value) && !is_number(value) && !value.starts_with("var(")
        }
        DataType::GenericName => matches!(
            value,
            "serif" | "sans-serif" | "monospace" | "cursive" | "fantasy" | "system-ui"
                | "ui-serif" | "ui-sans-serif" | "ui-monospace" | "ui-rounded" | "math"
                | "emoji" | "fangsong"
        ),
        DataType::AbsoluteSize => matches!(
            value,
            "xx-small" | "x-small" | "small" | "medium" | "large" | "x-large" | "xx-large"
                | "xxx-large"
        ),
        DataType::RelativeSize => matches!(value, "larger" | "smaller"),
        DataType::Vector => {
            let parts: Vec<&str> = value.split_whitespace().collect();
            parts.len() == 3 && parts.iter().all(|p| is_number(p))
        }
        DataType::Any => true,
    }
}

/// Returns the first of `types` that `value` satisfies.
///
/// `var()` references are ambiguous and never infer to anything; callers
/// treat them as the utility's primary type.
pub fn infer_data_type(value: &str, types: &[DataType]) -> Option<DataType> {
    if value.starts_with("var(") {
        return None;
    }
    types.iter().copied().find(|&data_type| matches(value, data_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn math_operators_are_spaced() {
        assert_eq!(
            decode_arbitrary_value("calc(1px+2px)"),
            "calc(1px + 2px)"
        );
        assert_eq!(
            decode_arbitrary_value("calc(var(--a)*-1)"),
            "calc(var(--a) * -1)"
        );
        assert_eq!(
            decode_arbitrary_value("min(100%,calc(50vw-1rem))"),
            "min(100%,calc(50vw - 1rem))"
        );
        assert_eq!(
            decode_arbitrary_value("calc(1e-3*2px)"),
            "calc(1e-3 * 2px)"
        );
    }

    #[test]
    fn urls_are_left_alone() {
        assert_eq!(decode_arbitrary_value("url(/a_b.png)"), "url(/a_b.png)");
        assert_eq!(
            decode_arbitrary_value("url(/a_b.png),_none"),
            "url(/a_b.png), none"
        );
    }

    #[test]
    fn infers_types_in_order() {
        let types = [DataType::Color, DataType::Length, DataType::Percentage];
        assert_eq!(infer_data_type("#0088cc", &types), Some(DataType::Color));
        assert_eq!(infer_data_type("red", &types), Some(DataType::Color));
        assert_eq!(infer_data_type("12px", &types), Some(DataType::Length));
        assert_eq!(infer_data_type("50%", &types), Some(DataType::Percentage));
        assert_eq!(infer_data_type("var(--x)", &types), None);
        assert_eq!(infer_data_type("foo", &types), None);
    }

    #[test]
    fn number_predicates() {
        assert!(is_spacing_multiplier("2.5"));
        assert!(!is_spacing_multiplier("2.3"));
        assert!(is_fraction("1/2"));
        assert!(!is_fraction("1/0"));
        assert!(is_positive_integer("10"));
        assert!(!is_positive_integer("-10"));
    }

    #[test]
    fn data_type_hints_parse() {
        assert_eq!("length".parse(), Ok(DataType::Length));
        assert_eq!("family-name".parse(), Ok(DataType::FamilyName));
        assert!("banana".parse::<DataType>().is_err());
    }
}
