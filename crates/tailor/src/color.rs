//! Color helpers for alpha modifiers.
//!
//! A modifier like `/50` on a color either folds into a literal hex value
//! at compile time or becomes a `color-mix()` expression:
//!
//! | Base            | Alpha | Output                                            |
//! |-----------------|-------|---------------------------------------------------|
//! | `#0088cc`       | `50%` | `#0088cc80`                                       |
//! | `var(--brand)`  | `50%` | `color-mix(in srgb, var(--brand) 50%, transparent)` |

use std::fmt;

/// Error returned when a hex color cannot be parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorParseError {
    pub message: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ColorParseError {}

/// A literal `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    /// Parses a hex color including the leading `#`.
    ///
    /// ```
    /// use tailor::color::HexColor;
    ///
    /// let color = HexColor::parse("#08c").unwrap();
    /// assert_eq!(color.to_string(), "#0088cc");
    /// ```
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let hex = input
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError {
                message: format!("hex colors start with '#': {}", input),
            })?
            .to_lowercase();
        let chars: Vec<char> = hex.chars().collect();
        match chars.len() {
            3 | 4 => {
                let r = parse_hex_digit(chars[0])? * 17;
                let g = parse_hex_digit(chars[1])? * 17;
                let b = parse_hex_digit(chars[2])? * 17;
                let a = match chars.get(3) {
                    Some(&c) => parse_hex_digit(c)? * 17,
                    None => 255,
                };
                Ok(HexColor { r, g, b, a })
            }
            6 | 8 => {
                let r = parse_hex_pair(chars[0], chars[1])?;
                let g = parse_hex_pair(chars[2], chars[3])?;
                let b = parse_hex_pair(chars[4], chars[5])?;
                let a = if chars.len() == 8 {
                    parse_hex_pair(chars[6], chars[7])?
                } else {
                    255
                };
                Ok(HexColor { r, g, b, a })
            }
            len => Err(ColorParseError {
                message: format!("invalid hex color length: {}", len),
            }),
        }
    }

    /// Multiplies the existing alpha channel by `alpha` (0.0..=1.0).
    pub fn with_alpha(self, alpha: f32) -> Self {
        let current = self.a as f32 / 255.0;
        let a = (current * alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        HexColor { a, ..self }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

fn parse_hex_digit(c: char) -> Result<u8, ColorParseError> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| ColorParseError {
            message: format!("invalid hex digit: {}", c),
        })
}

fn parse_hex_pair(c1: char, c2: char) -> Result<u8, ColorParseError> {
    let high = parse_hex_digit(c1)?;
    let low = parse_hex_digit(c2)?;
    Ok(high * 16 + low)
}

/// Normalizes an alpha modifier to a CSS percentage or expression.
///
/// Named modifiers must be numbers (`50` → `50%`); arbitrary ones may be a
/// fraction (`0.5` → `50%`), a percentage, or any other expression such as
/// `var(--opacity)`, which passes through unchanged.
pub fn normalize_alpha(modifier: &str, arbitrary: bool) -> Option<String> {
    let modifier = modifier.trim();
    if modifier.is_empty() {
        return None;
    }
    if let Some(number) = modifier.strip_suffix('%') {
        return number.parse::<f32>().ok().map(|_| modifier.to_string());
    }
    if let Ok(number) = modifier.parse::<f32>() {
        if arbitrary && number <= 1.0 {
            return Some(format!("{}%", format_number(number * 100.0)));
        }
        if !arbitrary && !(0.0..=100.0).contains(&number) {
            return None;
        }
        if !arbitrary && (number * 4.0).fract() != 0.0 {
            return None;
        }
        return Some(format!("{}%", modifier));
    }
    arbitrary.then(|| modifier.to_string())
}

/// Applies an alpha value to a color.
///
/// ```
/// use tailor::color::with_alpha;
///
/// assert_eq!(with_alpha("#0088cc", "50%"), "#0088cc80");
/// assert_eq!(
///     with_alpha("var(--brand)", "50%"),
///     "color-mix(in srgb, var(--brand) 50%, transparent)"
/// );
/// ```
pub fn with_alpha(color: &str, alpha: &str) -> String {
    if alpha == "100%" {
        return color.to_string();
    }
    if let (Ok(hex), Some(fraction)) = (HexColor::parse(color), percentage_fraction(alpha)) {
        return hex.with_alpha(fraction).to_string();
    }
    format!("color-mix(in srgb, {} {}, transparent)", color, alpha)
}

fn percentage_fraction(alpha: &str) -> Option<f32> {
    let number: f32 = alpha.strip_suffix('%')?.parse().ok()?;
    (0.0..=100.0).contains(&number).then_some(number / 100.0)
}

/// Formats a float without a trailing `.0`.
pub fn format_number(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
