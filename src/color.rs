//! Color normalization for UI assertions
//!
//! Supports the following input forms:
//! - Functional: `rgb(255, 0, 0)` (optional single space after commas)
//! - Hex: `#RGB`, `#RRGGBB`
//! - Named: a fixed table of common color names (`red`, `crimson-dark`, ...)
//!
//! Anything else normalizes to [`NormalizedColor::Unresolved`] carrying the trimmed,
//! lowercased input. That sentinel only ever equals the same unrecognized text, so a
//! comparison against a real color fails instead of erroring.

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A normalized RGB triple.
///
/// Components coming from hex or the name table are always in `0..=255`. Components
/// parsed from `rgb(...)` text are taken verbatim (up to three digits), so `rgb(999, 0, 0)`
/// yields `r == 999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorValue {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl ColorValue {
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Built-in color names, in lookup-table order.
const NAMED_COLORS: [(&str, ColorValue); 23] = [
    ("orange", ColorValue::new(255, 165, 0)),
    ("red", ColorValue::new(255, 0, 0)),
    ("green", ColorValue::new(0, 128, 0)),
    ("blue", ColorValue::new(0, 0, 255)),
    ("yellow", ColorValue::new(255, 255, 0)),
    ("grey", ColorValue::new(128, 128, 128)),
    ("gray", ColorValue::new(128, 128, 128)),
    ("lightgrey", ColorValue::new(211, 211, 211)),
    ("lightgray", ColorValue::new(211, 211, 211)),
    ("darkgrey", ColorValue::new(169, 169, 169)),
    ("darkgray", ColorValue::new(169, 169, 169)),
    ("black", ColorValue::new(0, 0, 0)),
    ("white", ColorValue::new(255, 255, 255)),
    ("purple", ColorValue::new(128, 0, 128)),
    ("pink", ColorValue::new(255, 192, 203)),
    ("brown", ColorValue::new(165, 42, 42)),
    ("cyan", ColorValue::new(0, 255, 255)),
    ("magenta", ColorValue::new(255, 0, 255)),
    ("teal", ColorValue::new(0, 128, 128)),
    ("lime", ColorValue::new(0, 255, 0)),
    ("gold", ColorValue::new(255, 215, 0)),
    ("crimson", ColorValue::new(220, 20, 60)),
    ("crimson-dark", ColorValue::new(179, 19, 52)),
];

static NAME_INDEX: LazyLock<HashMap<&'static str, ColorValue>> =
    LazyLock::new(|| NAMED_COLORS.iter().copied().collect());

static RGB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(([0-9]{1,3}),\s?([0-9]{1,3}),\s?([0-9]{1,3})\)$")
        .expect("rgb pattern is a valid regex")
});

/// A recognized color literal, before resolution to a [`ColorValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorInput {
    /// Entry from the built-in name table
    Named { name: &'static str, value: ColorValue },
    /// Hex digits without `#`, already expanded to six lowercase characters
    Hex(String),
    /// Literal `rgb(r, g, b)` components
    Rgb(ColorValue),
}

impl ColorInput {
    /// Classify a color literal.
    ///
    /// The input is trimmed and lowercased first. Returns `None` for anything that is
    /// not an `rgb(...)` string, a 3/6-digit hex color, or a known name.
    pub fn classify(input: &str) -> Option<Self> {
        let trimmed = input.trim().to_lowercase();

        if let Some(caps) = RGB_PATTERN.captures(&trimmed) {
            // At most three ASCII digits each, always fits in u16
            let component = |i: usize| caps[i].parse::<u16>().ok();
            return Some(ColorInput::Rgb(ColorValue::new(
                component(1)?,
                component(2)?,
                component(3)?,
            )));
        }

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.chars().all(|c| c.is_ascii_hexdigit()) {
                match hex.len() {
                    3 => return Some(ColorInput::Hex(hex.chars().flat_map(|c| [c, c]).collect())),
                    6 => return Some(ColorInput::Hex(hex.to_string())),
                    _ => {}
                }
            }
        }

        NAME_INDEX
            .get_key_value(trimmed.as_str())
            .map(|(&name, &value)| ColorInput::Named { name, value })
    }

    /// Resolve to an RGB triple.
    pub fn resolve(&self) -> ColorValue {
        match self {
            ColorInput::Named { value, .. } => *value,
            ColorInput::Rgb(value) => *value,
            ColorInput::Hex(digits) => {
                let pair = |i: usize| {
                    let mut chars = digits[i..i + 2].chars();
                    let high = hex_digit(chars.next().unwrap_or('0'));
                    let low = hex_digit(chars.next().unwrap_or('0'));
                    u16::from(high * 16 + low)
                };
                ColorValue::new(pair(0), pair(2), pair(4))
            }
        }
    }
}

/// Result of normalizing a color string.
///
/// Equality is exactly what an assertion needs: resolved values compare by component,
/// unresolved text compares by identity, and the two never equal each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedColor {
    Resolved(ColorValue),
    Unresolved(String),
}

impl NormalizedColor {
    pub fn is_resolved(&self) -> bool {
        matches!(self, NormalizedColor::Resolved(_))
    }

    pub fn value(&self) -> Option<ColorValue> {
        match self {
            NormalizedColor::Resolved(value) => Some(*value),
            NormalizedColor::Unresolved(_) => None,
        }
    }
}

impl fmt::Display for NormalizedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedColor::Resolved(value) => value.fmt(f),
            NormalizedColor::Unresolved(text) => f.write_str(text),
        }
    }
}

/// Normalize a color name, hex string, or `rgb(...)` string.
///
/// # Examples
///
/// ```
/// use pagecheck::color::{normalize, ColorValue, NormalizedColor};
///
/// assert_eq!(normalize("#F00"), NormalizedColor::Resolved(ColorValue::new(255, 0, 0)));
/// assert_eq!(normalize(" Teal "), NormalizedColor::Resolved(ColorValue::new(0, 128, 128)));
/// assert_eq!(normalize("Chartreuse"), NormalizedColor::Unresolved("chartreuse".to_string()));
/// ```
pub fn normalize(input: &str) -> NormalizedColor {
    match ColorInput::classify(input) {
        Some(color) => {
            let value = color.resolve();
            tracing::debug!(input, ?color, %value, "resolved color");
            NormalizedColor::Resolved(value)
        }
        None => {
            let sentinel = input.trim().to_lowercase();
            tracing::debug!(input, sentinel = %sentinel, "unrecognized color literal");
            NormalizedColor::Unresolved(sentinel)
        }
    }
}

/// Compare two colors after normalization.
///
/// ```
/// use pagecheck::color::compare;
///
/// assert!(compare("red", "#FF0000"));
/// assert!(compare("rgb(0,0,255)", "blue"));
/// assert!(!compare("red", "blue"));
/// ```
pub fn compare(actual: &str, expected: &str) -> bool {
    normalize(actual) == normalize(expected)
}

/// Display form of [`normalize`]: `rgb(r, g, b)` for recognized colors, the
/// trimmed lowercased input otherwise.
pub fn rgb_string(input: &str) -> String {
    normalize(input).to_string()
}

/// Look up a built-in color name (case-insensitive, surrounding whitespace ignored).
pub fn lookup_named(name: &str) -> Option<ColorValue> {
    NAME_INDEX.get(name.trim().to_lowercase().as_str()).copied()
}

/// Iterate the built-in color names in table order.
pub fn named_colors() -> impl Iterator<Item = (&'static str, ColorValue)> {
    NAMED_COLORS.iter().copied()
}

/// Parse a single hex digit (0-9, a-f, A-F) to 0-15. Non-hex characters map to 0.
fn hex_digit(c: char) -> u8 {
    match c {
        '0'..='9' => c as u8 - b'0',
        'a'..='f' => c as u8 - b'a' + 10,
        'A'..='F' => c as u8 - b'A' + 10,
        _ => 0,
    }
}
