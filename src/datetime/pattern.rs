//! Compilation of date format patterns into tokens
//!
//! Patterns use the familiar `YYYY-MM-DD HH:mm` vocabulary. Text inside square
//! brackets is copied verbatim, so `[at] HH:mm` renders `at 20:15`.

/// A single element of a compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `YYYY`
    Year4,
    /// `YY`, two-digit year pivoting at 68
    Year2,
    /// `MMMM` (full) or `MMM` (short) English month name
    MonthName { full: bool },
    /// `MM` (padded) or `M`
    Month { padded: bool },
    /// `DD` (padded) or `D`
    Day { padded: bool },
    /// `dddd` (full) or `ddd` (short) English weekday name
    Weekday { full: bool },
    /// `HH` (padded) or `H`, 0-23
    Hour24 { padded: bool },
    /// `hh` (padded) or `h`, 1-12
    Hour12 { padded: bool },
    /// `mm` (padded) or `m`
    Minute { padded: bool },
    /// `ss` (padded) or `s`
    Second { padded: bool },
    /// `SSS`
    Millisecond,
    /// `A` (AM/PM) or `a` (am/pm)
    Meridiem { upper: bool },
    /// `Z` (+05:30) or `ZZ` (+0530). Input may also carry a literal `Z` for UTC, which
    /// only strict parsing rejects since it renders back as `+00:00`.
    Offset { colon: bool },
    /// Text that must appear as-is
    Literal(String),
}

impl Token {
    /// Short human-readable description, used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Year4 => "4-digit year".to_string(),
            Token::Year2 => "2-digit year".to_string(),
            Token::MonthName { .. } => "month name".to_string(),
            Token::Month { .. } => "month".to_string(),
            Token::Day { .. } => "day of month".to_string(),
            Token::Weekday { .. } => "weekday name".to_string(),
            Token::Hour24 { .. } | Token::Hour12 { .. } => "hour".to_string(),
            Token::Minute { .. } => "minute".to_string(),
            Token::Second { .. } => "second".to_string(),
            Token::Millisecond => "milliseconds".to_string(),
            Token::Meridiem { .. } => "AM/PM".to_string(),
            Token::Offset { .. } => "UTC offset".to_string(),
            Token::Literal(text) => format!("'{}'", text),
        }
    }
}

/// Pattern spellings, longest first so that `MMMM` wins over `MM`.
static SPELLINGS: [(&str, Token); 23] = [
    ("YYYY", Token::Year4),
    ("MMMM", Token::MonthName { full: true }),
    ("dddd", Token::Weekday { full: true }),
    ("MMM", Token::MonthName { full: false }),
    ("ddd", Token::Weekday { full: false }),
    ("SSS", Token::Millisecond),
    ("YY", Token::Year2),
    ("MM", Token::Month { padded: true }),
    ("DD", Token::Day { padded: true }),
    ("HH", Token::Hour24 { padded: true }),
    ("hh", Token::Hour12 { padded: true }),
    ("mm", Token::Minute { padded: true }),
    ("ss", Token::Second { padded: true }),
    ("ZZ", Token::Offset { colon: false }),
    ("M", Token::Month { padded: false }),
    ("D", Token::Day { padded: false }),
    ("H", Token::Hour24 { padded: false }),
    ("h", Token::Hour12 { padded: false }),
    ("m", Token::Minute { padded: false }),
    ("s", Token::Second { padded: false }),
    ("A", Token::Meridiem { upper: true }),
    ("a", Token::Meridiem { upper: false }),
    ("Z", Token::Offset { colon: true }),
];

/// A compiled date format pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<Token>,
}

impl DatePattern {
    /// Compile a pattern string.
    ///
    /// Compilation never fails: characters that are not part of a known token become
    /// literal text, and an unclosed `[` is kept as a literal bracket.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagecheck::datetime::{DatePattern, Token};
    ///
    /// let pattern = DatePattern::compile("MM/DD/YYYY");
    /// assert_eq!(pattern.tokens().len(), 5);
    /// assert_eq!(pattern.tokens()[1], Token::Literal("/".to_string()));
    /// ```
    pub fn compile(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while let Some(c) = rest.chars().next() {
            if c == '[' {
                if let Some(end) = rest.find(']') {
                    literal.push_str(&rest[1..end]);
                    rest = &rest[end + 1..];
                    continue;
                }
            }

            if let Some((spelling, token)) = SPELLINGS.iter().find(|(s, _)| rest.starts_with(s)) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token.clone());
                rest = &rest[spelling.len()..];
                continue;
            }

            literal.push(c);
            rest = &rest[c.len_utf8()..];
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self { source: pattern.to_string(), tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The pattern text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Token {
        Token::Literal(s.to_string())
    }

    #[test]
    fn test_full_date() {
        let pattern = DatePattern::compile("MM/DD/YYYY");
        assert_eq!(
            pattern.tokens(),
            &[
                Token::Month { padded: true },
                lit("/"),
                Token::Day { padded: true },
                lit("/"),
                Token::Year4
            ]
        );
    }

    #[test]
    fn test_twelve_hour_time() {
        let pattern = DatePattern::compile("hh:mm A");
        assert_eq!(
            pattern.tokens(),
            &[
                Token::Hour12 { padded: true },
                lit(":"),
                Token::Minute { padded: true },
                lit(" "),
                Token::Meridiem { upper: true }
            ]
        );
    }

    #[test]
    fn test_month_names_prefer_longest() {
        let pattern = DatePattern::compile("MMMM MMM MM M");
        let kinds: Vec<_> = pattern.tokens().iter().filter(|t| !matches!(t, Token::Literal(_))).collect();
        assert_eq!(
            kinds,
            vec![
                &Token::MonthName { full: true },
                &Token::MonthName { full: false },
                &Token::Month { padded: true },
                &Token::Month { padded: false }
            ]
        );
    }

    #[test]
    fn test_iso_pattern() {
        let pattern = DatePattern::compile("YYYY-MM-DDTHH:mm:ssZ");
        assert_eq!(pattern.tokens().last(), Some(&Token::Offset { colon: true }));
        assert!(pattern.tokens().contains(&lit("T")));
    }

    #[test]
    fn test_escaped_text() {
        let pattern = DatePattern::compile("[Today is] dddd");
        assert_eq!(pattern.tokens(), &[lit("Today is "), Token::Weekday { full: true }]);
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        let pattern = DatePattern::compile("[YYYY");
        assert_eq!(pattern.tokens(), &[lit("["), Token::Year4]);
    }

    #[test]
    fn test_lone_y_is_literal() {
        let pattern = DatePattern::compile("Y");
        assert_eq!(pattern.tokens(), &[lit("Y")]);
    }

    #[test]
    fn test_empty_pattern() {
        let pattern = DatePattern::compile("");
        assert!(pattern.tokens().is_empty());
        assert_eq!(pattern.source(), "");
    }
}
