use std::fmt;

/// Money is represented as integer cents so sums and budget comparisons are exact.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a plain decimal with two places.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents prefixed with a currency symbol, e.g. "₹150.00".
pub fn format_money(symbol: &str, cents: Cents) -> String {
    if cents < 0 {
        format!("-{}{}", symbol, format_cents(-cents))
    } else {
        format!("{}{}", symbol, format_cents(cents))
    }
}

/// Parse a decimal string into cents.
///
/// Accepts an optional sign, whole units and up to any number of fractional
/// digits; digits past the second are truncated. Exponents, thousands
/// separators and currency symbols are rejected.
///
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "50.0" -> 5000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, unsigned) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        Some(_) => (false, input),
        None => return Err(ParseCentsError::Empty),
    };

    let (units_str, fraction_str) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.bytes().all(|b| b.is_ascii_digit())
        || !fraction_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => i64::from(fraction_str.as_bytes()[0] - b'0') * 10,
        _ => fraction_str[..2]
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or(ParseCentsError::Overflow)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    Empty,
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::Empty => write!(f, "empty money value"),
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(f, "money value out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
