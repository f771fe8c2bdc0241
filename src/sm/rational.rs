//! The exact rational substrate.
//!
//! Every position and time in this crate is an exact rational number. The
//! canonical representation is [`num::rational::Ratio`] over `i64`, which
//! keeps values in lowest terms with a positive denominator and hashes the
//! normalized pair, so hashing agrees with equality for free.

/// The canonical exact rational. All semantic units wrap this.
pub type Rational = num::rational::Ratio<i64>;

/// Converts decimal text such as `187.5`, `-0.008` or `120` into an exact
/// rational (mantissa over a power of ten).
///
/// Returns `None` on malformed text or when the mantissa would overflow
/// `i64`; callers turn that into a lexical error with position info.
pub fn parse_decimal(text: &str) -> Option<Rational> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut numerator: i64 = 0;
    for b in int_part.bytes().chain(frac_part.bytes()) {
        numerator = numerator
            .checked_mul(10)?
            .checked_add(i64::from(b - b'0'))?;
    }
    let denominator = 10_i64.checked_pow(u32::try_from(frac_part.len()).ok()?)?;
    if negative {
        numerator = numerator.checked_neg()?;
    }
    Some(Rational::new(numerator, denominator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers() {
        assert_eq!(parse_decimal("120"), Some(Rational::from_integer(120)));
        assert_eq!(parse_decimal("-3"), Some(Rational::from_integer(-3)));
        assert_eq!(parse_decimal("+7"), Some(Rational::from_integer(7)));
    }

    #[test]
    fn parses_decimals_exactly() {
        assert_eq!(parse_decimal("187.5"), Some(Rational::new(375, 2)));
        assert_eq!(parse_decimal("-0.008"), Some(Rational::new(-1, 125)));
        assert_eq!(parse_decimal("0.000"), Some(Rational::from_integer(0)));
        assert_eq!(parse_decimal(".5"), Some(Rational::new(1, 2)));
        assert_eq!(parse_decimal("2."), Some(Rational::from_integer(2)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal("12a"), None);
        assert_eq!(parse_decimal("1.2.3"), None);
        assert_eq!(parse_decimal("--1"), None);
        assert_eq!(parse_decimal("99999999999999999999999999"), None);
    }

    #[test]
    fn normalizes_to_lowest_terms() {
        let r = parse_decimal("0.250").unwrap();
        assert_eq!(*r.numer(), 1);
        assert_eq!(*r.denom(), 4);
    }
}
