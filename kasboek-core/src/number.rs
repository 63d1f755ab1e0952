//! Amount parsing with a bank-specific decimal separator.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse `1234`, `-12,50`, `+1.234,56` (for `,` decimals) or `1,234.56` (for
/// `.` decimals). The other separator is only accepted as 3-digit grouping.
pub fn parse_number(raw: &str, decimal: char) -> Option<Decimal> {
    let raw = raw.trim();
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let group = if decimal == ',' { '.' } else { ',' };

    let (int_part, frac_part) = match body.split_once(decimal) {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (body, None),
    };

    if !is_grouped_integer(int_part, group) {
        return None;
    }

    let digits: String = int_part.chars().filter(|c| *c != group).collect();
    let normalized = match frac_part {
        Some(frac) if !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{digits}.{frac}")
        }
        Some(_) => return None,
        None => digits,
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

fn is_grouped_integer(s: &str, group: char) -> bool {
    if s.is_empty() {
        return false;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }

    let mut parts = s.split(group);
    let head_ok = parts
        .next()
        .is_some_and(|head| (1..=3).contains(&head.len()) && head.bytes().all(|b| b.is_ascii_digit()));
    head_ok && parts.all(|part| part.len() == 3 && part.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_comma_decimal() {
        assert_eq!(parse_number("12,50", ','), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_number("-1.234,56", ','), Some(Decimal::new(-123456, 2)));
        assert_eq!(parse_number("+0,99", ','), Some(Decimal::new(99, 2)));
        assert_eq!(parse_number(" 100 ", ','), Some(Decimal::from(100)));
    }

    #[test]
    fn test_parse_number_dot_decimal() {
        assert_eq!(parse_number("1,234.5", '.'), Some(Decimal::new(12345, 1)));
        assert_eq!(parse_number("-20", '.'), Some(Decimal::from(-20)));
        assert_eq!(parse_number("+12.50", '.'), Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn test_separator_decides_meaning() {
        // "1.000" is one thousand under `,` decimals and one under `.` decimals.
        assert_eq!(parse_number("1.000", ','), Some(Decimal::from(1000)));
        assert_eq!(parse_number("1.000", '.'), Some(Decimal::from(1)));
        assert_eq!(parse_number("12.50", ','), None);
    }

    #[test]
    fn test_parse_number_rejects_non_amounts() {
        assert_eq!(parse_number("01-01-2024", ','), None);
        assert_eq!(parse_number("NL01INGB0001", ','), None);
        assert_eq!(parse_number("12,", ','), None);
        assert_eq!(parse_number("1.23,4", ','), None);
        assert_eq!(parse_number("", ','), None);
        assert_eq!(parse_number("-", ','), None);
    }
}
