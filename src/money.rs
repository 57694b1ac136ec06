// 💵 Money helpers - lenient parsing and fixed-point formatting
//
// Every monetary value in the engine is a rust_decimal::Decimal. Inputs come
// from free-text fields, so parsing never fails: it reads the longest numeric
// prefix the way a browser's parseFloat does and falls back to zero.

use rust_decimal::prelude::*;

/// Two-decimal precision used by the allocation arithmetic
pub const CENT_SCALE: u32 = 2;

// Largest scale a Decimal can carry
const MAX_SCALE: i32 = 28;

/// Largest magnitude accepted from an input field (one quadrillion).
///
/// Anything bigger parses as zero. Every sum and product the engine forms
/// from accepted amounts then stays far inside Decimal's range.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000_000, 0)
}

/// One cent (0.01)
pub fn cent() -> Decimal {
    Decimal::new(1, CENT_SCALE)
}

/// Parse a user-entered amount.
///
/// Leading whitespace is skipped, then the longest prefix of the form
/// `[+-]digits[.digits][(e|E)[+-]digits]` is read. Anything that yields no
/// digits, exceeds [`max_amount`] in magnitude, or is otherwise unusable
/// becomes zero.
///
/// ```
/// use splitit::money::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("42.50"), Decimal::new(4250, 2));
/// assert_eq!(parse_amount("12abc"), Decimal::from(12));
/// assert_eq!(parse_amount(""), Decimal::ZERO);
/// ```
pub fn parse_amount(input: &str) -> Decimal {
    numeric_prefix(input.trim_start())
        .and_then(|prefix| prefix.to_decimal())
        .filter(|value| value.abs() <= max_amount())
        .unwrap_or(Decimal::ZERO)
}

/// Whether the field holds something that parses to a number at all
pub fn is_numeric(input: &str) -> bool {
    numeric_prefix(input.trim_start()).is_some()
}

struct NumericPrefix<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
    exponent: i32,
}

impl NumericPrefix<'_> {
    fn to_decimal(&self) -> Option<Decimal> {
        let integer = if self.integer.is_empty() { "0" } else { self.integer };
        let literal = if self.fraction.is_empty() {
            integer.to_string()
        } else {
            format!("{}.{}", integer, self.fraction)
        };

        let mut value = Decimal::from_str(&literal).ok()?;
        if value.is_zero() {
            return Some(Decimal::ZERO);
        }

        // Exponents beyond the representable range collapse to zero or fail
        if self.exponent > 0 {
            for _ in 0..self.exponent {
                value = value.checked_mul(Decimal::TEN)?;
            }
        } else if self.exponent < 0 {
            if self.exponent < -MAX_SCALE {
                return Some(Decimal::ZERO);
            }
            for _ in 0..self.exponent.unsigned_abs() {
                value = value.checked_div(Decimal::TEN)?;
            }
        }

        Some(if self.negative { -value } else { value })
    }
}

fn numeric_prefix(s: &str) -> Option<NumericPrefix<'_>> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let mut negative = false;
    if let Some(&sign) = bytes.first() {
        if sign == b'+' || sign == b'-' {
            negative = sign == b'-';
            pos += 1;
        }
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let integer = &s[int_start..pos];

    let mut fraction = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        fraction = &s[frac_start..end];
        pos = end;
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut exponent = 0i32;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut cursor = pos + 1;
        let mut exp_negative = false;
        if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
            exp_negative = bytes[cursor] == b'-';
            cursor += 1;
        }
        let digits_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        // "1e" or "1e+" keeps just the mantissa
        if cursor > digits_start {
            let magnitude: i32 = s[digits_start..cursor].parse().unwrap_or(i32::MAX);
            exponent = if exp_negative { -magnitude } else { magnitude };
        }
    }

    Some(NumericPrefix {
        negative,
        integer,
        fraction,
        exponent,
    })
}

/// Round half away from zero, the way a fixed-point display rounds
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to whole cents
pub fn round_cents(value: Decimal) -> Decimal {
    round_to(value, CENT_SCALE)
}

/// Fixed-point rendering with exactly `dp` decimals ("2.5" -> "2.50")
pub fn to_fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round_to(value, dp);
    rounded.rescale(dp);
    if rounded.is_zero() {
        // Avoid "-0.00"
        rounded = Decimal::ZERO;
        rounded.rescale(dp);
    }
    rounded.to_string()
}

/// Value written into a person's manual amount field when computed shares
/// are baked in: two decimals, or empty for zero.
pub fn bake_amount(value: Decimal) -> String {
    if value.is_zero() {
        String::new()
    } else {
        to_fixed(value, CENT_SCALE)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_amount("100"), Decimal::from(100));
        assert_eq!(parse_amount("10.01"), Decimal::new(1001, 2));
        assert_eq!(parse_amount("  7.5"), Decimal::new(75, 1));
        assert_eq!(parse_amount("-3"), Decimal::from(-3));
        assert_eq!(parse_amount("+3"), Decimal::from(3));
        assert_eq!(parse_amount(".5"), Decimal::new(5, 1));
        assert_eq!(parse_amount("5."), Decimal::from(5));
    }

    #[test]
    fn test_parse_unparsable_is_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("."), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
        assert_eq!(parse_amount("$10"), Decimal::ZERO);
        assert!(!is_numeric("abc"));
        assert!(is_numeric("1"));
    }

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!(parse_amount("12abc"), Decimal::from(12));
        assert_eq!(parse_amount("3.25.7"), Decimal::new(325, 2));
        assert_eq!(parse_amount("1,000"), Decimal::ONE);
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(parse_amount("1e2"), Decimal::from(100));
        assert_eq!(parse_amount("25E-1"), Decimal::new(25, 1));
        assert_eq!(parse_amount("4e"), Decimal::from(4));
        assert_eq!(parse_amount("1e400"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_out_of_range_is_zero() {
        assert_eq!(parse_amount("1e15"), max_amount());
        assert_eq!(parse_amount("-1e15"), -max_amount());
        assert_eq!(parse_amount("1000000000000000.01"), Decimal::ZERO);
        assert_eq!(parse_amount("1e28"), Decimal::ZERO);
        assert_eq!(parse_amount("79228162514264337593543950335"), Decimal::ZERO);
        assert_eq!(parse_amount("-5e28"), Decimal::ZERO);
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(Decimal::new(25, 1), 2), "2.50");
        assert_eq!(to_fixed(Decimal::new(2505, 3), 2), "2.51");
        assert_eq!(to_fixed(Decimal::from(40), 2), "40.00");
        assert_eq!(to_fixed(Decimal::new(-1, 3), 2), "0.00");
        assert_eq!(to_fixed(Decimal::new(125, 1), 0), "13");
    }

    #[test]
    fn test_bake_amount() {
        assert_eq!(bake_amount(Decimal::ZERO), "");
        assert_eq!(bake_amount(Decimal::new(3334, 2)), "33.34");
        assert_eq!(bake_amount(Decimal::from(25)), "25.00");

        println!("✅ Bake-in formatting test passed");
    }
}
