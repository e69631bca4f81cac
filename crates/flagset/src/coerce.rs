//! Text to number coercion.
//!
//! Numbers are read the way a formatted stream extraction reads them:
//! leading whitespace is skipped and the longest numeric prefix wins, so
//! `"42px"` is `42`. Text without a numeric prefix yields `None`; the
//! caller stores zero in that case. Out of range values clamp to the
//! nearest representable one.

fn skip_space(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b')
}

fn digit_run(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parse a signed decimal integer prefix. Overflow saturates.
pub fn parse_integer(text: &str) -> Option<i64> {
    let bytes = skip_space(text).as_bytes();
    let (negative, start) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    let len = digit_run(bytes, start);
    if len == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for &b in &bytes[start..start + len] {
        let digit = i64::from(b - b'0');
        let next = value
            .checked_mul(10)
            .and_then(|v| if negative { v.checked_sub(digit) } else { v.checked_add(digit) });
        match next {
            Some(v) => value = v,
            None => return Some(if negative { i64::MIN } else { i64::MAX }),
        }
    }
    Some(value)
}

/// Parse a decimal floating point prefix (`[+-]digits[.digits][e[+-]digits]`).
/// Magnitudes beyond `f64::MAX` clamp to `±f64::MAX`.
pub fn parse_float(text: &str) -> Option<f64> {
    let trimmed = skip_space(text);
    let bytes = trimmed.as_bytes();

    let mut end = match bytes.first() {
        Some(b'-' | b'+') => 1,
        _ => 0,
    };
    let int_len = digit_run(bytes, end);
    end += int_len;

    let mut frac_len = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_len = digit_run(bytes, end + 1);
        if int_len > 0 || frac_len > 0 {
            end += 1 + frac_len;
        }
    }
    if int_len == 0 && frac_len == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        let exp_len = digit_run(bytes, exp);
        if exp_len > 0 {
            end = exp + exp_len;
        }
    }

    let value: f64 = trimmed[..end].parse().ok()?;
    if value.is_infinite() {
        return Some(f64::MAX.copysign(value));
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_reads_numeric_prefix() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("  -17"), Some(-17));
        assert_eq!(parse_integer("+8"), Some(8));
        assert_eq!(parse_integer("42px"), Some(42));
        assert_eq!(parse_integer("3.9"), Some(3));
    }

    #[test]
    fn integer_rejects_text_without_digits() {
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer("- 4"), None);
    }

    #[test]
    fn integer_overflow_saturates() {
        assert_eq!(parse_integer("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_integer("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_integer("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn float_reads_numeric_prefix() {
        assert_eq!(parse_float("2.5"), Some(2.5));
        assert_eq!(parse_float(" -0.25"), Some(-0.25));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("7."), Some(7.0));
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float("1.5E-1x"), Some(0.15));
        assert_eq!(parse_float("12kg"), Some(12.0));
        assert_eq!(parse_float("4e"), Some(4.0));
    }

    #[test]
    fn float_overflow_clamps_to_max() {
        assert_eq!(parse_float("1e999"), Some(f64::MAX));
        assert_eq!(parse_float("-1e999"), Some(-f64::MAX));
        assert_eq!(parse_float("1e-999"), Some(0.0));
    }

    #[test]
    fn float_rejects_text_without_digits() {
        assert_eq!(parse_float("nan"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("-.e5"), None);
        assert_eq!(parse_float("x1"), None);
    }
}
