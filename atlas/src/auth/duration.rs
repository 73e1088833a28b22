use chrono::Duration;

// Unit suffix -> nanoseconds
const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

// Digits beyond this add nothing at nanosecond resolution
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse a duration string such as `15m`, `720h`, `1h30m` or `1.5s`.
///
/// The string is a sequence of decimal numbers, each with an optional
/// fraction and a mandatory unit (`ns`, `us`, `ms`, `s`, `m`, `h`). A bare `0`
/// is accepted. Negative values, unknown units and empty input yield `None`.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let mut rest = input.strip_prefix('+').unwrap_or(input);

    if rest == "0" {
        return Some(Duration::zero());
    }
    if rest.is_empty() {
        return None;
    }

    let mut total: u128 = 0;

    while !rest.is_empty() {
        let (int_digits, after_int) = split_digits(rest);
        let (frac_digits, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", after_int),
        };

        if int_digits.is_empty() && frac_digits.is_empty() {
            return None;
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, remaining) = after_number.split_at(unit_len);

        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, nanos)| *nanos)?;

        if !int_digits.is_empty() {
            let whole: u128 = int_digits.parse().ok()?;
            total = total.checked_add(whole.checked_mul(scale)?)?;
        }

        if !frac_digits.is_empty() {
            let frac_digits = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];
            let frac: u128 = frac_digits.parse().ok()?;
            let denom = 10u128.checked_pow(frac_digits.len() as u32)?;
            total = total.checked_add(frac.checked_mul(scale)? / denom)?;
        }

        rest = remaining;
    }

    let nanos = i64::try_from(total).ok()?;
    Some(Duration::nanoseconds(nanos))
}

fn split_digits(s: &str) -> (&str, &str) {
    let len = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(len)
}
