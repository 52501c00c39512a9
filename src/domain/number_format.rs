// Locale aware number formatting for chart tooltips and widget lines
use super::i18n::Language;

/// Formats `value` with between `min_fraction` and `max_fraction` decimals,
/// dropping trailing zeros and grouping thousands per language.
pub fn format_number(value: f64, language: Language, min_fraction: usize, max_fraction: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let max_fraction = max_fraction.max(min_fraction);

    let (integer, mut fraction) = round_half_up(value.abs(), max_fraction);
    while fraction.len() < min_fraction {
        fraction.push('0');
    }
    while fraction.len() > min_fraction && fraction.ends_with('0') {
        fraction.pop();
    }

    let is_zero = integer.chars().chain(fraction.chars()).all(|c| c == '0');
    let mut out = String::with_capacity(integer.len() + fraction.len() + 4);
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(&integer, language.group_separator()));
    if !fraction.is_empty() {
        out.push(language.decimal_separator());
        out.push_str(&fraction);
    }
    out
}

/// Rounds the shortest decimal form of a non-negative `value` to `max_fraction`
/// digits, ties away from zero. Returns integer and fraction digits.
fn round_half_up(value: f64, max_fraction: usize) -> (String, String) {
    let repr = value.to_string();
    let (integer, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if fraction.len() <= max_fraction {
        return (integer.to_string(), fraction.to_string());
    }

    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().take(max_fraction))
        .collect();
    if fraction.as_bytes()[max_fraction] >= b'5' {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let digits: String = digits.into_iter().map(char::from).collect();
    let (integer, fraction) = digits.split_at(digits.len() - max_fraction);
    (integer.to_string(), fraction.to_string())
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
