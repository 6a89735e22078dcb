//! Human-readable money formatting.

/// Formats an amount with two decimals and comma thousands separators.
///
/// Rounding is whatever `{:.2}` does, so `999.999` becomes `1,000.00`.
/// A leading minus sign stays in front of the grouped digits.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{amount:.2}");

    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, decimal) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}.{decimal}")
}
