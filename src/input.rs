//! Parsing and formatting of Brazilian-formatted form input.
//!
//! Amounts use `,` as the decimal separator (`R$ 6,00`, `8,33 L`) and
//! odometer readings use `.` to group thousands (`85.000`).

/// Parse a currency or volume amount such as `"R$ 6,00"` or `"8,33 L"`.
///
/// Returns `None` when no number can be read.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.replace("R$", "");
    // With a decimal comma present, dots can only be thousands separators.
    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else {
        text
    };
    let cleaned: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() || cleaned.matches('.').count() > 1 {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an odometer reading such as `"85.000"` (dots group thousands).
pub fn parse_odometer(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// `6.0` -> `"R$ 6,00"`.
pub fn format_currency(value: f64) -> String {
    format!("R$ {}", format_decimal(value))
}

/// `8.333` -> `"8,33 L"`.
pub fn format_liters(value: f64) -> String {
    format!("{} L", format_decimal(value))
}

/// `85000` -> `"85.000"`.
pub fn format_odometer(km: u64) -> String {
    group_thousands(&km.to_string())
}

/// Two decimals, `,` separator, `.` thousands grouping.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{},{}", sign, group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
