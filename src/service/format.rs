//! Display formatting for salaries.

/// Currency symbol prefixed to formatted salaries.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format a salary with two decimals and thousands separators.
///
/// ```
/// use salary_forest::service::format_currency;
///
/// assert_eq!(format_currency(1_234_567.891), "₹1,234,567.89");
/// assert_eq!(format_currency(-950.0), "-₹950.00");
/// ```
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{CURRENCY_SYMBOL}{}.{frac}", group_thousands(int))
}

/// Format a whole-currency amount, as used in evaluation tables.
pub fn format_currency_whole(value: f64) -> String {
    format!("{CURRENCY_SYMBOL}{value:.0}")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
