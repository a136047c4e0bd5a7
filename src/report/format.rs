//! Money formatting helpers shared by the console report and the chart.

use crate::models::Dollars;

/// Insert thousands separators into a string of digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// `$1,234` — whole dollars, as used on chart labels.
pub fn dollars(amount: Dollars) -> String {
    format!("${}", group_thousands(&amount.to_string()))
}

/// `$1,234.00` — whole dollars with cents.
pub fn dollars_cents(amount: Dollars) -> String {
    format!("{}.00", dollars(amount))
}

/// `$1,234.57` — a fractional amount rounded to cents.
pub fn amount_cents(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(&(cents / 100).to_string()),
        cents % 100
    )
}
