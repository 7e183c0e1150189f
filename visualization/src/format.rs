//! Number formatting for axis labels, tooltips and the summary panel

/// Insert `,` thousands separators into a string of ASCII digits
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed-point with thousands separators, no sign handling
fn grouped_fixed(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    match text.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_digits(int), frac),
        None => group_digits(&text),
    }
}

/// `$1,234.56`; negatives as `-$1,234.56`
pub fn currency(value: f64) -> String {
    currency_with(value, 2)
}

/// Currency with a chosen number of decimals
pub fn currency_with(value: f64, decimals: usize) -> String {
    let text = grouped_fixed(value, decimals);
    // No sign on values that round to zero
    let negative = value < 0.0 && text.bytes().any(|b| matches!(b, b'1'..=b'9'));
    format!("{}${}", if negative { "-" } else { "" }, text)
}

/// Currency with an explicit sign: `+$5.00` / `-$5.00`
pub fn signed_currency(value: f64) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{}${}", sign, grouped_fixed(value, 2))
}

/// Percentage with an explicit sign and two decimals: `+5.00%`
pub fn signed_percent(value: f64) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{}{:.2}%", sign, value.abs())
}

/// Integer with thousands separators: `1,234,567`
pub fn thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Compact SI form for axis labels: `950`, `1.5k`, `20M`, `3.2B`
pub fn si(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "k")];

    let magnitude = value.abs();
    for (scale, suffix) in UNITS {
        if magnitude >= scale {
            return format!("{}{}", trim_zeros(format!("{:.1}", value / scale)), suffix);
        }
    }
    trim_zeros(format!("{:.1}", value))
}

fn trim_zeros(text: String) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(999.999), "$1,000.00");
        assert_eq!(currency(-5.0), "-$5.00");
        assert_eq!(currency_with(1_250_000.0, 0), "$1,250,000");
    }

    #[test]
    fn test_signed_forms() {
        assert_eq!(signed_currency(5.0), "+$5.00");
        assert_eq!(signed_currency(-12.346), "-$12.35");
        assert_eq!(signed_percent(5.0), "+5.00%");
        assert_eq!(signed_percent(-0.456), "-0.46%");
        assert_eq!(signed_percent(0.0), "+0.00%");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(104_654_200), "104,654,200");
    }

    #[test]
    fn test_si() {
        assert_eq!(si(0.0), "0");
        assert_eq!(si(950.0), "950");
        assert_eq!(si(1_500.0), "1.5k");
        assert_eq!(si(20_000_000.0), "20M");
        assert_eq!(si(3_260_000_000.0), "3.3B");
    }
}
