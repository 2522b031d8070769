//! French-locale number formatting for reports.

/// Narrow no-break space used by `fr-FR` as thousands separator.
const GROUP_SEPARATOR: char = '\u{202f}';
/// No-break space between an amount and its unit.
const UNIT_SEPARATOR: char = '\u{a0}';

/// Whole euros with French grouping: `1234.4` → `1 234 €`.
pub fn format_eur(value: f64) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}{}{UNIT_SEPARATOR}€", group_thousands(&digits))
}

/// Fixed decimals with a comma: `2.5` → `2,50`.
pub fn format_decimal(value: f64, places: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let formatted = format!("{:.*}", places, value);
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", integer),
    };

    let mut output = format!("{sign}{}", group_thousands(digits));
    if let Some(fraction) = fraction {
        output.push(',');
        output.push_str(fraction);
    }
    output
}

/// Signed variant used for gaps: `+0,40` / `-0,70`.
pub fn format_signed(value: f64, places: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    if value > 0.0 {
        format!("+{}", format_decimal(value, places))
    } else {
        format_decimal(value, places)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}{UNIT_SEPARATOR}%", format_decimal(value, 2))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut output = String::with_capacity(len + len / 3 * GROUP_SEPARATOR.len_utf8());
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            output.push(GROUP_SEPARATOR);
        }
        output.push(ch);
    }
    output
}
