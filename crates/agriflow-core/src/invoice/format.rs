//! Presentation of monetary values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

fn to_paise(value: Decimal) -> (bool, u128, u32) {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let whole = abs.trunc();
    let fraction = ((abs - whole) * Decimal::ONE_HUNDRED).to_u32().unwrap_or(0);
    (negative, whole.to_u128().unwrap_or(0), fraction)
}

/// Group digits the Indian way: last three, then pairs (`12,34,567`).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format with two fraction digits and Indian grouping, e.g. `30,370.84`.
pub fn format_money(value: Decimal) -> String {
    let (negative, whole, paise) = to_paise(value);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{}.{paise:02}", group_indian(&whole.to_string()))
}

fn below_hundred(n: u128, out: &mut Vec<&'static str>) {
    let n = n as usize;
    if n < 20 {
        out.push(ONES[n]);
    } else {
        out.push(TENS[n / 10]);
        if n % 10 != 0 {
            out.push(ONES[n % 10]);
        }
    }
}

/// Words for a positive integer, without a currency suffix.
fn spell(n: u128, out: &mut Vec<&'static str>) {
    const SCALES: [(u128, &str); 3] = [(10_000_000, "Crore"), (100_000, "Lakh"), (1_000, "Thousand")];

    let mut rest = n;
    for (scale, name) in SCALES {
        if rest >= scale {
            spell(rest / scale, out);
            out.push(name);
            rest %= scale;
        }
    }
    if rest >= 100 {
        out.push(ONES[(rest / 100) as usize]);
        out.push("Hundred");
        rest %= 100;
    }
    if rest > 0 {
        below_hundred(rest, out);
    }
}

/// Spell out an amount using Indian numbering, e.g.
/// `"Thirty Thousand Three Hundred Seventy Rupees and Eighty Four Paise Only"`.
pub fn amount_in_words(value: Decimal) -> String {
    let (negative, whole, paise) = to_paise(value);
    let mut words: Vec<&'static str> = Vec::new();
    if negative {
        words.push("Minus");
    }
    if whole == 0 {
        words.push("Zero");
    } else {
        spell(whole, &mut words);
    }
    words.push("Rupees");
    if paise > 0 {
        words.push("and");
        below_hundred(paise as u128, &mut words);
        words.push("Paise");
    }
    words.push("Only");
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_format_money_grouping() {
        assert_eq!(format_money(dec("0")), "0.00");
        assert_eq!(format_money(dec("659")), "659.00");
        assert_eq!(format_money(dec("25738")), "25,738.00");
        assert_eq!(format_money(dec("30370.84")), "30,370.84");
        assert_eq!(format_money(dec("1234567.891")), "12,34,567.89");
        assert_eq!(format_money(dec("123456789")), "12,34,56,789.00");
    }

    #[test]
    fn test_format_money_rounding_and_sign() {
        assert_eq!(format_money(dec("0.005")), "0.01");
        assert_eq!(format_money(dec("-0.84")), "-0.84");
        assert_eq!(format_money(dec("-1500.5")), "-1,500.50");
        assert_eq!(format_money(dec("-0.001")), "0.00");
    }

    #[test]
    fn test_amount_in_words() {
        assert_eq!(amount_in_words(dec("0")), "Zero Rupees Only");
        assert_eq!(amount_in_words(dec("15")), "Fifteen Rupees Only");
        assert_eq!(amount_in_words(dec("3410")), "Three Thousand Four Hundred Ten Rupees Only");
        assert_eq!(
            amount_in_words(dec("30370.84")),
            "Thirty Thousand Three Hundred Seventy Rupees and Eighty Four Paise Only"
        );
    }

    #[test]
    fn test_amount_in_words_large_scales() {
        assert_eq!(amount_in_words(dec("100000")), "One Lakh Rupees Only");
        assert_eq!(
            amount_in_words(dec("12345678")),
            "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight Rupees Only"
        );
        assert_eq!(amount_in_words(dec("-20")), "Minus Twenty Rupees Only");
    }
}
