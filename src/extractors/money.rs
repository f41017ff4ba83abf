// src/extractors/money.rs

use once_cell::sync::Lazy;
use regex::Regex;

// Values outside this open interval are page numbers, dates, serial numbers
// and other numeric noise, never a wholesale fuel price.
const MIN_PLAUSIBLE: f64 = 0.0;
const MAX_PLAUSIBLE: f64 = 10_000.0;

// Tail of a money amount: one digit, decimal separator, two digits.
// Used by the glue-repair pre-pass to spot where two columns collapsed
// into a single token (e.g. "1054.20541.20").
static AMOUNT_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d[.,]\d{2}").expect("Failed to compile AMOUNT_TAIL_RE")
});

// Shape of a full money amount: 1-3 leading digits with optional groups of
// three separated by a plain space or NBSP (thousands grouping), or an
// unconstrained digit run, then a decimal comma/point and exactly two digits.
// Digit-adjacency boundaries are enforced manually in find_money_spans,
// because the regex crate has no look-around.
static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\d{1,3}(?:[ \u{00A0}]\d{3})*|\d+)[.,]\d{2}")
        .expect("Failed to compile MONEY_RE")
});

/// Repairs the PDF-extraction artifact where two adjacent amounts are glued
/// without a separator: inserts a space after every "digit, separator, two
/// digits" tail that is immediately followed by another digit.
///
/// "1054.20541.20" becomes "1054.20 541.20".
fn split_glued_amounts(text: &str) -> String {
    let mut repaired = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for m in AMOUNT_TAIL_RE.find_iter(text) {
        repaired.push_str(&text[last..m.end()]);
        last = m.end();
        if text.as_bytes().get(m.end()).is_some_and(|b| b.is_ascii_digit()) {
            repaired.push(' ');
        }
    }
    repaired.push_str(&text[last..]);
    repaired
}

/// Finds byte spans of money-shaped tokens, rejecting matches that sit
/// directly against another digit on either side (partial matches inside
/// longer numeric runs). On a rejected match the scan resumes one byte past
/// the match start, so an inner valid token can still be found.
fn find_money_spans(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut at = 0;
    while let Some(m) = MONEY_RE.find_at(text, at) {
        let (start, end) = (m.start(), m.end());
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_digit();
        let after_ok = end == text.len() || !bytes[end].is_ascii_digit();
        if before_ok && after_ok {
            spans.push((start, end));
            at = end;
        } else {
            // Matches always start on an ASCII digit, so +1 stays on a char boundary.
            at = start + 1;
        }
    }
    spans
}

/// Extracts the ordered sequence of plausible money values from a text
/// segment, left to right.
///
/// Thousands separators (space or NBSP) are stripped, a decimal comma is
/// normalized to a point, and only values in the open interval (0, 10000)
/// are kept.
pub fn find_money_values(segment: &str) -> Vec<f64> {
    let repaired = split_glued_amounts(segment);

    let mut values = Vec::new();
    for (start, end) in find_money_spans(&repaired) {
        let normalized: String = repaired[start..end]
            .chars()
            .filter(|c| *c != ' ' && *c != '\u{00A0}')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        if let Ok(value) = normalized.parse::<f64>() {
            if value > MIN_PLAUSIBLE && value < MAX_PLAUSIBLE {
                values.push(value);
            }
        }
    }
    values
}

/// Rounds to two decimal places, the precision of the reported price.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_glued_adjacent_amounts() {
        assert_eq!(find_money_values("1054.20541.20"), vec![1054.20, 541.20]);
    }

    #[test]
    fn splits_a_chain_of_glued_amounts() {
        assert_eq!(
            find_money_values("1.202.303.40"),
            vec![1.20, 2.30, 3.40]
        );
    }

    #[test]
    fn normalizes_nbsp_thousands_and_decimal_comma() {
        assert_eq!(find_money_values("1\u{00A0}234,56"), vec![1234.56]);
        assert_eq!(find_money_values("1 234,56"), vec![1234.56]);
    }

    #[test]
    fn preserves_left_to_right_order() {
        assert_eq!(
            find_money_values("net 500.10, excise 513.00, total 761.23"),
            vec![500.10, 513.00, 761.23]
        );
    }

    #[test]
    fn rejects_values_outside_plausible_interval() {
        // Zero and >= 10000 are noise, never a price.
        assert!(find_money_values("0.00").is_empty());
        assert!(find_money_values("12345.00").is_empty());
        assert_eq!(find_money_values("9999.99"), vec![9999.99]);
    }

    #[test]
    fn all_returned_values_are_plausible() {
        let text = "page 12 of 30, 2024-08-15, 0.00, 98001.23, 761.23 EUR";
        for v in find_money_values(text) {
            assert!(v > 0.0 && v < 10_000.0, "implausible value {v}");
        }
    }

    #[test]
    fn glue_repair_applies_before_matching() {
        // The repair pass reads "567.891" as a two-decimal amount glued to
        // a following digit, same as the column-collapse artifact.
        assert_eq!(find_money_values("567.891"), vec![567.89]);
    }

    #[test]
    fn rejects_token_preceded_by_a_digit() {
        // A four-digit "group" breaks the thousands shape; only the trailing
        // well-formed amount survives.
        assert_eq!(find_money_values("1234 567.89"), vec![567.89]);
    }

    #[test]
    fn plain_digit_run_before_decimals_is_accepted() {
        assert_eq!(find_money_values("1234.56"), vec![1234.56]);
    }

    #[test]
    fn ignores_integers_and_single_decimal_numbers() {
        assert!(find_money_values("protokolas Nr. 173 v2.1").is_empty());
    }
}
