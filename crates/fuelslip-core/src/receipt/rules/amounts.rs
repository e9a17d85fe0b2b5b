//! Amount, volume and unit-rate extraction.
//!
//! Receipts print numbers with `.` as the thousands separator and `,` as
//! the decimal point (`130.000`, `1.234,56`, `20,5`).

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{DIGIT_RUN, LABELED_TOTAL, RATE_PER_UNIT, TRAILING_CURRENCY, VOLUME};
use super::{ExtractionMatch, ReceiptContext};

/// Parse a grouped number: `.` is dropped as a thousands separator, then
/// `,` is read as the decimal point.
///
/// ```
/// use fuelslip_core::receipt::rules::parse_grouped_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_grouped_number("1.234,56"), Some(Decimal::new(123456, 2)));
/// assert_eq!(parse_grouped_number("1234"), Some(Decimal::from(1234)));
/// ```
pub fn parse_grouped_number(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace('.', "").replace(',', ".");
    Decimal::from_str(&cleaned).ok()
}

/// Parse a number whose only separator is a decimal comma (or point).
pub fn parse_decimal_comma(text: &str) -> Option<Decimal> {
    Decimal::from_str(&text.trim().replace(',', ".")).ok()
}

/// Extract the total paid.
pub fn extract_amount(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<Decimal>> {
    digit_run_on_line(ctx, ctx.config.layout.amount_line, "amount_line")
        .or_else(|| captured_number(&LABELED_TOTAL, &ctx.corpus, "labeled_total"))
        .or_else(|| captured_number(&TRAILING_CURRENCY, &ctx.corpus, "trailing_currency"))
}

/// Extract the dispensed volume in liters.
pub fn extract_volume(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<Decimal>> {
    let caps = VOLUME.captures(&ctx.corpus)?;
    let value = parse_decimal_comma(&caps[1])?;
    Some(ExtractionMatch::new(value, "volume_unit", &caps[0]))
}

/// Extract the printed price per liter. Derivation from amount and volume
/// is left to the caller, see [`derive_rate`].
pub fn extract_rate(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<Decimal>> {
    digit_run_on_line(ctx, ctx.config.layout.rate_line, "rate_line")
        .or_else(|| captured_number(&RATE_PER_UNIT, &ctx.corpus, "per_unit"))
}

/// `amount / volume` rounded to two decimal places, when volume is positive.
pub fn derive_rate(amount: Decimal, volume: Decimal) -> Option<Decimal> {
    if volume <= Decimal::ZERO {
        return None;
    }
    amount.checked_div(volume).map(|rate| rate.round_dp(2))
}

fn digit_run_on_line(
    ctx: &ReceiptContext<'_>,
    index: usize,
    strategy: &'static str,
) -> Option<ExtractionMatch<Decimal>> {
    let line = ctx.normalized_line(index)?;
    let run = DIGIT_RUN.find(&line)?;
    let value = parse_grouped_number(run.as_str())?;
    Some(ExtractionMatch::new(value, strategy, line.as_str()))
}

fn captured_number(
    pattern: &regex::Regex,
    text: &str,
    strategy: &'static str,
) -> Option<ExtractionMatch<Decimal>> {
    let caps = pattern.captures(text)?;
    let value = parse_grouped_number(&caps[1])?;
    Some(ExtractionMatch::new(value, strategy, &caps[0]))
}
