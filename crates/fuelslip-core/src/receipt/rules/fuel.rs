//! Fuel grade extraction.

use super::{ExtractionMatch, ReceiptContext};
use crate::receipt::normalize;

/// Find the first configured fuel grade present in the receipt.
///
/// Grades are tried in configuration order, so more specific names must
/// come before the shorter names they contain. Each grade is normalized
/// the same way as the receipt text before comparison. The reported name
/// drops the vendor prefix and is title-cased.
pub fn extract_fuel_type(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<String>> {
    let vendor_prefix = format!("{} ", ctx.vendor);

    ctx.config.fuel_grades.iter().find_map(|grade| {
        let grade = grade.trim().to_lowercase();
        if grade.is_empty() {
            return None;
        }
        let needle = normalize(&grade).to_lowercase();
        if !ctx.corpus_lower.contains(&needle) {
            return None;
        }

        let name = grade.strip_prefix(&vendor_prefix).unwrap_or(&grade);
        Some(ExtractionMatch::new(title_case(name), "grade_keyword", needle))
    })
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
///
/// ```
/// use fuelslip_core::receipt::rules::title_case;
///
/// assert_eq!(title_case("v-power nitro+"), "V-Power Nitro+");
/// ```
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    out
}
