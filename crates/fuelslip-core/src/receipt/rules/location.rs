//! Station location extraction.

use super::patterns::{ADDRESS_MARKER, ADDRESS_WITH_NUMBER, VENDOR_ADDRESS_TAIL, VENDOR_TAIL};
use super::{ExtractionMatch, ReceiptContext};
use crate::receipt::normalize;

/// Extract the station location.
///
/// Strategies, in order:
/// 1. the first line, if it names the vendor or looks like an address;
/// 2. `<vendor> <address text> <marker> <number>` anywhere in the receipt;
/// 3. the first confident fragment that names the vendor (text following
///    the keyword in the receipt text) or holds a numbered address.
pub fn extract_location(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<String>> {
    first_line(ctx)
        .or_else(|| vendor_address(ctx))
        .or_else(|| confident_candidate(ctx))
}

fn first_line(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<String>> {
    let raw = ctx.fragments.first()?.text.trim();
    let cleaned = normalize(raw);
    if cleaned.is_empty() {
        return None;
    }

    let lower = cleaned.to_lowercase();
    if !lower.contains(&ctx.vendor_normalized) && !ADDRESS_MARKER.is_match(&lower) {
        return None;
    }

    let value = if ctx.config.preserve_location_text {
        raw.to_string()
    } else {
        cleaned
    };
    Some(ExtractionMatch::new(value, "first_line", raw))
}

fn vendor_address(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<String>> {
    let (text, vendor) = if ctx.config.preserve_location_text {
        (&ctx.plain_lower, ctx.vendor)
    } else {
        (&ctx.corpus_lower, ctx.vendor_normalized.as_str())
    };

    text.match_indices(vendor).find_map(|(start, keyword)| {
        let end = start + keyword.len();
        let tail = VENDOR_ADDRESS_TAIL.find(&text[end..])?;
        let found = text[start..end + tail.end()].trim();
        Some(ExtractionMatch::new(found.to_string(), "vendor_address", found))
    })
}

fn confident_candidate(ctx: &ReceiptContext<'_>) -> Option<ExtractionMatch<String>> {
    let min_confidence = ctx.config.location_min_confidence;

    ctx.fragments
        .iter()
        .filter(|f| f.confidence > min_confidence)
        .find_map(|fragment| {
            let lower = fragment.text.to_lowercase();
            if lower.contains(ctx.vendor) {
                text_after_vendor(ctx).map(|tail| {
                    ExtractionMatch::new(tail, "vendor_context", fragment.text.as_str())
                })
            } else if ADDRESS_WITH_NUMBER.is_match(&lower) {
                let text = fragment.text.trim();
                Some(ExtractionMatch::new(text.to_string(), "address_fragment", text))
            } else {
                None
            }
        })
}

/// Address-like text following the first vendor keyword in the receipt,
/// read from a window of `context_radius` characters around the keyword.
fn text_after_vendor(ctx: &ReceiptContext<'_>) -> Option<String> {
    let text = &ctx.corpus_lower;
    let vendor = ctx.vendor_normalized.as_str();
    let byte_index = text.find(vendor)?;

    let chars: Vec<char> = text.chars().collect();
    let index = text[..byte_index].chars().count();
    let radius = ctx.config.context_radius;
    let end = index.saturating_add(radius).min(chars.len());
    let window: String = chars[index.saturating_sub(radius)..end].iter().collect();

    let keyword_at = window.find(vendor)?;
    let after = &window[keyword_at + vendor.len()..];
    let caps = VENDOR_TAIL.captures(after)?;
    let tail = caps[1].trim();

    (!tail.is_empty()).then(|| tail.to_string())
}
