//! Common regex patterns for fuel receipt extraction.
//!
//! Patterns that run on normalized text accept `0` where the printed word
//! contains an `o` (`r[o0]ad`, `t[o0]tal`), since normalization rewrites
//! every `o`. Digits are ASCII only.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Address markers: street words, optionally followed by a number
    pub static ref ADDRESS_MARKER: Regex = Regex::new(
        r"(?i)(?:jalan|jln|street|rd|r[o0]ad|n[o0])\s*[0-9]*"
    ).unwrap();

    pub static ref ADDRESS_WITH_NUMBER: Regex = Regex::new(
        r"(?i)(?:jalan|jln|street|rd|r[o0]ad|n[o0])\s*[0-9]+"
    ).unwrap();

    // Text right after the vendor keyword, ending in an address marker and number
    pub static ref VENDOR_ADDRESS_TAIL: Regex = Regex::new(
        r"^\s+[a-z0-9\s,.-]+(?:jalan|jln|street|rd|r[o0]ad|n[o0])\s*[0-9]+"
    ).unwrap();

    // Address-like text right after the vendor keyword
    pub static ref VENDOR_TAIL: Regex = Regex::new(
        r"^\s*([a-z0-9\s,.-]+)"
    ).unwrap();

    // Standalone time / date lines (HH:MM[:SS], DD-MM-YY[YY])
    pub static ref TIME_LINE: Regex = Regex::new(
        r"^\s*([0-9]{2}:[0-9]{2}(?::[0-9]{2})?)\s*$"
    ).unwrap();

    pub static ref DATE_LINE: Regex = Regex::new(
        r"^\s*([0-9]{2})[-/]([0-9]{2})[-/]([0-9]{2}(?:[0-9]{2})?)\s*$"
    ).unwrap();

    // Date and time anywhere in the receipt
    pub static ref DATE_TIME_DMY: Regex = Regex::new(
        r"([0-9]{2}[-/][0-9]{2}[-/][0-9]{4})\s+([0-9]{2}:[0-9]{2}(?::[0-9]{2})?)"
    ).unwrap();

    pub static ref DATE_TIME_YMD: Regex = Regex::new(
        r"([0-9]{4})[-/]([0-9]{2})[-/]([0-9]{2})\s+([0-9]{2}:[0-9]{2}(?::[0-9]{2})?)"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"[0-9]{2}[-/][0-9]{2}[-/][0-9]{4}"
    ).unwrap();

    pub static ref TIME: Regex = Regex::new(
        r"[0-9]{2}:[0-9]{2}(?::[0-9]{2})?"
    ).unwrap();

    // First digit run of a line, with '.'/',' groups (130.000, 1.234,56)
    pub static ref DIGIT_RUN: Regex = Regex::new(
        r"[0-9]+(?:[.,][0-9]+)*"
    ).unwrap();

    // Labeled total (Indonesian receipts print "Rp" before amounts)
    pub static ref LABELED_TOTAL: Regex = Regex::new(
        r"(?i)(?:t[o0]tal|am[o0]unt|grand\s*t[o0]tal)\s*[:=]?\s*(?:rp\.?)?\s*([0-9]{1,3}(?:[.,][0-9]{3})+(?:[.,][0-9]{2})?|[0-9]+(?:[.,][0-9]{2})?)"
    ).unwrap();

    pub static ref TRAILING_CURRENCY: Regex = Regex::new(
        r"(?i)rp\.?\s*([0-9]{1,3}(?:[.,][0-9]{3})+(?:[.,][0-9]{2})?|[0-9]+(?:[.,][0-9]{2})?)\s*$"
    ).unwrap();

    // Volume in liters
    pub static ref VOLUME: Regex = Regex::new(
        r"(?i)([0-9]+(?:[.,][0-9]+)?)\s*(?:liter|litre|lt)"
    ).unwrap();

    // Unit price: "6.500/l", "Rp 6.500 / liter", "6500 per unit". A
    // standalone "l" has already been normalized to "1".
    pub static ref RATE_PER_UNIT: Regex = Regex::new(
        r"(?i)([0-9]+(?:[.,][0-9]+)*)\s*(?:rp\.?\s*)?(?:/|per\s+)\s*(?:liter|litre|ltr|lt|l|1|unit)\b"
    ).unwrap();
}
