//! Rule-based field extractors for fuel receipts.
//!
//! Each field is resolved by an ordered chain of strategies. Fixed-line
//! strategies read a fragment by its position on the vendor's layout; the
//! fallbacks search the whole receipt text. The first strategy that yields a
//! value wins.

pub mod amounts;
pub mod datetime;
pub mod fuel;
pub mod location;
pub mod patterns;

pub use amounts::{derive_rate, extract_amount, extract_rate, extract_volume, parse_decimal_comma, parse_grouped_number};
pub use datetime::extract_date_time;
pub use fuel::{extract_fuel_type, title_case};
pub use location::extract_location;

use crate::models::config::ExtractionConfig;
use crate::ocr::FragmentSequence;

use super::normalize;

/// A value produced by a named strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Strategy that produced the value.
    pub strategy: &'static str,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, strategy: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            strategy,
            source: source.into(),
        }
    }
}

/// Everything the strategies read from one receipt.
#[derive(Debug)]
pub struct ReceiptContext<'a> {
    /// Fragments in reading order.
    pub fragments: &'a FragmentSequence,
    /// Normalized fragment texts joined by single spaces.
    pub corpus: String,
    /// Lowercase `corpus`, for keyword search.
    pub corpus_lower: String,
    /// Raw fragment texts joined by single spaces, lowercased.
    pub plain_lower: String,
    /// Lowercase vendor keyword.
    pub vendor: &'a str,
    /// `vendor` normalized like `corpus`, for searching the normalized text.
    pub vendor_normalized: String,
    /// Year used to place two-digit years.
    pub reference_year: i32,
    pub config: &'a ExtractionConfig,
}

impl<'a> ReceiptContext<'a> {
    pub fn new(
        fragments: &'a FragmentSequence,
        vendor: &'a str,
        reference_year: i32,
        config: &'a ExtractionConfig,
    ) -> Self {
        let corpus = fragments
            .iter()
            .map(|f| normalize(&f.text))
            .collect::<Vec<_>>()
            .join(" ");
        let corpus_lower = corpus.to_lowercase();
        let plain_lower = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let vendor_normalized = normalize(vendor).to_lowercase();

        Self {
            fragments,
            corpus,
            corpus_lower,
            plain_lower,
            vendor,
            vendor_normalized,
            reference_year,
            config,
        }
    }

    /// Normalized text of an ordinal line, `None` past the end of the receipt.
    pub fn normalized_line(&self, index: usize) -> Option<String> {
        self.fragments.line(index).map(|f| normalize(&f.text))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ocr::{FragmentSequence, TextFragment};

    /// One fragment per line, 20px apart, all at the given confidence.
    pub fn receipt(lines: &[&str], confidence: f32) -> FragmentSequence {
        let fragments = lines
            .iter()
            .enumerate()
            .map(|(i, text)| TextFragment::from_rect(10.0, i as f32 * 20.0, 200.0, 15.0, *text, confidence))
            .collect();
        FragmentSequence::from_unsorted(fragments)
    }

    /// A receipt of `len` placeholder lines with the given lines set at fixed indices.
    pub fn receipt_with_lines(len: usize, lines: &[(usize, &str)]) -> FragmentSequence {
        let mut texts: Vec<String> = (0..len).map(|i| format!("#{i}")).collect();
        for (index, text) in lines {
            texts[*index] = text.to_string();
        }
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        receipt(&refs, 0.9)
    }
}
