//! Result assembly and the end-to-end receipt scanner.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::models::config::FuelslipConfig;
use crate::models::receipt::{DetectedWord, DetectionResult};
use crate::ocr::{FragmentSequence, OcrEngine};

use super::extractor::ReceiptExtractor;
use super::trace::ExtractionTrace;
use super::vendor::VendorDetector;

/// Detection result together with how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptAnalysis {
    pub result: DetectionResult,
    /// Empty when the receipt belongs to another vendor.
    pub trace: ExtractionTrace,
    pub fragment_count: usize,
    pub processing_time_ms: u64,
}

/// Turns a sorted receipt into a [`DetectionResult`].
#[derive(Debug, Clone)]
pub struct ReceiptAssembler {
    detector: VendorDetector,
    extractor: ReceiptExtractor,
}

impl ReceiptAssembler {
    pub fn new(config: &FuelslipConfig) -> Self {
        Self {
            detector: VendorDetector::new(&config.vendor),
            extractor: ReceiptExtractor::new(config),
        }
    }

    /// Set the year used to place two-digit years.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.extractor = self.extractor.with_reference_year(year);
        self
    }

    pub fn assemble(&self, fragments: &FragmentSequence) -> DetectionResult {
        self.analyze(fragments).result
    }

    /// Detect the vendor, then either extract fields or list the recognized words.
    pub fn analyze(&self, fragments: &FragmentSequence) -> ReceiptAnalysis {
        let start = Instant::now();

        let (result, trace) = if self.detector.is_target_vendor(fragments.as_slice()) {
            let extraction = self.extractor.extract_with_trace(fragments);
            (DetectionResult::Matched(extraction.record), extraction.trace)
        } else {
            info!(
                "No confident '{}' fragment among {} fragments",
                self.detector.keyword(),
                fragments.len()
            );
            let detected_words = fragments
                .iter()
                .map(|f| DetectedWord::new(f.text.as_str(), f.confidence))
                .collect();
            (DetectionResult::NotMatched { detected_words }, ExtractionTrace::new())
        };

        ReceiptAnalysis {
            result,
            trace,
            fragment_count: fragments.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for ReceiptAssembler {
    fn default() -> Self {
        Self::new(&FuelslipConfig::default())
    }
}

/// Runs an OCR engine over raw input and analyzes its output.
pub struct ReceiptScanner<E: OcrEngine> {
    engine: E,
    assembler: ReceiptAssembler,
}

impl<E: OcrEngine> ReceiptScanner<E> {
    pub fn new(engine: E, assembler: ReceiptAssembler) -> Self {
        Self { engine, assembler }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn scan(&self, input: &[u8]) -> crate::Result<ReceiptAnalysis> {
        let fragments = self.engine.recognize(input)?;
        info!(
            "{} engine returned {} fragments",
            self.engine.name(),
            fragments.len()
        );
        Ok(self.assembler.analyze(&FragmentSequence::from_unsorted(fragments)))
    }
}
