//! Core library for fuel receipt OCR processing.
//!
//! This crate provides:
//! - OCR fragment types and the vertically sorted fragment sequence
//! - OCR confusion normalization for numeric fields
//! - Vendor detection and fuel receipt field extraction (location, date/time,
//!   fuel grade, amount, volume, unit rate)
//! - Result assembly into the JSON shape consumed by presentation layers

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;

pub use error::{FuelslipError, OcrError, Result};
pub use models::config::{CenturyRule, ExtractionConfig, FuelslipConfig, LineLayout, VendorConfig};
pub use models::receipt::{DetectedWord, DetectionResult, PurchaseRecord, UNKNOWN_FUEL_TYPE};
pub use ocr::{FragmentSequence, OcrEngine, Point, RecordedOcr, TextFragment};
pub use receipt::{
    normalize, ExtractionResult, ExtractionTrace, Field, ReceiptAnalysis, ReceiptAssembler,
    ReceiptExtractor, ReceiptScanner, TraceEntry, VendorDetector,
};
