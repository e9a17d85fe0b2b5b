//! Fuel receipt analysis module.

mod assembler;
mod extractor;
mod normalize;
pub mod rules;
mod trace;
mod vendor;

pub use assembler::{ReceiptAnalysis, ReceiptAssembler, ReceiptScanner};
pub use extractor::{ExtractionResult, ReceiptExtractor};
pub use normalize::normalize;
pub use trace::{ExtractionTrace, Field, TraceEntry};
pub use vendor::VendorDetector;
