//! Error types for the fuelslip-core library.
//!
//! Field extraction itself never fails: a pattern miss or a bad number
//! leaves the field empty. These errors only cover the edges of the
//! pipeline (reading OCR output and configuration).

use thiserror::Error;

/// Main error type for the fuelslip library.
#[derive(Error, Debug)]
pub enum FuelslipError {
    /// OCR engine or OCR output error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by OCR engines and while reading their output.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The engine could not be reached or initialized.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine output could not be decoded.
    #[error("malformed OCR output: {0}")]
    MalformedOutput(String),

    /// A decoded fragment has a bad polygon or confidence.
    #[error("invalid fragment #{index}: {reason}")]
    InvalidFragment { index: usize, reason: String },
}

/// Result type for the fuelslip library.
pub type Result<T> = std::result::Result<T, FuelslipError>;
