//! Purchase record and detection result models.
//!
//! The serialized form of [`DetectionResult`] is the contract with the
//! presentation layer:
//!
//! ```json
//! { "is_target_vendor": true,
//!   "purchase_details": { "location": "...", "date_time": "...",
//!                         "name": "Fuel purchase V-Power",
//!                         "amount": 130000.0, "volume": null, "rate": 6500.0 } }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fuel type reported when no known grade appears on the receipt.
pub const UNKNOWN_FUEL_TYPE: &str = "Unknown Fuel Type";

const PURCHASE_NAME_PREFIX: &str = "Fuel purchase ";

/// Structured fields of a matched fuel receipt.
///
/// Every field is independently optional except `fuel_type`, which holds
/// [`UNKNOWN_FUEL_TYPE`] when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Station name and/or address.
    pub location: Option<String>,

    /// `DD/MM/YYYY`, `DD/MM/YYYY HH:MM[:SS]`, or a date-only/time-only fallback.
    pub date_time: Option<String>,

    /// Title-cased fuel grade.
    pub fuel_type: String,

    /// Total paid, in currency units.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,

    /// Dispensed volume in liters.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub volume: Option<Decimal>,

    /// Price per liter.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub rate: Option<Decimal>,
}

impl Default for PurchaseRecord {
    fn default() -> Self {
        Self {
            location: None,
            date_time: None,
            fuel_type: UNKNOWN_FUEL_TYPE.to_string(),
            amount: None,
            volume: None,
            rate: None,
        }
    }
}

impl PurchaseRecord {
    /// Display name used by the presentation layer.
    pub fn purchase_name(&self) -> String {
        format!("{}{}", PURCHASE_NAME_PREFIX, self.fuel_type)
    }
}

/// A recognized word reported for receipts of other vendors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedWord {
    pub text: String,
    /// Confidence rounded to two decimals.
    pub confidence: f32,
}

impl DetectedWord {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: (confidence * 100.0).round() / 100.0,
        }
    }
}

/// Outcome of analyzing one receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DetectionPayload", from = "DetectionPayload")]
pub enum DetectionResult {
    /// The receipt does not belong to the target vendor.
    NotMatched { detected_words: Vec<DetectedWord> },
    /// The receipt belongs to the target vendor.
    Matched(PurchaseRecord),
}

impl DetectionResult {
    pub fn is_target_vendor(&self) -> bool {
        matches!(self, DetectionResult::Matched(_))
    }

    pub fn record(&self) -> Option<&PurchaseRecord> {
        match self {
            DetectionResult::Matched(record) => Some(record),
            DetectionResult::NotMatched { .. } => None,
        }
    }

    pub fn detected_words(&self) -> &[DetectedWord] {
        match self {
            DetectionResult::NotMatched { detected_words } => detected_words,
            DetectionResult::Matched(_) => &[],
        }
    }
}

/// Wire form of [`DetectionResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DetectionPayload {
    is_target_vendor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purchase_details: Option<PurchaseDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detected_words: Option<Vec<DetectedWord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PurchaseDetails {
    location: Option<String>,
    date_time: Option<String>,
    name: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    volume: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    rate: Option<Decimal>,
}

impl From<DetectionResult> for DetectionPayload {
    fn from(result: DetectionResult) -> Self {
        match result {
            DetectionResult::Matched(record) => Self {
                is_target_vendor: true,
                purchase_details: Some(PurchaseDetails {
                    name: record.purchase_name(),
                    location: record.location,
                    date_time: record.date_time,
                    amount: record.amount,
                    volume: record.volume,
                    rate: record.rate,
                }),
                detected_words: None,
            },
            DetectionResult::NotMatched { detected_words } => Self {
                is_target_vendor: false,
                purchase_details: None,
                detected_words: Some(detected_words),
            },
        }
    }
}

impl From<DetectionPayload> for DetectionResult {
    fn from(payload: DetectionPayload) -> Self {
        match (payload.is_target_vendor, payload.purchase_details) {
            (true, Some(details)) => {
                let fuel_type = details
                    .name
                    .strip_prefix(PURCHASE_NAME_PREFIX)
                    .unwrap_or(&details.name)
                    .to_string();
                DetectionResult::Matched(PurchaseRecord {
                    location: details.location,
                    date_time: details.date_time,
                    fuel_type,
                    amount: details.amount,
                    volume: details.volume,
                    rate: details.rate,
                })
            }
            (true, None) => DetectionResult::Matched(PurchaseRecord::default()),
            (false, _) => DetectionResult::NotMatched {
                detected_words: payload.detected_words.unwrap_or_default(),
            },
        }
    }
}
