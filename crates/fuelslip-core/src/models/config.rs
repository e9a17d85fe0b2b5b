//! Configuration structures for receipt extraction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FuelslipError, Result};

/// Main configuration for the fuelslip pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelslipConfig {
    /// Vendor detection configuration.
    pub vendor: VendorConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Target vendor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Lowercase keyword identifying the vendor in OCR text.
    pub keyword: String,

    /// A fragment must be strictly more confident than this to count as a vendor hit.
    pub min_confidence: f32,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            keyword: "shell".to_string(),
            min_confidence: 0.6,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Ordinal lines used by the fixed-layout strategies.
    pub layout: LineLayout,

    /// Minimum fragment confidence for the location candidate scan.
    pub location_min_confidence: f32,

    /// Characters taken on each side of the vendor keyword when scanning for a location.
    pub context_radius: usize,

    /// Two-digit year century disambiguation.
    pub century: CenturyRule,

    /// Year used for century disambiguation (defaults to the current year).
    pub reference_year: Option<i32>,

    /// Report the location from the raw text instead of the digit-normalized text.
    pub preserve_location_text: bool,

    /// Known fuel grades, most specific first.
    pub fuel_grades: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            layout: LineLayout::default(),
            location_min_confidence: 0.7,
            context_radius: 30,
            century: CenturyRule::default(),
            reference_year: None,
            preserve_location_text: false,
            fuel_grades: default_fuel_grades(),
        }
    }
}

/// Zero-based fragment indices of fields on the vendor's printed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineLayout {
    pub time_line: usize,
    pub date_line: usize,
    pub amount_line: usize,
    pub rate_line: usize,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            time_line: 15,
            date_line: 16,
            amount_line: 23,
            rate_line: 30,
        }
    }
}

/// Decides the century of a two-digit year relative to a reference year.
///
/// A scanned year `y` is placed in the previous century only when it lies
/// more than `future_margin` years ahead of the reference year's two-digit
/// form `c` and `y - c` exceeds `past_gap`. Everything else is `20yy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenturyRule {
    pub future_margin: i32,
    pub past_gap: i32,
}

impl Default for CenturyRule {
    fn default() -> Self {
        Self {
            future_margin: 5,
            past_gap: 50,
        }
    }
}

impl CenturyRule {
    /// Century prefix ("19" or "20") for a two-digit year.
    pub fn prefix(&self, two_digit_year: i32, reference_year: i32) -> &'static str {
        let current = reference_year.rem_euclid(100);
        if two_digit_year > current.saturating_add(self.future_margin)
            && two_digit_year.saturating_sub(current) > self.past_gap
        {
            "19"
        } else {
            "20"
        }
    }

    /// Expand a two-digit year to four digits.
    pub fn expand(&self, two_digit_year: &str, reference_year: i32) -> Option<String> {
        let year: i32 = two_digit_year.parse().ok()?;
        Some(format!("{}{}", self.prefix(year, reference_year), two_digit_year))
    }
}

fn default_fuel_grades() -> Vec<String> {
    [
        "shell v-power nitro+",
        "v-power nitro+",
        "nitro+",
        "shell v-power diesel",
        "v-power diesel",
        "shell v-power",
        "v-power",
        "shell super",
        "super",
        "shell ron 92",
        "ron 92",
        "shell ron 95",
        "ron 95",
        "diesel",
        "solar",
        "pertamax",
        "pertalite",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl FuelslipConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.vendor.keyword.trim().is_empty() {
            return Err(FuelslipError::Config("vendor.keyword must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&self.vendor.min_confidence) {
            return Err(FuelslipError::Config(format!(
                "vendor.min_confidence must be within [0, 1], got {}",
                self.vendor.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.extraction.location_min_confidence) {
            return Err(FuelslipError::Config(format!(
                "extraction.location_min_confidence must be within [0, 1], got {}",
                self.extraction.location_min_confidence
            )));
        }
        Ok(())
    }
}
