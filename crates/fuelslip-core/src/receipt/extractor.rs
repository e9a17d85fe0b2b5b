//! Field extraction for receipts of the target vendor.

use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use tracing::info;

use crate::models::config::{ExtractionConfig, FuelslipConfig};
use crate::models::receipt::PurchaseRecord;
use crate::ocr::FragmentSequence;

use super::rules::{
    derive_rate, extract_amount, extract_date_time, extract_fuel_type, extract_location,
    extract_rate, extract_volume, ExtractionMatch, ReceiptContext,
};
use super::trace::{ExtractionTrace, Field};

/// Result of field extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted purchase fields.
    pub record: PurchaseRecord,
    /// Strategy log for every field.
    pub trace: ExtractionTrace,
    /// Normalized receipt text the fallbacks searched.
    pub corpus: String,
}

/// Extracts purchase fields from a vertically sorted receipt.
///
/// Extraction never fails: a field that no strategy resolves is left empty
/// (or set to the fuel-type sentinel) and recorded as a miss in the trace.
#[derive(Debug, Clone)]
pub struct ReceiptExtractor {
    vendor: String,
    config: ExtractionConfig,
    reference_year: i32,
}

impl ReceiptExtractor {
    /// Create an extractor. The reference year comes from the configuration,
    /// or the current local year when unset.
    pub fn new(config: &FuelslipConfig) -> Self {
        let reference_year = config
            .extraction
            .reference_year
            .unwrap_or_else(|| Local::now().year());

        Self {
            vendor: config.vendor.keyword.trim().to_lowercase(),
            config: config.extraction.clone(),
            reference_year,
        }
    }

    /// Set the year used to place two-digit years.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn extract(&self, fragments: &FragmentSequence) -> PurchaseRecord {
        self.extract_with_trace(fragments).record
    }

    /// Extract all fields and record which strategy produced each.
    pub fn extract_with_trace(&self, fragments: &FragmentSequence) -> ExtractionResult {
        info!("Extracting purchase fields from {} fragments", fragments.len());

        let ctx = ReceiptContext::new(fragments, &self.vendor, self.reference_year, &self.config);
        let mut trace = ExtractionTrace::new();

        let location = resolve(&mut trace, Field::Location, extract_location(&ctx));
        let date_time = resolve(&mut trace, Field::DateTime, extract_date_time(&ctx));
        let fuel_type = resolve(&mut trace, Field::FuelType, extract_fuel_type(&ctx));
        let amount = resolve(&mut trace, Field::Amount, extract_amount(&ctx));
        let volume = resolve(&mut trace, Field::Volume, extract_volume(&ctx));
        let rate = self.resolve_rate(&mut trace, &ctx, amount, volume);

        let record = PurchaseRecord {
            location,
            date_time,
            fuel_type: fuel_type.unwrap_or_else(|| PurchaseRecord::default().fuel_type),
            amount,
            volume,
            rate,
        };

        info!(
            "Extracted {} of {} fields",
            trace.entries().len(),
            Field::ALL.len()
        );

        ExtractionResult {
            record,
            trace,
            corpus: ctx.corpus,
        }
    }

    fn resolve_rate(
        &self,
        trace: &mut ExtractionTrace,
        ctx: &ReceiptContext<'_>,
        amount: Option<Decimal>,
        volume: Option<Decimal>,
    ) -> Option<Decimal> {
        if let Some(found) = extract_rate(ctx) {
            trace.resolved(Field::Rate, found.strategy, found.source);
            return Some(found.value);
        }

        let derived = amount
            .zip(volume)
            .and_then(|(amount, volume)| Some((derive_rate(amount, volume)?, amount, volume)));
        match derived {
            Some((rate, amount, volume)) => {
                trace.resolved(Field::Rate, "derived", format!("{amount} / {volume}"));
                Some(rate)
            }
            None => {
                trace.missed(Field::Rate);
                None
            }
        }
    }
}

fn resolve<T>(
    trace: &mut ExtractionTrace,
    field: Field,
    found: Option<ExtractionMatch<T>>,
) -> Option<T> {
    match found {
        Some(found) => {
            trace.resolved(field, found.strategy, found.source);
            Some(found.value)
        }
        None => {
            trace.missed(field);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::UNKNOWN_FUEL_TYPE;
    use crate::receipt::rules::test_support::{receipt, receipt_with_lines};
    use pretty_assertions::assert_eq;

    fn extractor() -> ReceiptExtractor {
        ReceiptExtractor::new(&FuelslipConfig::default()).with_reference_year(2024)
    }

    fn scenario_a() -> FragmentSequence {
        receipt_with_lines(
            32,
            &[
                (0, "SHELL JLN SUDIRMAN NO 5"),
                (5, "V-Power"),
                (15, "14:32"),
                (16, "01-06-24"),
                (23, "130.000"),
                (30, "6.500"),
            ],
        )
    }

    #[test]
    fn test_scenario_a() {
        let record = extractor().extract(&scenario_a());

        assert_eq!(
            record,
            PurchaseRecord {
                location: Some("SHELL JLN SUDIRMAN N0 5".to_string()),
                date_time: Some("01/06/2024 14:32".to_string()),
                fuel_type: "V-Power".to_string(),
                amount: Some(Decimal::from(130000)),
                volume: None,
                rate: Some(Decimal::from(6500)),
            }
        );
    }

    #[test]
    fn test_trace_names_strategies() {
        let result = extractor().extract_with_trace(&scenario_a());
        let trace = &result.trace;

        assert_eq!(trace.strategy_for(Field::Location), Some("first_line"));
        assert_eq!(trace.strategy_for(Field::DateTime), Some("fixed_lines"));
        assert_eq!(trace.strategy_for(Field::Amount), Some("amount_line"));
        assert_eq!(trace.strategy_for(Field::Rate), Some("rate_line"));
        assert_eq!(trace.misses(), &[Field::Volume]);
        assert!(result.corpus.starts_with("SHELL JLN SUDIRMAN N0 5"));
    }

    #[test]
    fn test_rate_derived_from_amount_and_volume() {
        let fragments = receipt(&["SHELL", "Total Rp 130.000", "Volume 20,0 Liter"], 0.9);
        let result = extractor().extract_with_trace(&fragments);

        assert_eq!(result.record.amount, Some(Decimal::from(130000)));
        assert_eq!(result.record.volume, Some(Decimal::new(200, 1)));
        assert_eq!(result.record.rate, Some(Decimal::from(6500)));
        assert_eq!(result.trace.strategy_for(Field::Rate), Some("derived"));
    }

    #[test]
    fn test_zero_volume_leaves_rate_empty() {
        let fragments = receipt(&["SHELL", "Total Rp 130.000", "0 Liter"], 0.9);
        let record = extractor().extract(&fragments);
        assert_eq!(record.volume, Some(Decimal::ZERO));
        assert_eq!(record.rate, None);
    }

    #[test]
    fn test_empty_receipt_has_only_sentinel() {
        let result = extractor().extract_with_trace(&FragmentSequence::default());
        assert_eq!(result.record, PurchaseRecord::default());
        assert_eq!(result.record.fuel_type, UNKNOWN_FUEL_TYPE);
        assert_eq!(result.trace.misses().len(), Field::ALL.len());
    }

    #[test]
    fn test_reference_year_from_config() {
        let mut config = FuelslipConfig::default();
        config.extraction.reference_year = Some(1990);
        let extractor = ReceiptExtractor::new(&config);
        assert_eq!(extractor.reference_year(), 1990);

        // 99 - 90 is within the 50-year gap, so the year stays in 20xx.
        let fragments = receipt_with_lines(17, &[(16, "01/01/99")]);
        assert_eq!(extractor.extract(&fragments).date_time.as_deref(), Some("01/01/2099"));
    }
}
