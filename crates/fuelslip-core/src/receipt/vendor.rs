//! Target vendor detection.

use tracing::debug;

use crate::models::config::VendorConfig;
use crate::ocr::TextFragment;

/// Decides whether a receipt was printed by the target vendor.
///
/// A single fragment containing the keyword with enough confidence is
/// sufficient; there is no voting across fragments and the raw text is
/// used without normalization.
#[derive(Debug, Clone)]
pub struct VendorDetector {
    keyword: String,
    min_confidence: f32,
}

impl VendorDetector {
    pub fn new(config: &VendorConfig) -> Self {
        Self {
            keyword: config.keyword.trim().to_lowercase(),
            min_confidence: config.min_confidence,
        }
    }

    /// The lowercase vendor keyword.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn is_target_vendor(&self, fragments: &[TextFragment]) -> bool {
        let hit = fragments.iter().find(|f| self.is_vendor_hit(f));
        if let Some(fragment) = hit {
            debug!(
                "Vendor keyword '{}' found in '{}' ({:.2})",
                self.keyword, fragment.text, fragment.confidence
            );
        }
        hit.is_some()
    }

    fn is_vendor_hit(&self, fragment: &TextFragment) -> bool {
        fragment.confidence > self.min_confidence
            && fragment.text.to_lowercase().contains(&self.keyword)
    }
}

impl Default for VendorDetector {
    fn default() -> Self {
        Self::new(&VendorConfig::default())
    }
}
