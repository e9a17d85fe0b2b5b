//! OCR engine backed by recorded engine output.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{OcrEngine, RawFragment, TextFragment};
use crate::error::OcrError;

/// Replays fragments from a JSON dump of an OCR engine run.
///
/// The dump is either a bare list of fragments or an object with a
/// `fragments` list. Each fragment is an object
/// (`{"polygon", "text", "confidence"}`) or a `[polygon, text, confidence]`
/// triple as produced by common Python OCR engines.
#[derive(Debug, Clone, Default)]
pub struct RecordedOcr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordedDump {
    List(Vec<RawFragment>),
    Wrapped { fragments: Vec<RawFragment> },
}

impl RecordedOcr {
    pub fn new() -> Self {
        Self
    }

    /// Decode and validate a recorded dump.
    pub fn parse(data: &[u8]) -> Result<Vec<TextFragment>, OcrError> {
        let dump: RecordedDump = serde_json::from_slice(data)
            .map_err(|e| OcrError::MalformedOutput(e.to_string()))?;

        let raw = match dump {
            RecordedDump::List(fragments) | RecordedDump::Wrapped { fragments } => fragments,
        };

        let fragments = raw
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                TextFragment::try_from(raw).map_err(|reason| {
                    warn!("Rejected recorded fragment {}: {}", index, reason);
                    OcrError::InvalidFragment { index, reason }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Decoded {} recorded fragments", fragments.len());
        Ok(fragments)
    }

    /// Read and decode a recorded dump from disk.
    pub fn load(path: &Path) -> crate::Result<Vec<TextFragment>> {
        let data = std::fs::read(path)?;
        Ok(Self::parse(&data)?)
    }
}

impl OcrEngine for RecordedOcr {
    fn recognize(&self, input: &[u8]) -> Result<Vec<TextFragment>, OcrError> {
        Self::parse(input)
    }

    fn name(&self) -> &str {
        "recorded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_of_triples() {
        let data = br#"[
            [[[0,0],[10,0],[10,5],[0,5]], "SHELL", 0.93],
            [[[0,9],[10,9],[10,14],[0,14]], "JLN SUDIRMAN", 0.81]
        ]"#;
        let fragments = RecordedOcr::parse(data).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].text, "JLN SUDIRMAN");
    }

    #[test]
    fn test_parse_wrapped_objects() {
        let data = br#"{"fragments": [
            {"polygon": [[0,0],[10,0],[10,5],[0,5]], "text": "14:32", "confidence": 0.7}
        ]}"#;
        let fragments = RecordedOcr.recognize(data).unwrap();
        assert_eq!(fragments[0].text, "14:32");
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(RecordedOcr::parse(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_fragment_reports_index() {
        let data = br#"[
            [[[0,0],[10,0],[10,5],[0,5]], "ok", 0.9],
            [[[0,0],[10,0],[10,5],[0,5]], "bad", 2.0]
        ]"#;
        match RecordedOcr::parse(data) {
            Err(OcrError::InvalidFragment { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RecordedOcr::parse(b"{not json"),
            Err(OcrError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, r#"[[[[0,0],[1,0],[1,1],[0,1]], "x", 0.5]]"#).unwrap();
        assert_eq!(RecordedOcr::load(&path).unwrap().len(), 1);
    }
}
