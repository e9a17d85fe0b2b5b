//! OCR fragment types and the engine boundary.
//!
//! Recognition itself happens outside this crate. An [`OcrEngine`] turns raw
//! input into [`TextFragment`]s; everything downstream works on a
//! [`FragmentSequence`], which is always sorted top to bottom.

mod recorded;

pub use recorded::RecordedOcr;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// One recognized text unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFragment")]
pub struct TextFragment {
    /// Quadrilateral corners in the order returned by the engine.
    pub polygon: [Point; 4],

    /// Recognized text content, possibly misrecognized.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl TextFragment {
    pub fn new(polygon: [Point; 4], text: impl Into<String>, confidence: f32) -> Self {
        Self {
            polygon,
            text: text.into(),
            confidence,
        }
    }

    /// Build a fragment from an axis-aligned rectangle.
    #[cfg(test)]
    pub(crate) fn from_rect(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        text: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self::new(
            [
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
            text,
            confidence,
        )
    }

    /// Vertical position of the first polygon point (the reading-order key).
    pub fn top(&self) -> f32 {
        self.polygon[0].y
    }
}

/// Fragment as decoded from engine output: either an object or the
/// engine's native `[polygon, text, confidence]` triple.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawFragment {
    Object {
        polygon: Vec<Point>,
        text: String,
        confidence: f32,
    },
    Triple(Vec<Point>, String, f32),
}

impl TryFrom<RawFragment> for TextFragment {
    type Error = String;

    fn try_from(raw: RawFragment) -> Result<Self, Self::Error> {
        let (polygon, text, confidence) = match raw {
            RawFragment::Object {
                polygon,
                text,
                confidence,
            } => (polygon, text, confidence),
            RawFragment::Triple(polygon, text, confidence) => (polygon, text, confidence),
        };

        let polygon: [Point; 4] = polygon
            .try_into()
            .map_err(|p: Vec<Point>| format!("polygon has {} points, expected 4", p.len()))?;
        if !polygon.iter().all(Point::is_finite) {
            return Err("polygon has non-finite coordinates".to_string());
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("confidence {confidence} outside [0, 1]"));
        }

        Ok(Self::new(polygon, text, confidence))
    }
}

/// Fragments sorted top to bottom by the first polygon point.
///
/// The sort is stable, so fragments sharing a vertical position keep their
/// engine order. Non-finite positions sort last. Indices into the sequence
/// are treated as printed receipt lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentSequence {
    fragments: Vec<TextFragment>,
}

impl FragmentSequence {
    /// Sort engine output into reading order.
    pub fn from_unsorted(mut fragments: Vec<TextFragment>) -> Self {
        fragments.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));
        Self { fragments }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragment at an ordinal line, `None` when the receipt is too short.
    pub fn line(&self, index: usize) -> Option<&TextFragment> {
        self.fragments.get(index)
    }

    pub fn first(&self) -> Option<&TextFragment> {
        self.fragments.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextFragment> {
        self.fragments.iter()
    }

    pub fn as_slice(&self) -> &[TextFragment] {
        &self.fragments
    }
}

fn sort_key(fragment: &TextFragment) -> f32 {
    let y = fragment.top();
    if y.is_finite() { y } else { f32::INFINITY }
}

impl From<Vec<TextFragment>> for FragmentSequence {
    fn from(fragments: Vec<TextFragment>) -> Self {
        Self::from_unsorted(fragments)
    }
}

impl<'a> IntoIterator for &'a FragmentSequence {
    type Item = &'a TextFragment;
    type IntoIter = std::slice::Iter<'a, TextFragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

/// An OCR engine producing fragments from raw input (an encoded image, or a
/// recording of a previous run).
///
/// Engines are expensive to build; callers create one and inject it where
/// needed instead of reaching for a global.
pub trait OcrEngine {
    /// Recognize text fragments. Output order is unspecified.
    fn recognize(&self, input: &[u8]) -> Result<Vec<TextFragment>, OcrError>;

    /// Engine name for logs and metadata.
    fn name(&self) -> &str;
}
