//! Response shapes of the four endpoints and their interpretation.

use crate::error::{DemoError, TransportError};
use crate::geometry::BoundingBox;
use crate::modality::Modality;
use crate::segmentation::Taxonomy;
use derive_more::From;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const STATUS_PAYMENT_REQUIRED: u16 = 402;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub label: String,
    pub score: f64,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResult {
    pub results: Vec<LabelScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SegmentResult {
    #[serde(default)]
    pub mask_color_atr_base64: Option<String>,
    #[serde(default)]
    pub mask_color_lip_base64: Option<String>,
    #[serde(default)]
    pub detected_labels_atr: Vec<String>,
    #[serde(default)]
    pub detected_labels_lip: Vec<String>,
    #[serde(default)]
    pub color_map_atr: Option<HashMap<String, String>>,
    #[serde(default)]
    pub color_map_lip: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    pub score: f64,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResult {
    #[serde(default)]
    pub detected_objects: Vec<DetectedObject>,
}

/// Parsed body of a successful call, one variant per modality.
#[derive(Debug, Clone, PartialEq, From)]
pub enum DemoResult {
    Search(SearchResult),
    Segment(SegmentResult),
    Classify(ClassifyResult),
    Detect(DetectResult),
}

impl DemoResult {
    pub fn modality(&self) -> Modality {
        match self {
            DemoResult::Search(_) => Modality::Search,
            DemoResult::Segment(_) => Modality::Segment,
            DemoResult::Classify(_) => Modality::Classify,
            DemoResult::Detect(_) => Modality::Detect,
        }
    }
}

/// Maps an HTTP reply to a result or an error. 402 is reserved for an
/// exhausted quota on every endpoint.
pub fn interpret(modality: Modality, status: u16, body: &str) -> Result<DemoResult, DemoError> {
    if status == STATUS_PAYMENT_REQUIRED {
        log::warn!("{} call rejected: quota exhausted", modality);
        return Err(DemoError::QuotaExceeded);
    }
    if !(200..300).contains(&status) {
        return Err(TransportError::Status {
            status,
            body: body.to_string(),
        }
        .into());
    }

    let decoded = match modality {
        Modality::Search => serde_json::from_str::<SearchResult>(body).map(DemoResult::from),
        Modality::Classify => serde_json::from_str::<ClassifyResult>(body)
            .map(|r| DemoResult::from(r.ranked())),
        Modality::Detect => serde_json::from_str::<DetectResult>(body).map(DemoResult::from),
        Modality::Segment => serde_json::from_str::<Value>(body)
            .and_then(|v| serde_json::from_value::<SegmentResult>(unwrap_envelope(v)))
            .map(DemoResult::from),
    };
    decoded.map_err(|e| {
        log::error!("failed to decode {} response: {}", modality, e);
        TransportError::Decode(e.to_string()).into()
    })
}

// The raw body is canonical. Bodies wrapped under `result` or `data` are
// accepted when the outer object carries no mask field itself.
fn unwrap_envelope(value: Value) -> Value {
    let has_masks = value
        .as_object()
        .map(|o| o.keys().any(|k| k.starts_with("mask_color_") || k.starts_with("detected_labels_")))
        .unwrap_or(false);
    if has_masks {
        return value;
    }
    match value {
        Value::Object(mut outer) => {
            for key in ["result", "data"] {
                if let Some(inner @ Value::Object(_)) = outer.remove(key) {
                    return inner;
                }
            }
            Value::Object(outer)
        }
        other => other,
    }
}

impl ClassifyResult {
    /// Copy sorted by descending score.
    pub fn ranked(&self) -> Self {
        let mut results = self.results.clone();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Self { results }
    }

    pub fn top(&self) -> Option<&LabelScore> {
        self.results
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal))
    }

    /// Text of the "most probable" badge, e.g. `robe (81.0%)`.
    pub fn top_badge(&self) -> Option<String> {
        self.top()
            .map(|top| format!("{} ({})", top.label, format_percent(top.score)))
    }
}

impl SearchResult {
    pub fn ranked(&self) -> Vec<&SearchHit> {
        let mut hits: Vec<&SearchHit> = self.results.iter().collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits
    }
}

impl SegmentResult {
    pub fn mask(&self, taxonomy: Taxonomy) -> Option<&str> {
        match taxonomy {
            Taxonomy::Atr => self.mask_color_atr_base64.as_deref(),
            Taxonomy::Lip => self.mask_color_lip_base64.as_deref(),
        }
    }

    pub fn labels(&self, taxonomy: Taxonomy) -> &[String] {
        match taxonomy {
            Taxonomy::Atr => &self.detected_labels_atr,
            Taxonomy::Lip => &self.detected_labels_lip,
        }
    }

    pub fn color_map(&self, taxonomy: Taxonomy) -> Option<&HashMap<String, String>> {
        match taxonomy {
            Taxonomy::Atr => self.color_map_atr.as_ref(),
            Taxonomy::Lip => self.color_map_lip.as_ref(),
        }
    }
}

/// One row of a score bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBar {
    pub label: String,
    pub width: f64,
    pub percent: String,
}

impl ScoreBar {
    fn new(label: &str, score: f64) -> Self {
        Self {
            label: label.to_string(),
            width: bar_width(score),
            percent: format_percent(score),
        }
    }
}

impl ClassifyResult {
    /// Bars in descending score order, whatever order the body used.
    pub fn bars(&self) -> Vec<ScoreBar> {
        self.ranked()
            .results
            .iter()
            .map(|r| ScoreBar::new(&r.label, r.score))
            .collect()
    }
}

impl DetectedObject {
    /// Caption drawn on the overlay, e.g. `bag (77.0%)`.
    pub fn caption(&self) -> String {
        format!("{} ({})", self.label, format_percent(self.score))
    }
}

/// Bar width in percent for a score in [0, 1], clamped.
pub fn bar_width(score: f64) -> f64 {
    (score * 100.0).clamp(0.0, 100.0)
}

pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}
