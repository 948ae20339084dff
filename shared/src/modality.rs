use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

/// One of the four vision capabilities exposed by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Modality {
    Search,
    Segment,
    Classify,
    Detect,
}

impl Modality {
    /// Path of the endpoint relative to the API base, trailing slash included.
    pub fn endpoint_path(&self) -> String {
        format!("/api/v1/{}/", self.as_ref())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Modality::Search => "Cross-Modal Search",
            Modality::Segment => "Precise Segmentation",
            Modality::Classify => "Smart Classification",
            Modality::Detect => "Fashion Object Detection",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Modality::Search => {
                "Search by image, text or both. The model understands intent and finds the right products."
            }
            Modality::Segment => {
                "Pixel-accurate garment and body-part masks, built for virtual try-on."
            }
            Modality::Classify => {
                "Zero-shot classification against your own vocabulary of labels."
            }
            Modality::Detect => {
                "Locate every garment and accessory in a picture, with boxes and crops."
            }
        }
    }

    pub fn use_cases(&self) -> [&'static str; 4] {
        match self {
            Modality::Search => [
                "Instant visual search",
                "Smart recommendations",
                "Variant discovery",
                "Similarity analysis",
            ],
            Modality::Segment => [
                "Immersive virtual try-on",
                "Background removal",
                "Automatic extraction",
                "Morphology analysis",
            ],
            Modality::Classify => [
                "Automated tagging",
                "Advanced style analysis",
                "Catalog enrichment",
                "Semantic filtering",
            ],
            Modality::Detect => [
                "Shoppable looks",
                "Outfit decomposition",
                "Catalog cropping",
                "Visual merchandising audits",
            ],
        }
    }

    /// Title of the demo modal.
    pub fn demo_title(&self) -> String {
        let name = match self {
            Modality::Search => "Search",
            Modality::Segment => "Segmentation",
            Modality::Classify => "Classification",
            Modality::Detect => "Detection",
        };
        format!("Try the {} API", name)
    }

    /// Button label while a request is in flight.
    pub fn progress_label(&self) -> &'static str {
        match self {
            Modality::Search => "Searching...",
            Modality::Segment => "Segmenting...",
            Modality::Classify => "Classifying...",
            Modality::Detect => "Detecting...",
        }
    }

    /// Toast shown after a successful call.
    pub fn done_message(&self) -> &'static str {
        match self {
            Modality::Search => "Search complete",
            Modality::Segment => "Segmentation complete",
            Modality::Classify => "Classification complete",
            Modality::Detect => "Detection complete",
        }
    }

    pub fn requires_image(&self) -> bool {
        !matches!(self, Modality::Search)
    }
}
