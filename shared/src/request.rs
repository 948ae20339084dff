//! Input collection and multipart payload building.
//!
//! Everything here is generic over the image handle `I`, so the same code
//! carries a browser `File` in the frontend and raw bytes in the bench CLI.

use crate::error::ValidationError;
use crate::modality::Modality;

pub const DEFAULT_WEIGHTING: u8 = 50;
pub const MAX_WEIGHTING: u8 = 100;

pub const DEFAULT_LABELS: [&str; 5] = ["t-shirt", "robe", "pull", "pantalon", "veste"];

/// User-editable, ordered list of unique classification labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl LabelSet {
    pub fn empty() -> Self {
        Self { labels: Vec::new() }
    }

    /// Adds a label after trimming and lowercasing it. Returns false when
    /// the label is empty or already present.
    pub fn add(&mut self, raw: &str) -> bool {
        let label = raw.trim().to_lowercase();
        if label.is_empty() || self.labels.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l != label);
        self.labels.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn joined(&self) -> String {
        self.labels.join(",")
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = LabelSet::empty();
        for label in iter {
            set.add(label.as_ref());
        }
        set
    }
}

/// State held by a demo while the visitor fills it in.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoInput<I> {
    pub image: Option<I>,
    pub text: String,
    pub weighting: u8,
    pub labels: LabelSet,
}

impl<I> Default for DemoInput<I> {
    fn default() -> Self {
        Self {
            image: None,
            text: String::new(),
            weighting: DEFAULT_WEIGHTING,
            labels: LabelSet::default(),
        }
    }
}

impl<I: Clone> DemoInput<I> {
    /// Snapshot of the current input as a request for `modality`.
    pub fn to_request(&self, modality: Modality) -> Result<DemoRequest<I>, ValidationError> {
        match modality {
            Modality::Search => {
                let text = Some(self.text.trim())
                    .filter(|t| !t.is_empty())
                    .map(str::to_string);
                if self.image.is_none() && text.is_none() {
                    return Err(ValidationError::MissingQuery);
                }
                Ok(DemoRequest::Search {
                    image: self.image.clone(),
                    text,
                    weighting: self.weighting.min(MAX_WEIGHTING),
                })
            }
            Modality::Segment => Ok(DemoRequest::Segment {
                image: self.require_image()?,
            }),
            Modality::Classify => {
                let image = self.require_image()?;
                if self.labels.is_empty() {
                    return Err(ValidationError::NoLabels);
                }
                Ok(DemoRequest::Classify {
                    image,
                    labels: self.labels.clone(),
                })
            }
            Modality::Detect => Ok(DemoRequest::Detect {
                image: self.require_image()?,
            }),
        }
    }

    fn require_image(&self) -> Result<I, ValidationError> {
        self.image.clone().ok_or(ValidationError::MissingImage)
    }
}

/// A single user action, built fresh per submission.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoRequest<I> {
    Search {
        image: Option<I>,
        text: Option<String>,
        weighting: u8,
    },
    Segment {
        image: I,
    },
    Classify {
        image: I,
        labels: LabelSet,
    },
    Detect {
        image: I,
    },
}

impl<I> DemoRequest<I> {
    pub fn modality(&self) -> Modality {
        match self {
            DemoRequest::Search { .. } => Modality::Search,
            DemoRequest::Segment { .. } => Modality::Segment,
            DemoRequest::Classify { .. } => Modality::Classify,
            DemoRequest::Detect { .. } => Modality::Detect,
        }
    }

    /// Multipart form for this request. `top_k` only matters for search.
    pub fn into_payload(self, top_k: u32) -> Payload<I> {
        let modality = self.modality();
        let mut fields = Vec::new();
        match self {
            DemoRequest::Search {
                image,
                text,
                weighting,
            } => {
                let alpha = search_alpha(image.is_some(), text.is_some(), weighting);
                if let Some(image) = image {
                    fields.push(FormField::file("image", image));
                }
                if let Some(text) = text {
                    fields.push(FormField::text("text", text));
                }
                fields.push(FormField::text("alpha", alpha.to_string()));
                fields.push(FormField::text("top_k", top_k.to_string()));
            }
            DemoRequest::Segment { image } | DemoRequest::Detect { image } => {
                fields.push(FormField::file("image", image));
            }
            DemoRequest::Classify { image, labels } => {
                fields.push(FormField::file("image", image));
                fields.push(FormField::text("labels", labels.joined()));
            }
        }
        log::debug!("built {} payload with {} fields", modality, fields.len());
        Payload { modality, fields }
    }
}

/// Blend between image-driven (0) and text-driven (1) search scoring.
pub fn search_alpha(has_image: bool, has_text: bool, weighting: u8) -> f64 {
    match (has_image, has_text) {
        (true, false) => 0.0,
        (false, true) => 1.0,
        _ => f64::from(weighting.min(MAX_WEIGHTING)) / 100.0,
    }
}

/// Badge shown next to the weighting slider.
pub fn weighting_badge(weighting: u8) -> &'static str {
    match weighting.cmp(&DEFAULT_WEIGHTING) {
        std::cmp::Ordering::Equal => "Balanced",
        std::cmp::Ordering::Greater => "Text priority",
        std::cmp::Ordering::Less => "Image priority",
    }
}

/// Slider legends as (image share, text share) in percent.
pub fn weighting_legends(weighting: u8) -> (String, String) {
    let w = weighting.min(MAX_WEIGHTING);
    (
        format!("Image {}%", MAX_WEIGHTING - w),
        format!("Text {}%", w),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<I> {
    Text(String),
    File(I),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField<I> {
    pub name: &'static str,
    pub value: FieldValue<I>,
}

impl<I> FormField<I> {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: FieldValue::Text(value.into()),
        }
    }

    pub fn file(name: &'static str, image: I) -> Self {
        Self {
            name,
            value: FieldValue::File(image),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payload<I> {
    pub modality: Modality,
    pub fields: Vec<FormField<I>>,
}

impl<I> Payload<I> {
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Text(v) if f.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn file_field(&self, name: &str) -> Option<&I> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::File(image) if f.name == name => Some(image),
            _ => None,
        })
    }
}
