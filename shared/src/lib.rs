//! Platform-independent core of the fashion vision demo: request building,
//! response interpretation, demo state and the geometry behind detection
//! overlays. Shared by the Yew frontend and the bench CLI.

pub mod config;
pub mod demo;
pub mod error;
pub mod geometry;
pub mod modality;
pub mod request;
pub mod result;
pub mod segmentation;
pub mod session;

pub use config::VisionConfig;
pub use demo::{DemoController, DemoPhase, HttpReply, Submission, Transport, submit};
pub use error::{ConfigError, DemoError, TransportError, ValidationError};
pub use geometry::{BoundingBox, CropRect, OverlayRect, Size};
pub use modality::Modality;
pub use request::{DemoInput, DemoRequest, FieldValue, FormField, LabelSet, Payload};
pub use result::{
    ClassifyResult, DemoResult, DetectResult, DetectedObject, LabelScore, ScoreBar, SearchHit,
    SearchResult, SegmentResult,
};
pub use segmentation::Taxonomy;
pub use session::{CreditsRefresher, Session, TokenSource, UserProfile};
pub use strum::IntoEnumIterator;
pub use uuid::Uuid;
