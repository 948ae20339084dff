use crate::error::TransportError;
use crate::result::SegmentResult;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashMap;
use strum_macros::{Display, EnumIter};

/// Payloads this short are placeholders, not images.
pub const MASK_MIN_BASE64_LEN: usize = 100;

pub const FALLBACK_SWATCH: &str = "#cccccc";

/// Label sets the segmentation model predicts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Taxonomy {
    #[strum(serialize = "ATR")]
    Atr,
    #[strum(serialize = "LIP")]
    Lip,
}

impl Taxonomy {
    pub fn download_name(&self) -> String {
        format!("segmentation_mask_{}.png", self.to_string().to_lowercase())
    }
}

/// Static colors for every ATR/LIP label, used when the response carries
/// no color map entry.
pub const LABEL_COLORS: [(&str, &str); 22] = [
    ("Background", "#222222"),
    ("Hat", "#FFB300"),
    ("Hair", "#803E75"),
    ("Glove", "#FF6800"),
    ("Sunglasses", "#A6BDD7"),
    ("Upper-clothes", "#C10020"),
    ("Dress", "#CEA262"),
    ("Coat", "#817066"),
    ("Socks", "#007D34"),
    ("Pants", "#F6768E"),
    ("Jumpsuits", "#00538A"),
    ("Scarf", "#FF7A5C"),
    ("Skirt", "#53377A"),
    ("Face", "#FF8E00"),
    ("Left-arm", "#B32851"),
    ("Right-arm", "#F4C800"),
    ("Left-leg", "#7F180D"),
    ("Right-leg", "#93AA00"),
    ("Left-shoe", "#593315"),
    ("Right-shoe", "#F13A13"),
    ("Belt", "#232C16"),
    ("Bag", "#B0B0B0"),
];

pub fn palette_color(label: &str) -> Option<&'static str> {
    LABEL_COLORS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, color)| *color)
}

/// Response color map first, then the static palette, then grey.
pub fn swatch_color(label: &str, color_map: Option<&HashMap<String, String>>) -> String {
    color_map
        .and_then(|map| map.get(label))
        .map(String::as_str)
        .or_else(|| palette_color(label))
        .unwrap_or(FALLBACK_SWATCH)
        .to_string()
}

pub fn is_renderable(mask_base64: &str) -> bool {
    mask_base64.len() > MASK_MIN_BASE64_LEN
}

/// The mask for `taxonomy` if it is long enough to be a real image.
pub fn renderable_mask(result: &SegmentResult, taxonomy: Taxonomy) -> Option<&str> {
    result.mask(taxonomy).filter(|mask| is_renderable(mask))
}

pub fn mask_data_url(mask_base64: &str) -> String {
    format!("data:image/png;base64,{}", mask_base64)
}

/// PNG bytes of a mask, for download.
pub fn decode_mask(mask_base64: &str) -> Result<Vec<u8>, TransportError> {
    STANDARD
        .decode(mask_base64.trim())
        .map_err(|e| TransportError::Decode(format!("invalid mask payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_mask() -> String {
        STANDARD.encode(vec![7u8; 120])
    }

    #[test]
    fn test_short_mask_is_not_rendered() {
        let result = SegmentResult {
            mask_color_atr_base64: Some("A".repeat(100)),
            mask_color_lip_base64: Some(long_mask()),
            ..SegmentResult::default()
        };
        assert!(renderable_mask(&result, Taxonomy::Atr).is_none());
        assert!(renderable_mask(&result, Taxonomy::Lip).is_some());
    }

    #[test]
    fn test_missing_mask_is_not_rendered() {
        assert!(renderable_mask(&SegmentResult::default(), Taxonomy::Lip).is_none());
    }

    #[test]
    fn test_swatch_color_precedence() {
        let mut map = HashMap::new();
        map.insert("Hat".to_string(), "#010203".to_string());
        assert_eq!(swatch_color("Hat", Some(&map)), "#010203");
        assert_eq!(swatch_color("Bag", Some(&map)), "#B0B0B0");
        assert_eq!(swatch_color("Bag", None), "#B0B0B0");
        assert_eq!(swatch_color("Cape", None), FALLBACK_SWATCH);
    }

    #[test]
    fn test_decode_mask_round_trips_bytes() {
        let bytes = decode_mask(&long_mask()).unwrap();
        assert_eq!(bytes, vec![7u8; 120]);
        assert!(decode_mask("not base64 !!").is_err());
    }

    #[test]
    fn test_taxonomy_names() {
        assert_eq!(Taxonomy::Atr.to_string(), "ATR");
        assert_eq!(Taxonomy::Lip.download_name(), "segmentation_mask_lip.png");
    }
}
