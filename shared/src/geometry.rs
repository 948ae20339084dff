//! Box overlay and crop geometry for detection results.
//!
//! Kept free of any rendering surface: callers pass the natural size of
//! the decoded image and the size it is displayed at.

use serde::{Deserialize, Serialize};

/// Box in source-image pixels, serialized as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Position of an overlay relative to the displayed image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRect {
    pub fn to_css(&self) -> String {
        format!(
            "left: {:.2}px; top: {:.2}px; width: {:.2}px; height: {:.2}px;",
            self.left, self.top, self.width, self.height
        )
    }
}

/// Scales a source-pixel box to the displayed image. Each axis uses its
/// own ratio `displayed / natural`. Returns None while either size is
/// unknown (image not loaded yet).
pub fn scale_box(bbox: &BoundingBox, natural: Size, displayed: Size) -> Option<OverlayRect> {
    if natural.is_empty() || displayed.is_empty() {
        return None;
    }
    let rx = displayed.width / natural.width;
    let ry = displayed.height / natural.height;
    Some(OverlayRect {
        left: bbox.x1 * rx,
        top: bbox.y1 * ry,
        width: bbox.width() * rx,
        height: bbox.height() * ry,
    })
}

/// Integer source rectangle to copy for a crop thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Clamps the box to the image bounds. None when nothing is left.
pub fn crop_rect(bbox: &BoundingBox, natural: Size) -> Option<CropRect> {
    if natural.is_empty() {
        return None;
    }
    let x1 = bbox.x1.min(bbox.x2).clamp(0.0, natural.width).floor();
    let y1 = bbox.y1.min(bbox.y2).clamp(0.0, natural.height).floor();
    let x2 = bbox.x1.max(bbox.x2).clamp(0.0, natural.width).ceil();
    let y2 = bbox.y1.max(bbox.y2).clamp(0.0, natural.height).ceil();
    let width = (x2 - x1) as u32;
    let height = (y2 - y1) as u32;
    if width == 0 || height == 0 {
        return None;
    }
    Some(CropRect {
        x: x1 as u32,
        y: y1 as u32,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_box_is_linear_per_axis() {
        let bbox = BoundingBox::new(100.0, 50.0, 300.0, 250.0);
        let rect = scale_box(&bbox, Size::new(1000.0, 500.0), Size::new(500.0, 400.0)).unwrap();
        // rx = 0.5, ry = 0.8
        assert_eq!(rect.left, 50.0);
        assert_eq!(rect.top, 40.0);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 160.0);
    }

    #[test]
    fn test_scale_box_identity_when_not_resized() {
        let bbox = BoundingBox::new(12.5, 7.0, 40.0, 90.0);
        let size = Size::new(640.0, 480.0);
        let rect = scale_box(&bbox, size, size).unwrap();
        assert_eq!(
            rect,
            OverlayRect {
                left: 12.5,
                top: 7.0,
                width: 27.5,
                height: 83.0
            }
        );
    }

    #[test]
    fn test_scale_box_waits_for_image_size() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(scale_box(&bbox, Size::new(0.0, 0.0), Size::new(100.0, 100.0)).is_none());
        assert!(scale_box(&bbox, Size::new(100.0, 100.0), Size::new(0.0, 80.0)).is_none());
    }

    #[test]
    fn test_crop_rect_clamps_to_image() {
        let bbox = BoundingBox::new(-5.0, 10.2, 120.0, 90.7);
        let rect = crop_rect(&bbox, Size::new(100.0, 80.0)).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 10,
                width: 100,
                height: 70
            }
        );
    }

    #[test]
    fn test_crop_rect_outside_image_is_empty() {
        let bbox = BoundingBox::new(150.0, 150.0, 200.0, 200.0);
        assert!(crop_rect(&bbox, Size::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_box_deserializes_from_array() {
        let bbox: BoundingBox = serde_json::from_str("[1, 2.5, 3, 4]").unwrap();
        assert_eq!(bbox, BoundingBox::new(1.0, 2.5, 3.0, 4.0));
        assert_eq!(serde_json::to_string(&bbox).unwrap(), "[1.0,2.5,3.0,4.0]");
    }
}
