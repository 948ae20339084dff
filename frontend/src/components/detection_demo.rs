//! Detection overlays and crop thumbnails.
//!
//! Overlay boxes are positioned from the measured preview size, so they
//! follow the image when the window is resized. Crops are cut from the
//! full-resolution image once it has finished decoding.

use super::demo_panel::{DemoPanel, PanelMsg};
use shared::geometry::{crop_rect, scale_box};
use shared::{BoundingBox, CropRect, DemoResult, DetectResult, Size};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};
use yew::prelude::*;

pub fn render_annotated_preview(panel: &DemoPanel, ctx: &Context<DemoPanel>) -> Html {
    let src = panel
        .preview_url
        .as_ref()
        .map(|url| url.to_string())
        .unwrap_or_default();

    html! {
        <div class="annotated-preview">
            <img
                ref={panel.preview_ref.clone()}
                class="image-preview"
                src={src}
                alt="Uploaded image"
                onload={ctx.link().callback(|_| PanelMsg::PreviewResized)}
            />
            { render_overlays(panel) }
        </div>
    }
}

fn render_overlays(panel: &DemoPanel) -> Html {
    let (Some(DemoResult::Detect(result)), Some(natural), Some(displayed)) = (
        panel.controller.result(),
        panel.natural_size,
        panel.displayed_size,
    ) else {
        return html! {};
    };

    html! {
        <>
            { for result.detected_objects.iter().filter_map(|object| {
                let rect = scale_box(&object.bbox, natural, displayed)?;
                Some(html! {
                    <div class="bbox-overlay" style={rect.to_css()}>
                        <span class="bbox-caption">{ object.caption() }</span>
                    </div>
                })
            })}
        </>
    }
}

pub fn render_crops(panel: &DemoPanel, result: &DetectResult) -> Html {
    if result.detected_objects.is_empty() {
        return html! { <p class="no-results-message">{"No fashion item detected."}</p> };
    }

    html! {
        <div class="results-container">
            <h3>{ format!("{} item(s) detected", result.detected_objects.len()) }</h3>
            <div class="crop-grid">
                { for result.detected_objects.iter().enumerate().map(|(i, object)| {
                    let thumbnail = match panel.crops.get(i) {
                        Some(Some(data_url)) => html! { <img src={data_url.clone()} alt={object.label.clone()} /> },
                        Some(None) => html! { <div class="preview-placeholder">{"N/A"}</div> },
                        None => html! { <div class="preview-placeholder"><i class="fa-solid fa-spinner fa-spin"></i></div> },
                    };
                    html! {
                        <figure class="crop-card">
                            { thumbnail }
                            <figcaption>{ object.caption() }</figcaption>
                        </figure>
                    }
                })}
            </div>
        </div>
    }
}

/// One data URL per box, or None when the clamped box is empty.
pub async fn crop_thumbnails(
    src: String,
    boxes: Vec<BoundingBox>,
) -> Result<Vec<Option<String>>, JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_src(&src);
    JsFuture::from(image.decode()).await?;

    let natural = Size::new(
        f64::from(image.natural_width()),
        f64::from(image.natural_height()),
    );
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    boxes
        .iter()
        .map(|bbox| match crop_rect(bbox, natural) {
            Some(rect) => draw_crop(&document, &image, rect).map(Some),
            None => Ok(None),
        })
        .collect()
}

fn draw_crop(
    document: &Document,
    image: &HtmlImageElement,
    rect: CropRect,
) -> Result<String, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(rect.width);
    canvas.set_height(rect.height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;
    let (w, h) = (f64::from(rect.width), f64::from(rect.height));
    context.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        image,
        f64::from(rect.x),
        f64::from(rect.y),
        w,
        h,
        0.0,
        0.0,
        w,
        h,
    )?;
    canvas.to_data_url()
}
