use super::demo_panel::{DemoPanel, PanelMsg};
use gloo_file::{Blob, ObjectUrl};
use shared::segmentation::{decode_mask, mask_data_url, renderable_mask, swatch_color};
use shared::{IntoEnumIterator, SegmentResult, Taxonomy};
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;
use yew::prelude::*;

pub fn render_segmentation(
    panel: &DemoPanel,
    result: &SegmentResult,
    ctx: &Context<DemoPanel>,
) -> Html {
    let original = panel.preview_url.as_ref().map(|url| url.to_string());

    html! {
        <div class="results-container">
            <div class="mask-grid">
                {
                    match original {
                        Some(src) => html! {
                            <figure class="mask-card">
                                <img src={src} alt="Original image" />
                                <figcaption>{"Original"}</figcaption>
                            </figure>
                        },
                        None => html! {},
                    }
                }
                { for Taxonomy::iter().map(|taxonomy| render_mask(result, taxonomy, ctx)) }
            </div>
        </div>
    }
}

fn render_mask(result: &SegmentResult, taxonomy: Taxonomy, ctx: &Context<DemoPanel>) -> Html {
    let color_map = result.color_map(taxonomy);

    html! {
        <figure class="mask-card" key={taxonomy.to_string()}>
            {
                match renderable_mask(result, taxonomy) {
                    Some(mask) => html! {
                        <>
                            <img src={mask_data_url(mask)} alt={format!("{} mask", taxonomy)} />
                            <button
                                class="analyze-btn"
                                onclick={ctx.link().callback(move |_| PanelMsg::DownloadMask(taxonomy))}
                            >
                                <i class="fa-solid fa-download"></i>{" Download"}
                            </button>
                        </>
                    },
                    None => html! { <div class="preview-placeholder">{"No mask available"}</div> },
                }
            }
            <figcaption>{ taxonomy.to_string() }</figcaption>
            <ul class="swatches">
                { for result.labels(taxonomy).iter().map(|label| html! {
                    <li>
                        <span class="swatch" style={format!("background-color: {};", swatch_color(label, color_map))}></span>
                        { label }
                    </li>
                })}
            </ul>
        </figure>
    }
}

/// Saves the mask as a PNG through a temporary object URL.
pub fn download_mask(result: &SegmentResult, taxonomy: Taxonomy) -> Result<(), String> {
    let mask = renderable_mask(result, taxonomy).ok_or("no mask to download")?;
    let bytes = decode_mask(mask).map_err(|e| e.to_string())?;
    let url = ObjectUrl::from(Blob::new_with_options(bytes.as_slice(), Some("image/png")));

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("no document")?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("{:?}", e))?
        .dyn_into()
        .map_err(|e| format!("{:?}", e))?;
    anchor.set_href(&url);
    anchor.set_download(&taxonomy.download_name());
    anchor.click();
    log::info!("downloaded {}", taxonomy.download_name());
    Ok(())
}
