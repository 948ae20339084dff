use super::demo_panel::{DemoPanel, PanelMsg};
use super::detection_demo;
use super::utils::{debounce, display_name, first_image_file};
use shared::Modality;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_image_picker(panel: &DemoPanel, ctx: &Context<DemoPanel>) -> Html {
    html! {
        <div class="upload-section">
            {
                if panel.preview_url.is_some() {
                    render_preview(panel, ctx)
                } else {
                    render_file_input_area(panel, ctx)
                }
            }
        </div>
    }
}

fn render_file_input_area(panel: &DemoPanel, ctx: &Context<DemoPanel>) -> Html {
    let link = ctx.link();
    let input_id = format!("file-input-{}", ctx.props().modality);

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_image_file);
        input.set_value("");

        match file {
            Some(file) => PanelMsg::ImageSelected(file),
            None => PanelMsg::ImageRejected,
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        PanelMsg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        PanelMsg::SetDragging(false)
    });

    let handle_drop = link.callback(PanelMsg::HandleDrop);
    let trigger_file_input = {
        let input_id = input_id.clone();
        move || {
            let input = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(&input_id));
            if let Some(html_input) = input.and_then(|i| i.dyn_into::<web_sys::HtmlElement>().ok())
            {
                html_input.click();
            }
        }
    };

    html! {
        <>
            <input
                type="file"
                id={input_id}
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                class={classes!("upload-area", panel.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, trigger_file_input)}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop an image here, or click to browse"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, WEBP"}</p>
                </div>
            </div>
        </>
    }
}

fn render_preview(panel: &DemoPanel, ctx: &Context<DemoPanel>) -> Html {
    let preview = if ctx.props().modality == Modality::Detect {
        detection_demo::render_annotated_preview(panel, ctx)
    } else {
        let src = panel
            .preview_url
            .as_ref()
            .map(|url| url.to_string())
            .unwrap_or_default();
        html! {
            <img class="image-preview" src={src} alt="Uploaded image" />
        }
    };

    let file_name = panel
        .controller
        .input()
        .image
        .as_ref()
        .map(|file| display_name(&file.name()))
        .unwrap_or_default();

    html! {
        <div class="preview-container">
            { preview }
            <p class="file-name">{ file_name }</p>
            <button
                class="remove-btn"
                title="Remove image"
                onclick={ctx.link().callback(|_| PanelMsg::RemoveImage)}
            >
                <i class="fa-solid fa-trash"></i>{" Remove image"}
            </button>
        </div>
    }
}
