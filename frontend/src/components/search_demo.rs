use super::demo_panel::{DemoPanel, PanelMsg, SearchTab};
use super::upload_section::render_image_picker;
use shared::request::{MAX_WEIGHTING, weighting_badge, weighting_legends};
use shared::result::format_percent;
use shared::{SearchResult, VisionConfig};
use web_sys::HtmlInputElement;
use yew::prelude::*;

const TABS: [(SearchTab, &str, &str); 3] = [
    (SearchTab::Text, "Text", "fa-solid fa-font"),
    (SearchTab::Image, "Image", "fa-solid fa-image"),
    (SearchTab::Combined, "Combined", "fa-solid fa-object-group"),
];

pub fn render_search_inputs(panel: &DemoPanel, ctx: &Context<DemoPanel>) -> Html {
    let tab = panel.search_tab;
    let shows_text = tab != SearchTab::Image;
    let shows_image = tab != SearchTab::Text;

    html! {
        <div class="search-inputs">
            <div class="tabs">
                { for TABS.iter().map(|(option, caption, icon)| {
                    let option = *option;
                    html! {
                        <button
                            class={classes!("tab", (option == tab).then_some("active"))}
                            onclick={ctx.link().callback(move |_| PanelMsg::SetTab(option))}
                        >
                            <i class={*icon}></i>{ format!(" {}", caption) }
                        </button>
                    }
                })}
            </div>
            { if shows_text { render_text_query(panel, ctx) } else { html! {} } }
            { if shows_image { render_image_picker(panel, ctx) } else { html! {} } }
            { if tab == SearchTab::Combined { render_weighting(panel, ctx) } else { html! {} } }
        </div>
    }
}

fn render_text_query(panel: &DemoPanel, ctx: &Context<DemoPanel>) -> Html {
    let oninput = ctx.link().callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        PanelMsg::SetText(input.value())
    });

    html! {
        <input
            class="text-query"
            type="text"
            placeholder="e.g. robe rouge élégante"
            value={panel.controller.input().text.clone()}
            {oninput}
        />
    }
}

fn render_weighting(panel: &DemoPanel, ctx: &Context<DemoPanel>) -> Html {
    let weighting = panel.controller.input().weighting;
    let (image_legend, text_legend) = weighting_legends(weighting);
    let oninput = ctx.link().callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let weighting = input
            .value()
            .parse::<u8>()
            .unwrap_or_default()
            .min(MAX_WEIGHTING);
        PanelMsg::SetWeighting(weighting)
    });

    html! {
        <div class="weighting">
            <div class="weighting-legends">
                <span>{ image_legend }</span>
                <span class="weighting-badge">{ weighting_badge(weighting) }</span>
                <span>{ text_legend }</span>
            </div>
            <input
                type="range"
                min="0"
                max={MAX_WEIGHTING.to_string()}
                step="1"
                value={weighting.to_string()}
                {oninput}
            />
        </div>
    }
}

pub fn render_search_results(result: &SearchResult, config: &VisionConfig) -> Html {
    if result.results.is_empty() {
        return html! { <p class="no-results-message">{"No matching product found."}</p> };
    }

    html! {
        <div class="results-container">
            <h3>{"Results"}</h3>
            <div class="search-grid">
                { for result.ranked().into_iter().map(|hit| {
                    let src = hit
                        .image_path
                        .as_deref()
                        .and_then(|path| config.static_url(path).ok())
                        .map(|url| url.to_string());
                    html! {
                        <div class="search-hit">
                            {
                                match src {
                                    Some(src) => html! { <img src={src} alt={hit.label.clone()} /> },
                                    None => html! { <div class="preview-placeholder">{"No image"}</div> },
                                }
                            }
                            <div class="hit-label">{ &hit.label }</div>
                            <div class="hit-score">{ format_percent(hit.score) }</div>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}
