use super::demo_panel::{DemoPanel, PanelMsg};
use super::results::render_score_bars;
use shared::ClassifyResult;
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

pub fn render_label_editor(panel: &DemoPanel, ctx: &Context<DemoPanel>) -> Html {
    let link = ctx.link();
    let oninput = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        PanelMsg::SetLabelDraft(input.value())
    });
    let onkeydown = link.batch_callback(|e: KeyboardEvent| {
        (e.key() == "Enter").then(|| {
            e.prevent_default();
            PanelMsg::AddLabel
        })
    });

    html! {
        <div class="label-editor">
            <h4>{"Labels"}</h4>
            <div class="label-chips">
                { for panel.controller.input().labels.iter().map(|label| {
                    let owned = label.to_string();
                    html! {
                        <span class="label-chip" key={label.to_string()}>
                            { label }
                            <button
                                class="chip-remove"
                                title="Remove label"
                                onclick={link.callback(move |_| PanelMsg::RemoveLabel(owned.clone()))}
                            >
                                <i class="fa-solid fa-times"></i>
                            </button>
                        </span>
                    }
                })}
            </div>
            <div class="label-input">
                <input
                    type="text"
                    placeholder="Add a label, e.g. jupe"
                    value={panel.label_draft.clone()}
                    {oninput}
                    {onkeydown}
                />
                <button class="analyze-btn" onclick={link.callback(|_| PanelMsg::AddLabel)}>
                    <i class="fa-solid fa-plus"></i>{" Add"}
                </button>
            </div>
        </div>
    }
}

pub fn render_classification(result: &ClassifyResult) -> Html {
    let Some(badge) = result.top_badge() else {
        return html! { <p class="no-results-message">{"The model returned no score."}</p> };
    };

    html! {
        <div class="results-container">
            <div class="result-header">
                <h3>{"Most probable"}</h3>
                <span class="top-badge">{ badge }</span>
            </div>
            <div class="detailed-results">
                { render_score_bars(&result.bars()) }
            </div>
        </div>
    }
}
