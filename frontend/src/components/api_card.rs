use super::super::{App, Msg};
use super::utils::debounce;
use shared::{IntoEnumIterator, Modality};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_api_cards(link: &Scope<App>) -> Html {
    html! {
        <section id="apis" class="api-grid">
            { for Modality::iter().map(|modality| render_api_card(modality, link)) }
        </section>
    }
}

fn render_api_card(modality: Modality, link: &Scope<App>) -> Html {
    let icon = match modality {
        Modality::Search => "fa-solid fa-magnifying-glass",
        Modality::Segment => "fa-solid fa-layer-group",
        Modality::Classify => "fa-solid fa-tags",
        Modality::Detect => "fa-solid fa-crosshairs",
    };

    html! {
        <article class="api-card" key={modality.to_string()}>
            <h3><i class={icon}></i>{ format!(" {}", modality.title()) }</h3>
            <p>{ modality.description() }</p>
            <ul class="use-cases">
                { for modality.use_cases().iter().map(|case| html! { <li>{ *case }</li> }) }
            </ul>
            <button
                class="analyze-btn"
                onclick={debounce(300, {
                    let link = link.clone();
                    move || link.send_message(Msg::OpenDemo(modality))
                })}
            >
                <i class="fa-solid fa-play"></i>{" Try the API"}
            </button>
        </article>
    }
}
